pub mod change_detector;
pub mod screen_signature;
