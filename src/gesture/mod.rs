pub mod dispatcher;
pub mod gesture_builder;
