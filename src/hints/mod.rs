pub mod hint_model;
pub mod overlay_manager;
