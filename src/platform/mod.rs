//! Boundary to the platform that owns the foreign UI tree, the gesture
//! injector and the overlay display surface.

pub mod error;
pub mod gesture;
pub mod node_tree;
pub mod overlay;
pub mod recorded;
