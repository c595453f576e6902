//! UI automation and hinting engine.
//!
//! Walks the accessibility tree of the foreground window, fingerprints the
//! clickable elements, overlays text hints next to them when the screen
//! changes, and performs taps, scrolls and text entry on behalf of a
//! controller. The host platform is reached only through the traits in
//! [`platform`]; [`platform::recorded`] replays captured screens.

pub mod cli;
pub mod command;
pub mod element;
pub mod error;
pub mod gesture;
pub mod hints;
pub mod platform;
pub mod router;
pub mod service;
pub mod signature;
pub mod trace;
pub mod walker;

pub use error::EngineError;
pub use router::event_router::EventRouter;
pub use service::service_loop::{AutomationService, ServiceHandle};
