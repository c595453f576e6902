use serde::Serialize;

use crate::platform::error::PlatformError;

/// Opaque handle to a view added to the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ViewId(pub u64);

/// Placement request for one overlay view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayParams {
    pub x: i32,
    pub y: i32,
    pub text: String,
    pub touchable: bool,
    pub focusable: bool,
    /// 0.0 (transparent) to 1.0 (opaque).
    pub alpha: f32,
}

impl OverlayParams {
    /// A passive annotation: never receives touches or focus.
    pub fn annotation(x: i32, y: i32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            touchable: false,
            focusable: false,
            alpha: 0.8,
        }
    }
}

/// The collaborator that composites overlay views on screen.
pub trait OverlaySurface {
    fn add_view(&mut self, params: OverlayParams) -> Result<ViewId, PlatformError>;

    fn remove_view(&mut self, view: ViewId) -> Result<(), PlatformError>;
}

impl<S: OverlaySurface + ?Sized> OverlaySurface for Box<S> {
    fn add_view(&mut self, params: OverlayParams) -> Result<ViewId, PlatformError> {
        (**self).add_view(params)
    }

    fn remove_view(&mut self, view: ViewId) -> Result<(), PlatformError> {
        (**self).remove_view(view)
    }
}
