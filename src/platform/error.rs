use thiserror::Error;

use crate::platform::overlay::ViewId;

#[derive(Debug, Error)]
pub enum PlatformError {
    /// The display surface refused to add an overlay view.
    #[error("overlay view rejected: {0}")]
    OverlayRejected(String),

    /// The display surface failed to remove an overlay view.
    #[error("failed to remove overlay view {view:?}: {reason}")]
    OverlayRemoval { view: ViewId, reason: String },

    #[error("unknown overlay view {0:?}")]
    UnknownView(ViewId),
}
