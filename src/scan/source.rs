use crate::models::Frame;

/// Camera or fixture supplying one frame per tick
pub trait FrameSource {
    /// Acquire the device. Called once per activation.
    fn open(&mut self) -> Result<(), SourceError>;

    /// Whether a frame is available right now
    fn is_ready(&self) -> bool;

    /// Current frame; dimensions may differ from the previous call
    fn current_frame(&mut self) -> Option<Frame>;

    /// Release the device. Must be safe to call when not open.
    fn release(&mut self);
}

/// Failures acquiring a frame source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// User or platform refused camera access
    #[error("camera access was denied")]
    PermissionDenied,
    /// No compatible capture device
    #[error("no compatible camera found")]
    NoDevice,
    /// Any other device failure
    #[error("camera error: {0}")]
    Device(String),
}
