//! Scan loop state machine and the host collaborators it talks to.

/// Action dispatch
pub mod dispatch;
/// Refresh-rate driver
pub mod driver;
/// Haptic and audio feedback
pub mod feedback;
/// The scan loop
pub mod scan_loop;
/// Tick scheduling
pub mod scheduler;
/// Frame sources
pub mod source;
/// States and per-tick outputs
pub mod state;

pub use dispatch::{ActionDispatcher, DispatchError, LoggingDispatcher};
pub use driver::{DriveSummary, drive};
pub use feedback::{FeedbackCue, FeedbackSink, NoFeedback, Tone};
pub use scan_loop::{ScanHandle, ScanLoop};
pub use scheduler::{FrameTicker, TickScheduler, TickToken};
pub use source::{FrameSource, SourceError};
pub use state::{Confirmation, RenderDirective, ScanEvent, ScanState, TickOutcome, TickReport};

/// Errors returned by scan loop operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// The frame source could not be acquired
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Activation attempted while errored
    #[error("scanner is in an error state: {0}")]
    Errored(String),
    /// Accept or cancel with no scan awaiting confirmation
    #[error("no scan is awaiting confirmation")]
    NotLocked,
    /// Retry requested while not errored
    #[error("scanner is not in an error state")]
    NotErrored,
}
