use crate::models::Corners;
use crate::payload::PayloadType;

/// Scan waiting for the user to accept or cancel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Decoded payload
    pub payload: String,
    /// Its classification
    pub kind: PayloadType,
}

/// Lifecycle of a scan loop
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanState {
    /// Not scanning; no source held
    #[default]
    Inactive,
    /// Pulling frames and looking for codes
    ActiveSearching,
    /// Manual mode: a scan awaits confirmation; tracking continues
    ActiveLocked(Confirmation),
    /// Source acquisition failed; needs an explicit retry
    Errored(String),
}

impl ScanState {
    /// True while ticks should run
    pub fn is_active(&self) -> bool {
        matches!(self, ScanState::ActiveSearching | ScanState::ActiveLocked(_))
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            ScanState::Inactive => "inactive",
            ScanState::ActiveSearching => "searching",
            ScanState::ActiveLocked(_) => "locked",
            ScanState::Errored(_) => "errored",
        }
    }
}

/// What the UI should draw this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderDirective {
    /// Overlay the smoothed code outline
    DrawTrackedCorners(Corners),
    /// Show the searching indicator
    DrawIdleIndicator,
}

/// Notable result of a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Action dispatched automatically
    Dispatched {
        /// Dispatched payload
        payload: String,
        /// Its classification
        kind: PayloadType,
    },
    /// Manual mode entered the locked state
    AwaitingConfirmation(Confirmation),
}

/// Output of one completed tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Overlay directive
    pub render: RenderDirective,
    /// Confirmation to present while locked
    pub confirmation: Option<Confirmation>,
    /// Event raised this tick
    pub event: Option<ScanEvent>,
}

/// Result of handing a token to the loop
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Full pipeline ran; next tick scheduled
    Completed(TickReport),
    /// Token was cancelled or superseded; nothing ran
    Stale,
    /// Cancelled while decoding; the late result was dropped
    Discarded,
}
