/// Short beep played on an accepted scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    /// Frequency in Hz
    pub hz: u32,
    /// Duration in milliseconds
    pub ms: u32,
}

/// Feedback emitted once per accepted scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackCue {
    /// Vibration length, 0 for none
    pub haptic_ms: u32,
    /// Optional tone
    pub tone: Option<Tone>,
}

impl Default for FeedbackCue {
    fn default() -> Self {
        Self {
            haptic_ms: 200,
            tone: Some(Tone { hz: 880, ms: 120 }),
        }
    }
}

/// Fire-and-forget haptic/audio output. Must not block.
pub trait FeedbackSink {
    /// Play `cue`
    fn emit(&mut self, cue: &FeedbackCue);
}

/// Sink that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFeedback;

impl FeedbackSink for NoFeedback {
    fn emit(&mut self, _cue: &FeedbackCue) {}
}
