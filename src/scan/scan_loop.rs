//! The scan loop: one tick per display refresh, strictly sequential.
//!
//! Each tick pulls a frame, runs decode -> focus gate -> corner tracking ->
//! dedup, then dispatches (auto mode) or locks for confirmation (manual
//! mode). The next tick is scheduled only after the current one finishes.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, error, info, warn};

use super::dispatch::{ActionDispatcher, LoggingDispatcher};
use super::feedback::{FeedbackCue, FeedbackSink, NoFeedback};
use super::scheduler::{TickScheduler, TickToken};
use super::source::FrameSource;
use super::state::{
    Confirmation, RenderDirective, ScanEvent, ScanState, TickOutcome, TickReport,
};
use super::ScanError;
use crate::config::{ConfirmMode, ScanConfig};
use crate::decoder::DecoderChain;
use crate::models::Detection;
use crate::payload::{PayloadType, classify};
use crate::tracking::{CornerTracker, FocusGate, ScanDeduplicator};

/// Requests deactivation from outside the loop, e.g. while a tick is
/// suspended in the native decoder.
///
/// Cancellation is synchronous: no scheduled tick runs afterwards and an
/// in-flight decode result is discarded when it resolves.
#[derive(Clone)]
pub struct ScanHandle {
    scheduler: Rc<dyn TickScheduler>,
    teardown: Rc<Cell<bool>>,
}

impl ScanHandle {
    /// Cancel all ticks and mark the loop for teardown
    pub fn deactivate(&self) {
        self.teardown.set(true);
        self.scheduler.cancel_all();
    }
}

/// Scanning session state machine
pub struct ScanLoop {
    state: ScanState,
    mode: ConfirmMode,
    cue: Option<FeedbackCue>,
    source: Box<dyn FrameSource>,
    decoders: DecoderChain,
    gate: FocusGate,
    tracker: CornerTracker,
    dedup: ScanDeduplicator,
    dispatcher: Box<dyn ActionDispatcher>,
    feedback: Box<dyn FeedbackSink>,
    scheduler: Rc<dyn TickScheduler>,
    pending: Option<TickToken>,
    teardown: Rc<Cell<bool>>,
}

impl ScanLoop {
    /// Loop with default settings, a logging dispatcher and no feedback
    pub fn new<S: FrameSource + 'static>(
        source: S,
        decoders: DecoderChain,
        scheduler: Rc<dyn TickScheduler>,
    ) -> Self {
        Self {
            state: ScanState::Inactive,
            mode: ConfirmMode::Auto,
            cue: Some(FeedbackCue::default()),
            source: Box::new(source),
            decoders,
            gate: FocusGate::default(),
            tracker: CornerTracker::default(),
            dedup: ScanDeduplicator::default(),
            dispatcher: Box::new(LoggingDispatcher::new()),
            feedback: Box::new(NoFeedback),
            scheduler,
            pending: None,
            teardown: Rc::new(Cell::new(false)),
        }
    }

    /// Apply mode, focus, smoothing, cooldown and feedback settings
    pub fn with_config(mut self, config: &ScanConfig) -> Self {
        self.mode = config.scan.mode;
        self.cue = config.feedback_cue();
        self.gate = FocusGate::new(config.focus.margin_fraction);
        self.tracker = CornerTracker::new(config.tracking.smoothing);
        self.dedup = ScanDeduplicator::new(config.dedup.cooldown_ms);
        self
    }

    /// Set the confirmation mode
    pub fn with_mode(mut self, mode: ConfirmMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the action dispatcher
    pub fn with_dispatcher<D: ActionDispatcher + 'static>(mut self, dispatcher: D) -> Self {
        self.dispatcher = Box::new(dispatcher);
        self
    }

    /// Replace the feedback sink
    pub fn with_feedback<F: FeedbackSink + 'static>(mut self, feedback: F) -> Self {
        self.feedback = Box::new(feedback);
        self
    }

    /// Current state
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Confirmation mode in use
    pub fn mode(&self) -> ConfirmMode {
        self.mode
    }

    /// Smoothed corners currently tracked
    pub fn tracker(&self) -> &CornerTracker {
        &self.tracker
    }

    /// Dedup memory
    pub fn dedup(&self) -> &ScanDeduplicator {
        &self.dedup
    }

    /// Handle for out-of-band deactivation
    pub fn handle(&self) -> ScanHandle {
        ScanHandle {
            scheduler: self.scheduler.clone(),
            teardown: self.teardown.clone(),
        }
    }

    /// Start scanning: acquire the source and schedule the first tick.
    ///
    /// A no-op when already active. Fails while errored until [`retry`].
    ///
    /// [`retry`]: ScanLoop::retry
    pub fn activate(&mut self) -> Result<(), ScanError> {
        self.apply_pending_teardown();
        match &self.state {
            ScanState::ActiveSearching | ScanState::ActiveLocked(_) => return Ok(()),
            ScanState::Errored(message) => return Err(ScanError::Errored(message.clone())),
            ScanState::Inactive => {}
        }

        if let Err(err) = self.source.open() {
            error!(error = %err, "frame source failed to open");
            self.source.release();
            self.transition(ScanState::Errored(err.to_string()));
            return Err(ScanError::Source(err));
        }

        self.tracker.reset();
        self.dedup.reset();
        self.transition(ScanState::ActiveSearching);
        self.pending = Some(self.scheduler.schedule());
        Ok(())
    }

    /// Stop scanning: cancel the pending tick, release the source and clear
    /// tracker and dedup state. Errored loops stay errored.
    pub fn deactivate(&mut self) {
        self.scheduler.cancel_all();
        self.pending = None;
        self.teardown.set(false);
        if !self.state.is_active() {
            return;
        }
        self.source.release();
        self.tracker.reset();
        self.dedup.reset();
        self.transition(ScanState::Inactive);
    }

    /// Leave the errored state so the loop can be activated again
    pub fn retry(&mut self) -> Result<(), ScanError> {
        match self.state {
            ScanState::Errored(_) => {
                self.transition(ScanState::Inactive);
                Ok(())
            }
            _ => Err(ScanError::NotErrored),
        }
    }

    /// Finish a deactivation requested through a [`ScanHandle`]
    pub fn apply_pending_teardown(&mut self) {
        if self.teardown.get() {
            debug!("applying deactivation requested by handle");
            self.deactivate();
        }
    }

    /// Accept the locked scan: dispatch it and resume searching
    pub fn accept(&mut self) -> Result<Confirmation, ScanError> {
        let ScanState::ActiveLocked(confirmation) = &self.state else {
            return Err(ScanError::NotLocked);
        };
        let confirmation = confirmation.clone();
        info!(kind = %confirmation.kind, "scan accepted");
        self.dispatch(&confirmation.payload, confirmation.kind);
        self.dedup.reset();
        self.transition(ScanState::ActiveSearching);
        Ok(confirmation)
    }

    /// Discard the locked scan and resume searching
    pub fn cancel_confirmation(&mut self) -> Result<Confirmation, ScanError> {
        let ScanState::ActiveLocked(confirmation) = &self.state else {
            return Err(ScanError::NotLocked);
        };
        let confirmation = confirmation.clone();
        info!(kind = %confirmation.kind, "scan dismissed");
        self.dedup.reset();
        self.transition(ScanState::ActiveSearching);
        Ok(confirmation)
    }

    /// Run one tick for `token` at host time `now_ms`.
    ///
    /// Tokens that were cancelled or are not the loop's pending tick are
    /// ignored. A decode that resolves after cancellation is dropped.
    pub async fn tick(&mut self, token: TickToken, now_ms: u64) -> TickOutcome {
        self.apply_pending_teardown();
        if self.pending != Some(token) || !self.scheduler.is_live(token) {
            return TickOutcome::Stale;
        }
        self.pending = None;
        if !self.state.is_active() {
            return TickOutcome::Stale;
        }

        let frame = if self.source.is_ready() {
            self.source.current_frame()
        } else {
            None
        };

        let accepted = match &frame {
            Some(frame) => {
                let detection = self.decoders.decode(frame).await;
                if !self.scheduler.is_live(token) {
                    debug!(tick = token.id(), "tick cancelled during decode, dropping result");
                    self.apply_pending_teardown();
                    return TickOutcome::Discarded;
                }
                detection.filter(|d| self.gate.accepts(d, frame.width(), frame.height()))
            }
            None => None,
        };

        let render = match self.tracker.update(accepted.as_ref().map(|d| d.corners)) {
            Some(corners) => RenderDirective::DrawTrackedCorners(corners),
            None => RenderDirective::DrawIdleIndicator,
        };

        let event = match accepted {
            Some(detection) => self.on_accepted(detection, now_ms),
            None => None,
        };

        let confirmation = match &self.state {
            ScanState::ActiveLocked(c) => Some(c.clone()),
            _ => None,
        };

        self.pending = Some(self.scheduler.schedule());
        TickOutcome::Completed(TickReport {
            render,
            confirmation,
            event,
        })
    }

    fn on_accepted(&mut self, detection: Detection, now_ms: u64) -> Option<ScanEvent> {
        // Locked: keep tracking, hold off new scans until the user decides
        if !matches!(self.state, ScanState::ActiveSearching) {
            return None;
        }
        if !self.dedup.should_act(&detection.payload, now_ms) {
            return None;
        }

        let kind = classify(&detection.payload);
        if let Some(cue) = &self.cue {
            self.feedback.emit(cue);
        }

        match self.mode {
            ConfirmMode::Auto => {
                self.dispatch(&detection.payload, kind);
                Some(ScanEvent::Dispatched {
                    payload: detection.payload,
                    kind,
                })
            }
            ConfirmMode::Manual => {
                let confirmation = Confirmation {
                    payload: detection.payload,
                    kind,
                };
                info!(%kind, "scan awaiting confirmation");
                self.transition(ScanState::ActiveLocked(confirmation.clone()));
                Some(ScanEvent::AwaitingConfirmation(confirmation))
            }
        }
    }

    fn dispatch(&mut self, payload: &str, kind: PayloadType) {
        if let Err(err) = self.dispatcher.dispatch(payload, kind) {
            warn!(%kind, error = %err, "scan action not performed");
        }
    }

    fn transition(&mut self, next: ScanState) {
        if self.state != next {
            info!(from = self.state.name(), to = next.name(), "scan state changed");
        }
        self.state = next;
    }
}
