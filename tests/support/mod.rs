//! Fakes for the host collaborators of the scan loop.

#![allow(dead_code)]

use async_trait::async_trait;
use rust_qr_live::decoder::{DecodeError, DecodeStrategy};
use rust_qr_live::scan::{
    ActionDispatcher, DispatchError, FeedbackCue, FeedbackSink, FrameSource, SourceError,
};
use rust_qr_live::{Detection, Frame, PayloadType, Point};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

pub const WIDTH: usize = 640;
pub const HEIGHT: usize = 480;

/// Square code of side `size` centered at `(cx, cy)`
pub fn code_at(payload: &str, cx: f32, cy: f32, size: f32) -> Detection {
    let h = size / 2.0;
    Detection::new(
        payload,
        [
            Point::new(cx - h, cy - h),
            Point::new(cx + h, cy - h),
            Point::new(cx + h, cy + h),
            Point::new(cx - h, cy + h),
        ],
    )
}

/// Code in the middle of the frame
pub fn centered(payload: &str) -> Detection {
    code_at(payload, WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0, 100.0)
}

#[derive(Default)]
pub struct SourceProbe {
    pub opened: Cell<usize>,
    pub released: Cell<usize>,
    pub frames: Cell<u64>,
}

/// Blank frames of a fixed size; optionally refuses to open
pub struct FixtureSource {
    pub probe: Rc<SourceProbe>,
    pub fail: Rc<RefCell<Option<SourceError>>>,
    open: bool,
}

impl FixtureSource {
    pub fn new() -> (Self, Rc<SourceProbe>) {
        let probe = Rc::new(SourceProbe::default());
        (
            Self {
                probe: probe.clone(),
                fail: Rc::new(RefCell::new(None)),
                open: false,
            },
            probe,
        )
    }
}

impl FrameSource for FixtureSource {
    fn open(&mut self) -> Result<(), SourceError> {
        if let Some(err) = self.fail.borrow().clone() {
            return Err(err);
        }
        self.probe.opened.set(self.probe.opened.get() + 1);
        self.open = true;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.open
    }

    fn current_frame(&mut self) -> Option<Frame> {
        let seq = self.probe.frames.get();
        self.probe.frames.set(seq + 1);
        Frame::blank(seq, WIDTH, HEIGHT).ok()
    }

    fn release(&mut self) {
        if self.open {
            self.probe.released.set(self.probe.released.get() + 1);
        }
        self.open = false;
    }
}

pub type Script = Rc<RefCell<VecDeque<Result<Option<Detection>, DecodeError>>>>;

/// Decoder returning queued results, then misses
pub struct QueueDecoder {
    pub script: Script,
}

impl QueueDecoder {
    pub fn new() -> (Self, Script) {
        let script: Script = Rc::new(RefCell::new(VecDeque::new()));
        (
            Self {
                script: script.clone(),
            },
            script,
        )
    }
}

#[async_trait(?Send)]
impl DecodeStrategy for QueueDecoder {
    fn name(&self) -> &str {
        "queue"
    }

    async fn decode(&mut self, _frame: &Frame) -> Result<Option<Detection>, DecodeError> {
        self.script.borrow_mut().pop_front().unwrap_or(Ok(None))
    }
}

pub type Calls = Rc<RefCell<Vec<(String, PayloadType)>>>;

/// Records dispatches; can be told to fail every call
pub struct RecordingDispatcher {
    pub calls: Calls,
    pub fail: bool,
}

impl RecordingDispatcher {
    pub fn new() -> (Self, Calls) {
        let calls: Calls = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                calls: calls.clone(),
                fail: false,
            },
            calls,
        )
    }
}

impl ActionDispatcher for RecordingDispatcher {
    fn dispatch(&mut self, payload: &str, kind: PayloadType) -> Result<(), DispatchError> {
        self.calls.borrow_mut().push((payload.to_owned(), kind));
        if self.fail {
            return Err(DispatchError::Blocked("popup blocked".into()));
        }
        Ok(())
    }
}

/// Counts feedback cues
pub struct CountingFeedback(pub Rc<Cell<usize>>);

impl FeedbackSink for CountingFeedback {
    fn emit(&mut self, _cue: &FeedbackCue) {
        self.0.set(self.0.get() + 1);
    }
}
