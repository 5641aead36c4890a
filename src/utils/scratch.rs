//! Reusable luma buffer for the software decode step.
//!
//! The buffer is sized to the current frame and only reallocated when the
//! frame dimensions change, so a steady camera feed allocates once.

use super::grayscale::render_luma_into;
use crate::models::Frame;

/// Scratch buffer owned by one decoder chain and reused across ticks
#[derive(Debug, Default)]
pub struct ScratchBuffer {
    luma: Vec<u8>,
    width: usize,
    height: usize,
    resizes: usize,
}

impl ScratchBuffer {
    /// Create an empty buffer; the first frame sizes it
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize for `width x height` if the dimensions changed
    pub fn ensure_dimensions(&mut self, width: usize, height: usize) {
        if self.width == width && self.height == height {
            return;
        }
        self.luma.resize(width * height, 0);
        self.width = width;
        self.height = height;
        self.resizes += 1;
    }

    /// Render `frame` as luma into the buffer and return the pixels
    pub fn render(&mut self, frame: &Frame) -> &[u8] {
        self.ensure_dimensions(frame.width(), frame.height());
        render_luma_into(frame, &mut self.luma);
        &self.luma
    }

    /// Current `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// How many times the buffer was resized
    pub fn resizes(&self) -> usize {
        self.resizes
    }

    /// Release the pixel memory (keeps nothing for the next session)
    pub fn clear(&mut self) {
        self.luma = Vec::new();
        self.width = 0;
        self.height = 0;
    }
}
