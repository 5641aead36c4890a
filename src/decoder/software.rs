//! Pure-software fallback step.
//!
//! The frame is rendered into the chain's scratch luma buffer, then handed
//! to a synchronous decoder as raw pixels.

use async_trait::async_trait;

use super::native::RawDetection;
use super::{DecodeError, DecodeStrategy};
use crate::models::{Detection, Frame};
use crate::utils::scratch::ScratchBuffer;

/// Which polarities the software decoder should try
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InversionMode {
    /// Dark modules on light background only
    #[default]
    DontInvert,
    /// Light modules on dark background only
    OnlyInvert,
    /// Normal first, then inverted
    AttemptBoth,
    /// Inverted first, then normal
    InvertFirst,
}

/// Options passed to every software decode call
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareOptions {
    /// Polarity handling
    pub inversion: InversionMode,
}

/// Synchronous decoder over an 8-bit luma buffer
pub trait SoftwareDecoder {
    /// Decode at most one code from `luma` (`width * height` bytes)
    fn decode(
        &mut self,
        luma: &[u8],
        width: usize,
        height: usize,
        options: &SoftwareOptions,
    ) -> Result<Option<RawDetection>, DecodeError>;
}

/// Strategy that owns the scratch buffer and calls a [`SoftwareDecoder`]
pub struct SoftwareStrategy<S> {
    decoder: S,
    scratch: ScratchBuffer,
    options: SoftwareOptions,
}

impl<S: SoftwareDecoder> SoftwareStrategy<S> {
    /// Wrap a decoder with inversion disabled
    pub fn new(decoder: S) -> Self {
        Self::with_options(decoder, SoftwareOptions::default())
    }

    /// Wrap a decoder with explicit options
    pub fn with_options(decoder: S, options: SoftwareOptions) -> Self {
        Self {
            decoder,
            scratch: ScratchBuffer::new(),
            options,
        }
    }

    /// The scratch buffer reused across frames
    pub fn scratch(&self) -> &ScratchBuffer {
        &self.scratch
    }
}

#[async_trait(?Send)]
impl<S: SoftwareDecoder> DecodeStrategy for SoftwareStrategy<S> {
    fn name(&self) -> &str {
        "software"
    }

    async fn decode(&mut self, frame: &Frame) -> Result<Option<Detection>, DecodeError> {
        let luma = self.scratch.render(frame);
        let raw = self
            .decoder
            .decode(luma, frame.width(), frame.height(), &self.options)?;
        Ok(raw.and_then(RawDetection::into_detection))
    }
}
