//! Decoder chain: capability-checked strategies tried in fixed priority order.
//!
//! A tick hands one [`Frame`] to [`DecoderChain::decode`]. Each strategy is
//! asked in turn; the first detection wins. Strategy errors are contained
//! here and read as "no code in this frame".

pub mod grid;
pub mod native;
pub mod software;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::models::{Detection, Frame};

pub use grid::RqrrDecoder;
pub use native::{NativeDecoder, NativeStrategy, RawDetection, QR_CODE_FORMAT};
pub use software::{InversionMode, SoftwareDecoder, SoftwareOptions, SoftwareStrategy};

/// Errors a decoder may report for one frame
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Platform decoder failed
    #[error("native decoder failed: {0}")]
    Native(String),
    /// Software decoder failed
    #[error("software decoder failed: {0}")]
    Software(String),
    /// The decoder cannot read QR codes on this platform
    #[error("decoder does not support qr_code")]
    Unsupported,
}

/// One way of finding a QR code in a frame.
///
/// Strategies run on the scan loop's thread; a native strategy may suspend
/// while the platform detector works.
#[async_trait(?Send)]
pub trait DecodeStrategy {
    /// Short name for logging
    fn name(&self) -> &str;

    /// Cheap capability check. Unavailable strategies are skipped.
    fn is_available(&self) -> bool {
        true
    }

    /// Try to find a code in `frame`
    async fn decode(&mut self, frame: &Frame) -> Result<Option<Detection>, DecodeError>;
}

/// Ordered list of decode strategies
#[derive(Default)]
pub struct DecoderChain {
    strategies: Vec<Box<dyn DecodeStrategy>>,
}

impl DecoderChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Native decoder first, software fallback second
    pub fn native_then_software<N, S>(native: N, software: S) -> Self
    where
        N: NativeDecoder + 'static,
        S: SoftwareDecoder + 'static,
    {
        Self::new()
            .with_strategy(NativeStrategy::new(native))
            .with_strategy(SoftwareStrategy::new(software))
    }

    /// Software decoder only, for hosts without a platform detector
    pub fn software_only<S: SoftwareDecoder + 'static>(software: S) -> Self {
        Self::new().with_strategy(SoftwareStrategy::new(software))
    }

    /// Append a strategy at the lowest priority
    pub fn with_strategy<D: DecodeStrategy + 'static>(mut self, strategy: D) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Append an already boxed strategy at the lowest priority
    pub fn push(&mut self, strategy: Box<dyn DecodeStrategy>) {
        self.strategies.push(strategy);
    }

    /// Number of configured strategies
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// True when no strategy is configured
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Run strategies in order and return the first detection.
    ///
    /// Never fails: decoder errors are logged and treated as a miss.
    pub async fn decode(&mut self, frame: &Frame) -> Option<Detection> {
        for strategy in self.strategies.iter_mut() {
            if !strategy.is_available() {
                trace!(strategy = strategy.name(), "strategy unavailable, skipping");
                continue;
            }
            match strategy.decode(frame).await {
                Ok(Some(detection)) => {
                    trace!(
                        strategy = strategy.name(),
                        seq = frame.seq(),
                        payload_len = detection.payload.len(),
                        "code found"
                    );
                    return Some(detection);
                }
                Ok(None) => {}
                Err(err) => {
                    debug!(strategy = strategy.name(), seq = frame.seq(), error = %err, "decode attempt failed");
                }
            }
        }
        None
    }
}
