//! Platform detector step.
//!
//! Platform barcode detectors are optional: the host may not ship one, it
//! may not list `qr_code` among its formats, and each call may fail. The
//! strategy probes once and then stays either ready or unavailable.

use async_trait::async_trait;
use tracing::{debug, info};

use super::{DecodeError, DecodeStrategy};
use crate::models::{Detection, Frame, Point};

/// Format name a platform detector must advertise
pub const QR_CODE_FORMAT: &str = "qr_code";

/// Raw result as reported by a detector, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    /// Decoded text
    pub raw_value: String,
    /// Corner points in any order
    pub corner_points: Vec<Point>,
}

impl RawDetection {
    /// Create a raw result
    pub fn new(raw_value: impl Into<String>, corner_points: Vec<Point>) -> Self {
        Self {
            raw_value: raw_value.into(),
            corner_points,
        }
    }

    /// Normalize into a [`Detection`]
    pub fn into_detection(self) -> Option<Detection> {
        Detection::from_raw(self.raw_value, &self.corner_points)
    }
}

/// Host-provided barcode detector (asynchronous, optional)
#[async_trait(?Send)]
pub trait NativeDecoder {
    /// Whether the platform exposes a detector at all
    fn is_present(&self) -> bool {
        true
    }

    /// Formats the detector can read
    async fn supported_formats(&self) -> Result<Vec<String>, DecodeError>;

    /// Detect every code visible in `frame`
    async fn detect(&mut self, frame: &Frame) -> Result<Vec<RawDetection>, DecodeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Pending,
    Ready,
    Unavailable,
}

/// Wraps a [`NativeDecoder`] with a one-time capability probe
pub struct NativeStrategy<N> {
    decoder: N,
    probe: Probe,
}

impl<N: NativeDecoder> NativeStrategy<N> {
    /// Wrap a detector; the probe runs on the first decode
    pub fn new(decoder: N) -> Self {
        let probe = if decoder.is_present() {
            Probe::Pending
        } else {
            Probe::Unavailable
        };
        Self { decoder, probe }
    }

    /// True once the probe confirmed `qr_code` support
    pub fn is_ready(&self) -> bool {
        self.probe == Probe::Ready
    }

    async fn ensure_probed(&mut self) -> bool {
        if self.probe != Probe::Pending {
            return self.probe == Probe::Ready;
        }
        self.probe = match self.decoder.supported_formats().await {
            Ok(formats) if formats.iter().any(|f| f == QR_CODE_FORMAT) => {
                info!("native detector ready for qr_code");
                Probe::Ready
            }
            Ok(formats) => {
                info!(?formats, "native detector lacks qr_code, using software only");
                Probe::Unavailable
            }
            Err(err) => {
                debug!(error = %err, "native detector probe failed");
                Probe::Unavailable
            }
        };
        self.probe == Probe::Ready
    }
}

#[async_trait(?Send)]
impl<N: NativeDecoder> DecodeStrategy for NativeStrategy<N> {
    fn name(&self) -> &str {
        "native"
    }

    fn is_available(&self) -> bool {
        self.probe != Probe::Unavailable
    }

    async fn decode(&mut self, frame: &Frame) -> Result<Option<Detection>, DecodeError> {
        if !self.ensure_probed().await {
            return Ok(None);
        }
        let results = self.decoder.detect(frame).await?;
        Ok(results
            .into_iter()
            .find(|r| !r.raw_value.is_empty())
            .and_then(RawDetection::into_detection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeNative {
        present: bool,
        formats: Result<Vec<String>, ()>,
        results: Vec<RawDetection>,
        detect_calls: usize,
    }

    impl FakeNative {
        fn with_formats(formats: &[&str]) -> Self {
            Self {
                present: true,
                formats: Ok(formats.iter().map(|f| f.to_string()).collect()),
                results: Vec::new(),
                detect_calls: 0,
            }
        }
    }

    #[async_trait(?Send)]
    impl NativeDecoder for FakeNative {
        fn is_present(&self) -> bool {
            self.present
        }

        async fn supported_formats(&self) -> Result<Vec<String>, DecodeError> {
            self.formats
                .clone()
                .map_err(|_| DecodeError::Native("probe".into()))
        }

        async fn detect(&mut self, _frame: &Frame) -> Result<Vec<RawDetection>, DecodeError> {
            self.detect_calls += 1;
            Ok(self.results.clone())
        }
    }

    fn quad() -> Vec<Point> {
        vec![
            Point::new(40.0, 40.0),
            Point::new(10.0, 40.0),
            Point::new(10.0, 10.0),
            Point::new(40.0, 10.0),
        ]
    }

    #[tokio::test]
    async fn test_probe_without_qr_marks_unavailable() {
        let mut strategy = NativeStrategy::new(FakeNative::with_formats(&["ean_13"]));
        let frame = Frame::blank(0, 4, 4).unwrap();
        assert!(strategy.decode(&frame).await.unwrap().is_none());
        assert!(!strategy.is_available());
        assert_eq!(strategy.decoder.detect_calls, 0);
    }

    #[tokio::test]
    async fn test_probe_error_marks_unavailable() {
        let mut fake = FakeNative::with_formats(&[]);
        fake.formats = Err(());
        let mut strategy = NativeStrategy::new(fake);
        let frame = Frame::blank(0, 4, 4).unwrap();
        assert!(strategy.decode(&frame).await.unwrap().is_none());
        assert!(!strategy.is_available());
    }

    #[test]
    fn test_absent_detector_unavailable_up_front() {
        let mut fake = FakeNative::with_formats(&[QR_CODE_FORMAT]);
        fake.present = false;
        assert!(!NativeStrategy::new(fake).is_available());
    }

    #[tokio::test]
    async fn test_first_non_empty_result_normalized() {
        let mut fake = FakeNative::with_formats(&[QR_CODE_FORMAT]);
        fake.results = vec![
            RawDetection::new("", quad()),
            RawDetection::new("https://example.com", quad()),
        ];
        let mut strategy = NativeStrategy::new(fake);
        let frame = Frame::blank(0, 4, 4).unwrap();
        let det = strategy.decode(&frame).await.unwrap().unwrap();
        assert!(strategy.is_ready());
        assert_eq!(det.payload, "https://example.com");
        assert_eq!(det.corners[0], Point::new(10.0, 10.0));
        assert_eq!(det.corners[1], Point::new(40.0, 10.0));
    }
}
