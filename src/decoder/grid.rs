//! Software decoding with `rqrr`: grid detection on the luma buffer.

use rqrr::PreparedImage;
use tracing::trace;

use super::native::RawDetection;
use super::software::{InversionMode, SoftwareDecoder, SoftwareOptions};
use super::DecodeError;
use crate::models::Point;

/// [`SoftwareDecoder`] backed by `rqrr`
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    /// Create a decoder
    pub fn new() -> Self {
        Self
    }
}

/// Polarity passes to run, in order; `true` means inverted
fn passes(mode: InversionMode) -> &'static [bool] {
    match mode {
        InversionMode::DontInvert => &[false],
        InversionMode::OnlyInvert => &[true],
        InversionMode::AttemptBoth => &[false, true],
        InversionMode::InvertFirst => &[true, false],
    }
}

impl SoftwareDecoder for RqrrDecoder {
    fn decode(
        &mut self,
        luma: &[u8],
        width: usize,
        height: usize,
        options: &SoftwareOptions,
    ) -> Result<Option<RawDetection>, DecodeError> {
        if luma.len() < width * height {
            return Err(DecodeError::Software(format!(
                "luma buffer holds {} bytes, need {}",
                luma.len(),
                width * height
            )));
        }

        let mut failure = None;
        for &invert in passes(options.inversion) {
            let mut img = PreparedImage::prepare_from_greyscale(width, height, |x, y| {
                let v = luma[y * width + x];
                if invert { 255 - v } else { v }
            });
            let grids = img.detect_grids();
            trace!(grids = grids.len(), invert, "rqrr grid scan");
            for grid in grids {
                match grid.decode() {
                    Ok((_, content)) => {
                        let corners = grid
                            .bounds
                            .iter()
                            .map(|p| Point::new(p.x as f32, p.y as f32))
                            .collect();
                        return Ok(Some(RawDetection::new(content, corners)));
                    }
                    Err(err) => failure = Some(format!("{err:?}")),
                }
            }
        }

        // A grid was found but none decoded
        match failure {
            Some(reason) => Err(DecodeError::Software(reason)),
            None => Ok(None),
        }
    }
}
