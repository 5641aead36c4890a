//! Luma rendering for the software decode step.
//!
//! Y = 0.299*R + 0.587*G + 0.114*B, computed with integer weights:
//! Y = (76*R + 150*G + 29*B) >> 8

use crate::models::{Frame, PixelFormat};

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let lum = (COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8;
    lum.min(255) as u8
}

/// Render any frame into `out` as 8-bit luma.
///
/// `out` must hold exactly `frame.pixel_count()` bytes.
pub fn render_luma_into(frame: &Frame, out: &mut [u8]) {
    debug_assert_eq!(out.len(), frame.pixel_count());
    match frame.format() {
        PixelFormat::Luma8 => out.copy_from_slice(frame.pixels()),
        PixelFormat::Rgb8 => rgb_to_grayscale_into(frame.pixels(), out),
        PixelFormat::Rgba8 => rgba_to_grayscale_into(frame.pixels(), out),
    }
}

/// Convert packed RGB bytes into an existing grayscale buffer
pub fn rgb_to_grayscale_into(rgb: &[u8], gray: &mut [u8]) {
    for (px, out) in rgb.chunks_exact(3).zip(gray.iter_mut()) {
        *out = luma(px[0], px[1], px[2]);
    }
}

/// Convert packed RGBA bytes into an existing grayscale buffer (alpha ignored)
pub fn rgba_to_grayscale_into(rgba: &[u8], gray: &mut [u8]) {
    // Process 8 pixels at a time
    let mut in_chunks = rgba.chunks_exact(32);
    let mut out_chunks = gray.chunks_exact_mut(8);
    for (block, out) in (&mut in_chunks).zip(&mut out_chunks) {
        for j in 0..8 {
            let idx = j * 4;
            out[j] = luma(block[idx], block[idx + 1], block[idx + 2]);
        }
    }

    for (px, out) in in_chunks
        .remainder()
        .chunks_exact(4)
        .zip(out_chunks.into_remainder().iter_mut())
    {
        *out = luma(px[0], px[1], px[2]);
    }
}

/// Allocate a fresh grayscale copy of a frame
pub fn frame_to_grayscale(frame: &Frame) -> Vec<u8> {
    let mut gray = vec![0u8; frame.pixel_count()];
    render_luma_into(frame, &mut gray);
    gray
}
