//! Utility functions for frame preprocessing
//!
//! - Grayscale conversion (RGB/RGBA to luminance)
//! - Scratch buffer reused across ticks by the software decoder

/// Grayscale conversion
pub mod grayscale;
/// Reusable scratch buffer
pub mod scratch;
