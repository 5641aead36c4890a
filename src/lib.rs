//! RustQR Live - real-time QR detection and tracking for camera feeds
//!
//! Samples a live frame source once per display refresh, decodes with a
//! platform detector or a software fallback, keeps the code outline steady
//! across frames, suppresses repeated scans of the same code and hands each
//! fresh scan to an action dispatcher.
//!
//! ```no_run
//! use std::rc::Rc;
//! use rust_qr_live::replay::ReplayScript;
//! use rust_qr_live::scan::{FrameTicker, ScanLoop, drive};
//! use rust_qr_live::{DecoderChain, ScanConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScanConfig::default();
//! let script = ReplayScript::load("session.toml".as_ref())?;
//! let (source, decoder) = script.into_parts()?;
//! let ticker = Rc::new(FrameTicker::new());
//! let mut scan = ScanLoop::new(source, DecoderChain::new().with_strategy(decoder), ticker.clone())
//!     .with_config(&config);
//! scan.activate()?;
//! let mut now = 0;
//! drive(&mut scan, &ticker, config.tick_period(), || { now += 16; now }, |_, _| {}).await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// TOML configuration
pub mod config;
/// Decoder chain (native detector first, software fallback)
pub mod decoder;
/// Core data structures (Frame, Detection, Point)
pub mod models;
/// Payload classification and action resolution
pub mod payload;
/// Scripted frame sources for replays and tests
pub mod replay;
/// Scan loop state machine, scheduler and host interfaces
pub mod scan;
/// Focus gating, corner smoothing and scan deduplication
pub mod tracking;
/// Utility functions (grayscale, scratch buffers)
pub mod utils;

pub use config::{ConfirmMode, ScanConfig};
pub use decoder::DecoderChain;
pub use models::{Corners, Detection, Frame, PixelFormat, Point};
pub use payload::{PayloadType, ScanAction, WifiConfig, classify};
pub use scan::{ScanLoop, ScanState};
pub use tracking::{CornerTracker, FocusGate, ScanDeduplicator};
