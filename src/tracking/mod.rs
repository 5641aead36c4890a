//! Per-tick filtering and state: focus gating, corner smoothing and scan dedup.

/// Corner smoothing
pub mod corners;
/// Scan deduplication
pub mod dedup;
/// Focus region gate
pub mod focus;

pub use corners::CornerTracker;
pub use dedup::ScanDeduplicator;
pub use focus::FocusGate;
