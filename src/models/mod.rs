/// Decode results and corner ordering
pub mod detection;
/// Raster frames
pub mod frame;
/// 2D points
pub mod point;

pub use detection::{Corners, Detection};
pub use frame::{Frame, FrameError, PixelFormat};
pub use point::Point;
