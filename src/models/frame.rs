use image::DynamicImage;

/// Pixel layout of a frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 1 byte per pixel, luminance
    Luma8,
    /// 3 bytes per pixel, R G B
    Rgb8,
    /// 4 bytes per pixel, R G B A (alpha ignored)
    Rgba8,
}

impl PixelFormat {
    /// Bytes used by one pixel
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Luma8 => 1,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// One immutable raster frame pulled from a frame source.
///
/// Frames are produced once per tick, consumed synchronously by the decoder
/// chain and then dropped.
#[derive(Debug, Clone)]
pub struct Frame {
    seq: u64,
    width: usize,
    height: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Frame {
    /// Wrap a raw pixel buffer, checking that its length matches the dimensions
    pub fn new(
        seq: u64,
        width: usize,
        height: usize,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::EmptyDimensions { width, height });
        }
        let expected = width * height * format.channels();
        if data.len() != expected {
            return Err(FrameError::BufferSize {
                got: data.len(),
                expected,
            });
        }
        Ok(Self {
            seq,
            width,
            height,
            format,
            data,
        })
    }

    /// Uniform luma frame, handy for sources with no picture yet and for tests
    pub fn blank(seq: u64, width: usize, height: usize) -> Result<Self, FrameError> {
        Self::new(
            seq,
            width,
            height,
            PixelFormat::Luma8,
            vec![255; width * height],
        )
    }

    /// Build an RGBA frame from a decoded image
    pub fn from_image(seq: u64, image: &DynamicImage) -> Result<Self, FrameError> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::new(
            seq,
            width as usize,
            height as usize,
            PixelFormat::Rgba8,
            rgba.into_raw(),
        )
    }

    /// Sequence number assigned by the source
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Frame width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel layout of [`Frame::pixels`]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw pixel bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Number of pixels in the frame
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

/// Errors raised when wrapping a pixel buffer
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Width or height is zero
    #[error("frame has empty dimensions {width}x{height}")]
    EmptyDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },
    /// Buffer length disagrees with `width * height * channels`
    #[error("frame buffer has {got} bytes, expected {expected}")]
    BufferSize {
        /// Actual buffer length
        got: usize,
        /// Length implied by the dimensions
        expected: usize,
    },
}
