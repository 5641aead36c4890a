//! Scripted sessions: a fixture frame source plus a decoder that reports
//! whatever the script says each frame contains.
//!
//! ```toml
//! fps = 30
//! width = 640
//! height = 480
//!
//! [[tick]]
//! payload = "https://example.com"
//! corners = [[280.0, 200.0], [360.0, 200.0], [360.0, 280.0], [280.0, 280.0]]
//! repeat = 5
//!
//! [[tick]]
//! repeat = 3
//! ```

use std::path::{Path, PathBuf};
use std::rc::Rc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::decoder::{DecodeError, DecodeStrategy};
use crate::models::{Detection, Frame, Point};
use crate::scan::{FrameSource, SourceError};

/// One `[[tick]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct TickEntry {
    /// Payload visible in the frame, if any
    #[serde(default)]
    pub payload: Option<String>,
    /// Corner points; defaults to a centered square
    #[serde(default)]
    pub corners: Option<Vec<[f32; 2]>>,
    /// Number of consecutive frames this entry covers
    #[serde(default = "default_repeat")]
    pub repeat: usize,
    /// Image to use as frame pixels, relative to the script
    #[serde(default)]
    pub image: Option<PathBuf>,
    /// Override frame width
    #[serde(default)]
    pub width: Option<usize>,
    /// Override frame height
    #[serde(default)]
    pub height: Option<usize>,
}

/// Simulated acquisition failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailOpen {
    /// Camera permission refused
    PermissionDenied,
    /// No camera present
    NoDevice,
}

/// A parsed replay script
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    /// Frames per second the script was recorded at
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Default frame width
    #[serde(default = "default_width")]
    pub width: usize,
    /// Default frame height
    #[serde(default = "default_height")]
    pub height: usize,
    /// Make the source fail to open
    #[serde(default)]
    pub fail_open: Option<FailOpen>,
    /// Frame entries
    #[serde(default, rename = "tick")]
    pub ticks: Vec<TickEntry>,
    #[serde(skip)]
    base_dir: PathBuf,
}

/// One expanded frame of a script
#[derive(Debug, Clone)]
pub struct ScriptedFrame {
    /// Frame width
    pub width: usize,
    /// Frame height
    pub height: usize,
    /// Image backing the frame
    pub image: Option<PathBuf>,
    /// What the decoder should report
    pub detection: Option<Detection>,
}

impl ReplayScript {
    /// Load a script from disk; image paths resolve against its directory
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReplayError::Read(path.display().to_string(), e))?;
        let mut script = Self::from_toml(&content)?;
        script.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(script)
    }

    /// Parse script text
    pub fn from_toml(content: &str) -> Result<Self, ReplayError> {
        let script: ReplayScript =
            toml::from_str(content).map_err(|e| ReplayError::Parse(e.to_string()))?;
        if script.fps == 0 {
            return Err(ReplayError::Parse("fps must be positive".into()));
        }
        Ok(script)
    }

    /// Total frames after expanding `repeat`
    pub fn frame_count(&self) -> usize {
        self.ticks.iter().map(|t| t.repeat).sum()
    }

    /// Host timestamp of frame `index`
    pub fn timestamp_ms(&self, index: usize) -> u64 {
        (index as u64 * 1000) / self.fps as u64
    }

    /// Expand entries into per-frame records
    pub fn expand(&self) -> Result<Vec<ScriptedFrame>, ReplayError> {
        let mut frames = Vec::with_capacity(self.frame_count());
        for entry in &self.ticks {
            let width = entry.width.unwrap_or(self.width);
            let height = entry.height.unwrap_or(self.height);
            let detection = match &entry.payload {
                Some(payload) => {
                    let points: Vec<Point> = match &entry.corners {
                        Some(pts) => pts.iter().map(|[x, y]| Point::new(*x, *y)).collect(),
                        None => centered_square(width, height).to_vec(),
                    };
                    let detection = Detection::from_raw(payload.clone(), &points)
                        .ok_or_else(|| ReplayError::Parse(format!("tick {payload:?} has no usable corners")))?;
                    Some(detection)
                }
                None => None,
            };
            let image = entry.image.as_ref().map(|p| self.base_dir.join(p));
            for _ in 0..entry.repeat {
                frames.push(ScriptedFrame {
                    width,
                    height,
                    image: image.clone(),
                    detection: detection.clone(),
                });
            }
        }
        Ok(frames)
    }

    /// Build the matching source and decoder
    pub fn into_parts(self) -> Result<(ReplaySource, ScriptedDecoder), ReplayError> {
        let frames: Rc<[ScriptedFrame]> = self.expand()?.into();
        Ok((
            ReplaySource {
                frames: frames.clone(),
                cursor: 0,
                open: false,
                fail_open: self.fail_open,
                pixels: Vec::new(),
            },
            ScriptedDecoder { frames },
        ))
    }
}

fn centered_square(width: usize, height: usize) -> [Point; 4] {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let half = width.min(height) as f32 / 8.0;
    [
        Point::new(cx - half, cy - half),
        Point::new(cx + half, cy - half),
        Point::new(cx + half, cy + half),
        Point::new(cx - half, cy + half),
    ]
}

/// Frame source replaying a script, one frame per call
pub struct ReplaySource {
    frames: Rc<[ScriptedFrame]>,
    cursor: usize,
    open: bool,
    fail_open: Option<FailOpen>,
    pixels: Vec<Option<Frame>>,
}

impl ReplaySource {
    /// Frames not yet handed out
    pub fn remaining(&self) -> usize {
        self.frames.len().saturating_sub(self.cursor)
    }

    fn load_pixels(&self) -> Result<Vec<Option<Frame>>, SourceError> {
        let mut loaded = Vec::with_capacity(self.frames.len());
        for scripted in self.frames.iter() {
            let frame = match &scripted.image {
                Some(path) => {
                    let img = image::open(path).map_err(|e| {
                        SourceError::Device(format!("{}: {e}", path.display()))
                    })?;
                    Some(
                        Frame::from_image(0, &img)
                            .map_err(|e| SourceError::Device(e.to_string()))?,
                    )
                }
                None => None,
            };
            loaded.push(frame);
        }
        Ok(loaded)
    }
}

impl FrameSource for ReplaySource {
    fn open(&mut self) -> Result<(), SourceError> {
        match self.fail_open {
            Some(FailOpen::PermissionDenied) => return Err(SourceError::PermissionDenied),
            Some(FailOpen::NoDevice) => return Err(SourceError::NoDevice),
            None => {}
        }
        self.pixels = self.load_pixels()?;
        self.open = true;
        debug!(frames = self.frames.len(), "replay source opened");
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.open && self.cursor < self.frames.len()
    }

    fn current_frame(&mut self) -> Option<Frame> {
        if !self.is_ready() {
            return None;
        }
        let seq = self.cursor as u64;
        let scripted = &self.frames[self.cursor];
        let frame = match self.pixels.get(self.cursor).and_then(Option::as_ref) {
            Some(img) => Frame::new(
                seq,
                img.width(),
                img.height(),
                img.format(),
                img.pixels().to_vec(),
            ),
            None => Frame::blank(seq, scripted.width, scripted.height),
        };
        self.cursor += 1;
        frame.ok()
    }

    fn release(&mut self) {
        self.open = false;
        self.pixels.clear();
    }
}

/// Decode strategy that reports the scripted detection for each frame
pub struct ScriptedDecoder {
    frames: Rc<[ScriptedFrame]>,
}

#[async_trait(?Send)]
impl DecodeStrategy for ScriptedDecoder {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn decode(&mut self, frame: &Frame) -> Result<Option<Detection>, DecodeError> {
        Ok(self
            .frames
            .get(frame.seq() as usize)
            .and_then(|f| f.detection.clone()))
    }
}

/// Errors loading a replay script
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// File could not be read
    #[error("failed to read replay script {0}: {1}")]
    Read(String, std::io::Error),
    /// TOML or content error
    #[error("failed to parse replay script: {0}")]
    Parse(String),
}

fn default_repeat() -> usize {
    1
}
fn default_fps() -> u32 {
    30
}
fn default_width() -> usize {
    640
}
fn default_height() -> usize {
    480
}
