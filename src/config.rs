//! TOML configuration for a scanning session.
//!
//! Every field has a default, so an empty file is a valid configuration.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::scan::FeedbackCue;
use crate::scan::feedback::Tone;
use crate::tracking::corners::DEFAULT_SMOOTHING;
use crate::tracking::dedup::DEFAULT_COOLDOWN_MS;
use crate::tracking::focus::DEFAULT_MARGIN_FRACTION;

/// What happens when a fresh scan is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmMode {
    /// Dispatch immediately
    #[default]
    Auto,
    /// Lock and ask the user before dispatching
    Manual,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanConfig {
    /// Loop settings
    #[serde(default)]
    pub scan: LoopConfig,
    /// Focus region
    #[serde(default)]
    pub focus: FocusConfig,
    /// Corner smoothing
    #[serde(default)]
    pub tracking: TrackingConfig,
    /// Scan deduplication
    #[serde(default)]
    pub dedup: DedupConfig,
    /// Haptic and audio feedback
    #[serde(default)]
    pub feedback: FeedbackConfig,
    /// Log filter
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[scan]` section
#[derive(Debug, Clone, Deserialize)]
pub struct LoopConfig {
    /// Auto dispatch or manual confirmation
    #[serde(default)]
    pub mode: ConfirmMode,
    /// Display refresh rate the driver paces ticks at
    #[serde(default = "default_refresh_hz")]
    pub refresh_hz: u32,
}

/// `[focus]` section
#[derive(Debug, Clone, Deserialize)]
pub struct FocusConfig {
    /// Fraction trimmed from each edge
    #[serde(default = "default_margin_fraction")]
    pub margin_fraction: f32,
}

/// `[tracking]` section
#[derive(Debug, Clone, Deserialize)]
pub struct TrackingConfig {
    /// Corner blend factor
    #[serde(default = "default_smoothing")]
    pub smoothing: f32,
}

/// `[dedup]` section
#[derive(Debug, Clone, Deserialize)]
pub struct DedupConfig {
    /// Window during which the same payload is ignored
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

/// `[feedback]` section
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackConfig {
    /// Emit feedback on accepted scans
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Vibration length
    #[serde(default = "default_haptic_ms")]
    pub haptic_ms: u32,
    /// Beep frequency, 0 disables the tone
    #[serde(default = "default_tone_hz")]
    pub tone_hz: u32,
    /// Beep length
    #[serde(default = "default_tone_ms")]
    pub tone_ms: u32,
}

/// `[logging]` section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            mode: ConfirmMode::default(),
            refresh_hz: default_refresh_hz(),
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            margin_fraction: default_margin_fraction(),
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            smoothing: default_smoothing(),
        }
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            haptic_ms: default_haptic_ms(),
            tone_hz: default_tone_hz(),
            tone_ms: default_tone_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ScanConfig {
    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFile(path.display().to_string(), e))?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ScanConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let margin = self.focus.margin_fraction;
        if !(0.0..0.5).contains(&margin) {
            return Err(ConfigError::Invalid(format!(
                "focus.margin_fraction must be in [0, 0.5), got {margin}"
            )));
        }
        let smoothing = self.tracking.smoothing;
        if !(smoothing > 0.0 && smoothing <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "tracking.smoothing must be in (0, 1], got {smoothing}"
            )));
        }
        if self.scan.refresh_hz == 0 {
            return Err(ConfigError::Invalid("scan.refresh_hz must be positive".into()));
        }
        Ok(())
    }

    /// Time between ticks at the configured refresh rate
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.scan.refresh_hz.max(1) as f64)
    }

    /// Feedback emitted on an accepted scan, `None` when disabled
    pub fn feedback_cue(&self) -> Option<FeedbackCue> {
        let fb = &self.feedback;
        if !fb.enabled {
            return None;
        }
        let tone = (fb.tone_hz > 0 && fb.tone_ms > 0).then_some(Tone {
            hz: fb.tone_hz,
            ms: fb.tone_ms,
        });
        Some(FeedbackCue {
            haptic_ms: fb.haptic_ms,
            tone,
        })
    }
}

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config file {0}: {1}")]
    ReadFile(String, std::io::Error),
    /// TOML syntax or type error
    #[error("failed to parse config: {0}")]
    Parse(String),
    /// Value out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

// Default value functions
fn default_refresh_hz() -> u32 {
    60
}
fn default_margin_fraction() -> f32 {
    DEFAULT_MARGIN_FRACTION
}
fn default_smoothing() -> f32 {
    DEFAULT_SMOOTHING
}
fn default_cooldown_ms() -> u64 {
    DEFAULT_COOLDOWN_MS
}
fn default_true() -> bool {
    true
}
fn default_haptic_ms() -> u32 {
    200
}
fn default_tone_hz() -> u32 {
    880
}
fn default_tone_ms() -> u32 {
    120
}
fn default_log_level() -> String {
    "info".into()
}
