//! Payload classification and the actions a scan resolves to.

/// Action resolution
pub mod action;
/// WiFi payloads
pub mod wifi;

use std::fmt;

pub use action::ScanAction;
pub use wifi::{WifiConfig, WifiSecurity};

/// Kind of content a QR payload carries, derived from its prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadType {
    /// `http://` or `https://` link
    Url,
    /// Plain text (anything unrecognized)
    Text,
    /// `mailto:` or `MATMSG:` address
    Email,
    /// `tel:` number
    Phone,
    /// `WIFI:` network credentials
    Wifi,
    /// `geo:` coordinates
    Geo,
}

impl PayloadType {
    /// Upper-case label used in logs and confirmation prompts
    pub fn label(&self) -> &'static str {
        match self {
            PayloadType::Url => "URL",
            PayloadType::Text => "TEXT",
            PayloadType::Email => "EMAIL",
            PayloadType::Phone => "PHONE",
            PayloadType::Wifi => "WIFI",
            PayloadType::Geo => "GEO",
        }
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const PREFIXES: &[(&str, PayloadType)] = &[
    ("https://", PayloadType::Url),
    ("http://", PayloadType::Url),
    ("mailto:", PayloadType::Email),
    ("matmsg:", PayloadType::Email),
    ("tel:", PayloadType::Phone),
    ("wifi:", PayloadType::Wifi),
    ("geo:", PayloadType::Geo),
];

/// Case-insensitive ASCII prefix test
pub(crate) fn has_prefix(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Classify a payload by its prefix. Surrounding whitespace is ignored.
pub fn classify(payload: &str) -> PayloadType {
    let trimmed = payload.trim();
    PREFIXES
        .iter()
        .find(|(prefix, _)| has_prefix(trimmed, prefix))
        .map(|(_, kind)| *kind)
        .unwrap_or(PayloadType::Text)
}
