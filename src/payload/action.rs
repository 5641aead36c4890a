//! Resolve a payload into the concrete effect a host should perform.

use super::wifi::WifiConfig;
use super::{PayloadType, classify, has_prefix};

/// Effect requested by a scan
#[derive(Debug, Clone, PartialEq)]
pub enum ScanAction {
    /// Navigate to a link
    OpenUrl(String),
    /// Open a mail composer
    ComposeEmail {
        /// Recipient address
        to: String,
        /// Subject line, if present
        subject: Option<String>,
        /// Body text, if present
        body: Option<String>,
    },
    /// Start a call
    Dial(String),
    /// Offer to join a network
    JoinWifi(WifiConfig),
    /// Show a map location
    ShowLocation {
        /// Latitude in degrees
        lat: f64,
        /// Longitude in degrees
        lon: f64,
    },
    /// Copy the text to the clipboard
    CopyText(String),
}

impl ScanAction {
    /// Resolve `payload` into an action. Malformed WIFI and GEO payloads
    /// fall back to copying the raw text.
    pub fn resolve(payload: &str) -> Self {
        let trimmed = payload.trim();
        let fallback = || ScanAction::CopyText(payload.to_owned());
        match classify(trimmed) {
            PayloadType::Url => ScanAction::OpenUrl(trimmed.to_owned()),
            PayloadType::Email => parse_email(trimmed).unwrap_or_else(fallback),
            PayloadType::Phone => ScanAction::Dial(trimmed[4..].trim().to_owned()),
            PayloadType::Wifi => WifiConfig::parse(trimmed)
                .map(ScanAction::JoinWifi)
                .unwrap_or_else(fallback),
            PayloadType::Geo => parse_geo(trimmed).unwrap_or_else(fallback),
            PayloadType::Text => fallback(),
        }
    }

    /// Payload type this action was resolved from
    pub fn kind(&self) -> PayloadType {
        match self {
            ScanAction::OpenUrl(_) => PayloadType::Url,
            ScanAction::ComposeEmail { .. } => PayloadType::Email,
            ScanAction::Dial(_) => PayloadType::Phone,
            ScanAction::JoinWifi(_) => PayloadType::Wifi,
            ScanAction::ShowLocation { .. } => PayloadType::Geo,
            ScanAction::CopyText(_) => PayloadType::Text,
        }
    }
}

fn parse_email(payload: &str) -> Option<ScanAction> {
    if has_prefix(payload, "MATMSG:") {
        let mut to = None;
        let mut subject = None;
        let mut body = None;
        for field in payload[7..].split(';') {
            match field.split_once(':') {
                Some(("TO", v)) => to = Some(v.to_owned()),
                Some(("SUB", v)) => subject = Some(v.to_owned()),
                Some(("BODY", v)) => body = Some(v.to_owned()),
                _ => {}
            }
        }
        return to
            .filter(|t| !t.is_empty())
            .map(|to| ScanAction::ComposeEmail { to, subject, body });
    }

    let rest = &payload[7..];
    let (to, query) = rest.split_once('?').unwrap_or((rest, ""));
    if to.is_empty() {
        return None;
    }
    let mut subject = None;
    let mut body = None;
    for pair in query.split('&') {
        match pair.split_once('=') {
            Some((k, v)) if k.eq_ignore_ascii_case("subject") => subject = Some(v.to_owned()),
            Some((k, v)) if k.eq_ignore_ascii_case("body") => body = Some(v.to_owned()),
            _ => {}
        }
    }
    Some(ScanAction::ComposeEmail {
        to: to.to_owned(),
        subject,
        body,
    })
}

fn parse_geo(payload: &str) -> Option<ScanAction> {
    // geo:lat,lon[,alt][;params][?query]
    let coords = payload[4..].split(['?', ';']).next()?;
    let mut parts = coords.split(',');
    let lat: f64 = parts.next()?.trim().parse().ok()?;
    let lon: f64 = parts.next()?.trim().parse().ok()?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }
    Some(ScanAction::ShowLocation { lat, lon })
}
