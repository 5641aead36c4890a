//! `WIFI:` network configuration strings.
//!
//! Format: `WIFI:T:<security>;S:<ssid>;P:<password>;[H:true;];`

use std::fmt;

use super::has_prefix;

/// Network authentication type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WifiSecurity {
    /// WPA/WPA2/WPA3 personal
    #[default]
    Wpa,
    /// Legacy WEP
    Wep,
    /// Open network
    NoPass,
}

impl WifiSecurity {
    /// Token written after `T:`
    pub fn token(&self) -> &'static str {
        match self {
            WifiSecurity::Wpa => "WPA",
            WifiSecurity::Wep => "WEP",
            WifiSecurity::NoPass => "nopass",
        }
    }

    fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("WEP") {
            WifiSecurity::Wep
        } else if token.is_empty() || token.eq_ignore_ascii_case("nopass") {
            WifiSecurity::NoPass
        } else {
            WifiSecurity::Wpa
        }
    }
}

/// Credentials carried by a WiFi QR code
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WifiConfig {
    /// Authentication type
    pub security: WifiSecurity,
    /// Network name
    pub ssid: String,
    /// Network password (empty for open networks)
    pub password: String,
    /// Whether the network hides its SSID
    pub hidden: bool,
}

impl WifiConfig {
    /// Build a config for a visible network
    pub fn new(security: WifiSecurity, ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            security,
            ssid: ssid.into(),
            password: password.into(),
            hidden: false,
        }
    }

    /// Render the payload string to encode in a QR code
    pub fn to_payload(&self) -> String {
        let mut out = format!(
            "WIFI:T:{};S:{};P:{};",
            self.security.token(),
            self.ssid,
            self.password
        );
        if self.hidden {
            out.push_str("H:true;");
        }
        out.push(';');
        out
    }

    /// Parse a `WIFI:` payload. Field order does not matter; unknown fields
    /// are ignored. Returns `None` without the prefix or an SSID.
    pub fn parse(payload: &str) -> Option<Self> {
        let payload = payload.trim();
        if !has_prefix(payload, "WIFI:") {
            return None;
        }
        let mut config = WifiConfig::default();
        let mut security = None;
        for field in payload[5..].split(';') {
            let Some((key, value)) = field.split_once(':') else {
                continue;
            };
            match key {
                "T" => security = Some(WifiSecurity::from_token(value)),
                "S" => config.ssid = value.to_owned(),
                "P" => config.password = value.to_owned(),
                "H" => config.hidden = value.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }
        if config.ssid.is_empty() {
            return None;
        }
        config.security = security.unwrap_or(if config.password.is_empty() {
            WifiSecurity::NoPass
        } else {
            WifiSecurity::Wpa
        });
        Some(config)
    }
}

impl fmt::Display for WifiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_payload())
    }
}
