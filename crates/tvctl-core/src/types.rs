//! Shared value types.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Accepts `AA:BB:CC:DD:EE:FF`, `aa-bb-cc-dd-ee-ff` or twelve bare hex digits.
const MAC_PATTERN: &str = r"^(?:[0-9A-Fa-f]{2}(?::[0-9A-Fa-f]{2}){5}|[0-9A-Fa-f]{2}(?:-[0-9A-Fa-f]{2}){5}|[0-9A-Fa-f]{12})$";

fn mac_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MAC_PATTERN).expect("MAC pattern is valid"))
}

/// A 6-byte hardware address.
///
/// Displays in canonical form: upper-case hex octets separated by colons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for MacAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !mac_regex().is_match(trimmed) {
            return Err(CoreError::InvalidAddress(s.to_string()));
        }

        let hex: String = trimmed.chars().filter(|c| c.is_ascii_hexdigit()).collect();
        let mut octets = [0u8; 6];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| CoreError::InvalidAddress(s.to_string()))?;
        }

        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// An installed application as reported by the TV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppInfo {
    #[serde(rename = "appId")]
    pub app_id: String,
    pub name: String,
    /// Fields the TV reports beyond id and name, kept for display.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl AppInfo {
    pub fn new(app_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Device descriptor document returned by the TV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceDescriptor(pub Value);

impl DeviceDescriptor {
    /// The wake-on-network address field, `device.wifiMac`.
    pub fn wifi_mac(&self) -> Option<&str> {
        self.0.get("device")?.get("wifiMac")?.as_str()
    }
}
