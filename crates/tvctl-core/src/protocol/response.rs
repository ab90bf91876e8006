//! Parsing of events received on the remote-control channel.

use serde::Deserialize;
use serde_json::Value;

use crate::error::DeviceError;
use crate::types::AppInfo;

/// Sent by the TV once the channel is open; carries a token on first pairing.
pub const EVENT_CONNECT: &str = "ms.channel.connect";

/// Sent by the TV when the user declines the pairing prompt.
pub const EVENT_UNAUTHORIZED: &str = "ms.channel.unauthorized";

/// Reply event to an installed-app request.
pub const EVENT_INSTALLED_APPS: &str = "ed.installedApp.get";

/// A single event frame.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelEvent {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl ChannelEvent {
    /// Token issued in a connect event, if any.
    pub fn token(&self) -> Option<&str> {
        self.data
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
    }
}

/// Parse a text frame into an event.
pub fn parse_event(raw: &str, host: &str) -> Result<ChannelEvent, DeviceError> {
    serde_json::from_str(raw).map_err(|e| DeviceError::Protocol {
        host: host.to_string(),
        message: format!("Failed to parse event: {}", e),
    })
}

/// Extract the app list from an `ed.installedApp.get` event.
pub fn parse_installed_apps(event: &ChannelEvent, host: &str) -> Result<Vec<AppInfo>, DeviceError> {
    let apps = event.data.get("data").cloned().ok_or_else(|| DeviceError::Protocol {
        host: host.to_string(),
        message: "installed app event has no data".to_string(),
    })?;

    serde_json::from_value(apps).map_err(|e| DeviceError::Protocol {
        host: host.to_string(),
        message: format!("Failed to parse app list: {}", e),
    })
}

/// Parse an HTTP body, keeping non-JSON bodies as a string.
pub fn parse_rest_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
