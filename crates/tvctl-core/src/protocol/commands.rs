//! Message builders for the TV remote-control channel.
//!
//! Messages are JSON text frames sent over the
//! `samsung.remote.control` WebSocket channel.

use serde_json::{json, Value};

/// App id of the built-in web browser.
pub const BROWSER_APP_ID: &str = "org.tizen.browser";

/// Key code that toggles the panel on and off.
pub const KEY_POWER: &str = "KEY_POWER";

/// Message builders for the remote-control channel
pub struct Commands;

impl Commands {
    /// Press and release a remote key
    pub fn click_key(key: &str) -> Value {
        json!({
            "method": "ms.remote.control",
            "params": {
                "Cmd": "Click",
                "DataOfCmd": key,
                "Option": "false",
                "TypeOfRemote": "SendRemoteKey"
            }
        })
    }

    /// Ask the TV to emit its installed app list
    pub fn installed_apps() -> Value {
        Self::emit("ed.installedApp.get", None)
    }

    /// Launch an app by id
    pub fn launch_app(app_id: &str) -> Value {
        Self::emit(
            "ed.apps.launch",
            Some(json!({
                "appId": app_id,
                "action_type": "DEEP_LINK"
            })),
        )
    }

    /// Open the browser at `url`
    pub fn open_browser(url: &str) -> Value {
        Self::emit(
            "ed.apps.launch",
            Some(json!({
                "appId": BROWSER_APP_ID,
                "action_type": "NATIVE_LAUNCH",
                "metaTag": url
            })),
        )
    }

    fn emit(event: &str, data: Option<Value>) -> Value {
        let mut params = json!({
            "event": event,
            "to": "host"
        });
        if let (Some(data), Value::Object(map)) = (data, &mut params) {
            map.insert("data".to_string(), data);
        }
        json!({
            "method": "ms.channel.emit",
            "params": params
        })
    }
}
