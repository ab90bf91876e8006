//! JSON-formatted output for CLI.

use serde::Serialize;
use serde_json::{json, Value};
use tvctl_core::types::{AppInfo, DeviceDescriptor};
use tvctl_core::AppAction;

use super::OutputFormatter;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_apps(&self, host: &str, apps: &[AppInfo]) -> String {
        Self::to_json(&json!({
            "host": host,
            "apps": apps,
            "count": apps.len()
        }))
    }

    fn format_device_info(&self, host: &str, descriptor: &DeviceDescriptor) -> String {
        Self::to_json(&json!({
            "host": host,
            "device": descriptor,
            "wakeAddress": descriptor.wifi_mac()
        }))
    }

    fn format_app_response(
        &self,
        host: &str,
        action: AppAction,
        app_id: &str,
        response: &Value,
    ) -> String {
        Self::to_json(&json!({
            "host": host,
            "command": action.command_name(),
            "appId": app_id,
            "success": true,
            "result": response
        }))
    }

    fn format_message(&self, host: &str, command: &str, message: &str, success: bool) -> String {
        Self::to_json(&json!({
            "host": host,
            "command": command,
            "success": success,
            "message": message
        }))
    }
}
