//! Output formatting for CLI results.

pub mod json;
pub mod table;

pub use json::JsonOutput;
pub use table::TableOutput;

use serde_json::Value;
use tvctl_core::types::{AppInfo, DeviceDescriptor};
use tvctl_core::{AppAction, Outcome};

/// Output formatter trait
pub trait OutputFormatter {
    /// Format the installed app list
    fn format_apps(&self, host: &str, apps: &[AppInfo]) -> String;

    /// Format a device descriptor
    fn format_device_info(&self, host: &str, descriptor: &DeviceDescriptor) -> String;

    /// Format the TV's reply to an app operation
    fn format_app_response(&self, host: &str, action: AppAction, app_id: &str, response: &Value)
        -> String;

    /// Format a one-line result
    fn format_message(&self, host: &str, command: &str, message: &str, success: bool) -> String;

    /// Format any dispatcher outcome
    fn format_outcome(&self, host: &str, outcome: &Outcome) -> String {
        match outcome {
            Outcome::PowerToggled => self.format_message(host, "toggle_power", "Power toggled", true),
            Outcome::WakeSent { mac } => {
                self.format_message(host, "power_on", &format!("Wake packet sent to {}", mac), true)
            }
            Outcome::BrowserOpened { url } => {
                self.format_message(host, "open_web", &format!("Opened {}", url), true)
            }
            Outcome::Apps(apps) => self.format_apps(host, apps),
            Outcome::AppLaunched { app_id } => {
                self.format_message(host, "open_app", &format!("Launched app {}", app_id), true)
            }
            Outcome::AppResponse {
                action,
                app_id,
                response,
            } => self.format_app_response(host, *action, app_id, response),
            Outcome::AppNotInstalled { action, name } => self.format_message(
                host,
                action.command_name(),
                &format!("App '{}' is not installed", name),
                false,
            ),
            Outcome::DeviceInfo(descriptor) => self.format_device_info(host, descriptor),
            Outcome::Usage => String::new(),
        }
    }
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}
