//! Human-readable output for CLI.

use colored::*;
use comfy_table::{Cell, ContentArrangement, Table};
use serde_json::Value;
use tvctl_core::types::{AppInfo, DeviceDescriptor};
use tvctl_core::AppAction;

use super::OutputFormatter;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }

    fn pretty<T: serde::Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_apps(&self, host: &str, apps: &[AppInfo]) -> String {
        if apps.is_empty() {
            return format!("No apps reported by {}.", host);
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["App ID", "Name"]);

        for app in apps {
            table.add_row(vec![Cell::new(&app.app_id), Cell::new(&app.name)]);
        }

        let listing = format!("{}\n\nFound {} app(s) on {}", table, apps.len(), host);
        listing.as_str().cyan().to_string()
    }

    fn format_device_info(&self, _host: &str, descriptor: &DeviceDescriptor) -> String {
        Self::pretty(descriptor).as_str().red().to_string()
    }

    fn format_app_response(
        &self,
        host: &str,
        action: AppAction,
        app_id: &str,
        response: &Value,
    ) -> String {
        format!(
            "{} {} {} '{}'\n{}",
            "[OK]".green(),
            host,
            action.command_name(),
            app_id,
            Self::pretty(response)
        )
    }

    fn format_message(&self, host: &str, _command: &str, message: &str, success: bool) -> String {
        let status = if success {
            "[OK]".green()
        } else {
            "[!]".yellow()
        };

        format!("{} {}: {}", status, host, message)
    }
}
