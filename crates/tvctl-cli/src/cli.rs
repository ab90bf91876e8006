//! CLI argument definitions using clap.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use tvctl_core::device::websocket::{RemoteOptions, DEFAULT_PORT};
use tvctl_core::storage::{default_store_path, MatchMode};

/// Command reference shown after the generated help.
pub const COMMANDS_HELP: &str = "\
Commands:
  toggle_power                Toggle power
  power_on                    Power on (wake-on-LAN)
  open_web <url>              Open web in browser
  view_installed_apps         View installed apps
  open_app <appName>          Open an app
  get_app_status <appName>    Get app status
  run_app <appName>           Run an app
  close_app <appName>         Close an app
  install_app <appName>       Install an app from official store
  get_device_info             Get device information

App names match any installed app whose name contains them; run
view_installed_apps first so names can be resolved.";

/// tvctl - control a network-attached smart TV
#[derive(Parser, Debug)]
#[command(name = "tvctl")]
#[command(author, version, about, long_about = None)]
#[command(after_help = COMMANDS_HELP)]
pub struct Cli {
    /// IP or hostname of the TV
    pub host: Option<String>,

    /// Command to execute
    pub command: Option<String>,

    /// Arguments for the command (put `--` before values starting with `-`)
    pub args: Vec<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", env = "TVCTL_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Store file for tokens, app names and wake addresses
    #[arg(long, env = "TVCTL_DB")]
    pub db: Option<PathBuf>,

    /// Remote-control port (8002 uses TLS, 8001 plain WebSocket)
    #[arg(long, default_value_t = DEFAULT_PORT, env = "TVCTL_PORT")]
    pub port: u16,

    /// Network timeout in milliseconds
    #[arg(long, default_value = "5000", env = "TVCTL_TIMEOUT")]
    pub timeout: u64,

    /// Match app names case-sensitively
    #[arg(long)]
    pub case_sensitive: bool,

    /// Wake-on-LAN broadcast target
    #[arg(long, default_value = "255.255.255.255:9", env = "TVCTL_WAKE_ADDR")]
    pub wake_addr: SocketAddr,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl Cli {
    pub fn store_path(&self) -> PathBuf {
        self.db.clone().unwrap_or_else(default_store_path)
    }

    pub fn match_mode(&self) -> MatchMode {
        if self.case_sensitive {
            MatchMode::CaseSensitive
        } else {
            MatchMode::CaseInsensitive
        }
    }

    pub fn remote_options(&self) -> RemoteOptions {
        RemoteOptions {
            port: self.port,
            timeout: Duration::from_millis(self.timeout),
            ..RemoteOptions::default()
        }
    }
}
