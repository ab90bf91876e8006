//! Turns a `(host, command, args)` triple into store and device actions.
//!
//! Every invocation walks the same states:
//! open the token slot, make sure the wake address is cached, execute the
//! command once, persist any token the TV issued along the way.

use std::fmt;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::device::{TvRemote, WakeSender};
use crate::error::CoreError;
use crate::storage::{AppRegistry, CredentialCache, DeviceDirectory, Store};
use crate::types::{AppInfo, DeviceDescriptor, MacAddress};

/// App operations addressed by a user-facing name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Open,
    Status,
    Run,
    Close,
    Install,
}

impl AppAction {
    pub fn command_name(self) -> &'static str {
        match self {
            AppAction::Open => "open_app",
            AppAction::Status => "get_app_status",
            AppAction::Run => "run_app",
            AppAction::Close => "close_app",
            AppAction::Install => "install_app",
        }
    }
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    TogglePower,
    PowerOn,
    OpenWeb { url: Option<String> },
    ViewInstalledApps,
    App { action: AppAction, name: Option<String> },
    DeviceInfo,
    /// Absent or unrecognised command.
    Usage,
}

impl Command {
    /// Parse a command name and its positional arguments.
    ///
    /// Extra arguments are ignored; unknown names map to `Usage`.
    pub fn parse(name: Option<&str>, args: &[String]) -> Self {
        let first = args.first().cloned();
        let app = |action| Command::App {
            action,
            name: first.clone(),
        };

        match name {
            Some("toggle_power") => Command::TogglePower,
            Some("power_on") => Command::PowerOn,
            Some("open_web") => Command::OpenWeb { url: first.clone() },
            Some("view_installed_apps") => Command::ViewInstalledApps,
            Some("open_app") => app(AppAction::Open),
            Some("get_app_status") => app(AppAction::Status),
            Some("run_app") => app(AppAction::Run),
            Some("close_app") => app(AppAction::Close),
            Some("install_app") => app(AppAction::Install),
            Some("get_device_info") => Command::DeviceInfo,
            _ => Command::Usage,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::TogglePower => "toggle_power",
            Command::PowerOn => "power_on",
            Command::OpenWeb { .. } => "open_web",
            Command::ViewInstalledApps => "view_installed_apps",
            Command::App { action, .. } => action.command_name(),
            Command::DeviceInfo => "get_device_info",
            Command::Usage => "usage",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a dispatched command, left to the caller to present.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    PowerToggled,
    WakeSent { mac: MacAddress },
    BrowserOpened { url: String },
    Apps(Vec<AppInfo>),
    AppLaunched { app_id: String },
    AppResponse {
        action: AppAction,
        app_id: String,
        response: Value,
    },
    /// Name resolved to nothing: not installed, or not enumerated yet.
    AppNotInstalled { action: AppAction, name: String },
    DeviceInfo(DeviceDescriptor),
    Usage,
}

/// Owns the store handle and the device capabilities for one invocation.
pub struct Dispatcher<R, W> {
    store: Store,
    remote: R,
    waker: W,
}

impl<R: TvRemote, W: WakeSender> Dispatcher<R, W> {
    pub fn new(store: Store, remote: R, waker: W) -> Self {
        Self {
            store,
            remote,
            waker,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn remote_mut(&mut self) -> &mut R {
        &mut self.remote
    }

    pub fn waker(&self) -> &W {
        &self.waker
    }

    /// Run one command against `host`. Nothing is retried.
    pub async fn run(&mut self, host: &str, command: Command) -> Result<Outcome, CoreError> {
        info!(host, command = %command, "dispatching");

        let cached_token = CredentialCache::new(&self.store).open_slot(host)?;
        self.remote.set_token(cached_token.clone());

        DeviceDirectory::new(&self.store)
            .ensure_mac_known(host, &mut self.remote)
            .await?;
        debug!(host, "device info ensured");

        let outcome = self.execute(host, command).await;

        // A handshake may have issued a token even if the command failed.
        match (outcome, self.persist_token(host, &cached_token)) {
            (Err(e), Err(persist_err)) => {
                warn!(host, error = %persist_err, "could not save session token");
                Err(e)
            }
            (Ok(_), Err(persist_err)) => Err(persist_err),
            (outcome, Ok(())) => outcome,
        }
    }

    async fn execute(&mut self, host: &str, command: Command) -> Result<Outcome, CoreError> {
        let command_name = command.name();
        let missing = |argument: &str| CoreError::MissingArgument {
            command: command_name.to_string(),
            argument: argument.to_string(),
        };

        match command {
            Command::TogglePower => {
                self.remote.toggle_power().await?;
                Ok(Outcome::PowerToggled)
            }
            Command::PowerOn => {
                let mac = DeviceDirectory::new(&self.store)
                    .get_mac(host)?
                    .ok_or_else(|| CoreError::DeviceInfoUnavailable {
                        host: host.to_string(),
                        reason: "no wake address cached".to_string(),
                    })?;
                self.waker.broadcast_wake(mac).await?;
                Ok(Outcome::WakeSent { mac })
            }
            Command::OpenWeb { url } => {
                let url = url.ok_or_else(|| missing("url"))?;
                self.remote.open_browser(&url).await?;
                Ok(Outcome::BrowserOpened { url })
            }
            Command::ViewInstalledApps => {
                let apps = self.remote.list_apps().await?;
                AppRegistry::new(&self.store).record_apps(&apps)?;
                Ok(Outcome::Apps(apps))
            }
            Command::App { action, name } => {
                let name = name.ok_or_else(|| missing("appName"))?;
                let registry = AppRegistry::new(&self.store);
                let Some(app_id) = registry.resolve(&name)? else {
                    info!(host, app = %name, "app not found in registry");
                    return Ok(Outcome::AppNotInstalled { action, name });
                };

                let candidates = registry.candidates(&name)?;
                if candidates.len() > 1 {
                    let names: Vec<&str> = candidates.iter().map(|app| app.name.as_str()).collect();
                    warn!(host, app = %name, chosen = %app_id, candidates = ?names, "app name is ambiguous");
                }

                self.execute_app(action, app_id).await
            }
            Command::DeviceInfo => {
                let descriptor = self.remote.device_descriptor().await?;
                DeviceDirectory::new(&self.store).save_from_descriptor(host, &descriptor)?;
                Ok(Outcome::DeviceInfo(descriptor))
            }
            Command::Usage => Ok(Outcome::Usage),
        }
    }

    async fn execute_app(&mut self, action: AppAction, app_id: String) -> Result<Outcome, CoreError> {
        let response = match action {
            AppAction::Open => {
                self.remote.launch_app(&app_id).await?;
                return Ok(Outcome::AppLaunched { app_id });
            }
            AppAction::Status => self.remote.app_status(&app_id).await?,
            AppAction::Run => self.remote.app_run(&app_id).await?,
            AppAction::Close => self.remote.app_close(&app_id).await?,
            AppAction::Install => self.remote.app_install(&app_id).await?,
        };

        Ok(Outcome::AppResponse {
            action,
            app_id,
            response,
        })
    }

    fn persist_token(&self, host: &str, cached: &str) -> Result<(), CoreError> {
        match self.remote.token() {
            Some(token) if token != cached => {
                info!(host, "session token refreshed");
                CredentialCache::new(&self.store).save_token(host, token)?;
            }
            _ => {}
        }
        Ok(())
    }
}
