//! Shared test helpers, available to all `#[cfg(test)]` modules in the crate.

use std::cell::RefCell;

use serde_json::{json, Value};
use tempfile::TempDir;

use crate::device::{TvRemote, WakeSender};
use crate::error::{CoreError, DeviceError};
use crate::storage::Store;
use crate::types::{AppInfo, DeviceDescriptor, MacAddress};

/// Open a fresh store in a temporary directory.
///
/// The caller must keep the `TempDir` alive for the duration of the test.
pub fn setup_store() -> (Store, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open(temp_dir.path().join("tv-tokens.redb")).unwrap();
    (store, temp_dir)
}

/// In-memory `TvRemote` that records every protocol call.
pub struct FakeRemote {
    pub calls: Vec<String>,
    pub apps: Vec<AppInfo>,
    pub descriptor: DeviceDescriptor,
    pub reachable: bool,
    pub token: Option<String>,
    /// Token handed out on the first call, as a pairing would.
    pub issued_token: Option<String>,
    /// Runs at the start of every call, while the dispatcher is mid-command.
    pub on_call: Option<Box<dyn FnMut()>>,
}

impl Default for FakeRemote {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            apps: Vec::new(),
            descriptor: DeviceDescriptor(json!({ "device": { "name": "Test TV" } })),
            reachable: true,
            token: None,
            issued_token: None,
            on_call: None,
        }
    }
}

impl FakeRemote {
    pub fn with_mac(mac: &str) -> Self {
        Self {
            descriptor: DeviceDescriptor(json!({
                "device": { "name": "Test TV", "wifiMac": mac }
            })),
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::default()
        }
    }

    /// The handshake issues the token before the command itself can fail.
    fn record(&mut self, call: String) -> Result<(), CoreError> {
        if let Some(hook) = self.on_call.as_mut() {
            hook();
        }
        if let Some(token) = self.issued_token.take() {
            self.token = Some(token);
        }
        if !self.reachable {
            return Err(DeviceError::Connect {
                host: "fake".to_string(),
                message: "host unreachable".to_string(),
            }
            .into());
        }
        self.calls.push(call);
        Ok(())
    }
}

impl TvRemote for FakeRemote {
    fn set_token(&mut self, token: String) {
        self.token = (!token.is_empty()).then_some(token);
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    async fn toggle_power(&mut self) -> Result<(), CoreError> {
        self.record("toggle_power".to_string())
    }

    async fn open_browser(&mut self, url: &str) -> Result<(), CoreError> {
        self.record(format!("open_browser:{}", url))
    }

    async fn list_apps(&mut self) -> Result<Vec<AppInfo>, CoreError> {
        self.record("list_apps".to_string())?;
        Ok(self.apps.clone())
    }

    async fn launch_app(&mut self, app_id: &str) -> Result<(), CoreError> {
        self.record(format!("launch_app:{}", app_id))
    }

    async fn app_status(&mut self, app_id: &str) -> Result<Value, CoreError> {
        self.record(format!("app_status:{}", app_id))?;
        Ok(json!({ "id": app_id, "running": false, "visible": false }))
    }

    async fn app_run(&mut self, app_id: &str) -> Result<Value, CoreError> {
        self.record(format!("app_run:{}", app_id))?;
        Ok(json!(true))
    }

    async fn app_close(&mut self, app_id: &str) -> Result<Value, CoreError> {
        self.record(format!("app_close:{}", app_id))?;
        Ok(json!(true))
    }

    async fn app_install(&mut self, app_id: &str) -> Result<Value, CoreError> {
        self.record(format!("app_install:{}", app_id))?;
        Ok(json!(true))
    }

    async fn device_descriptor(&mut self) -> Result<DeviceDescriptor, CoreError> {
        self.record("device_descriptor".to_string())?;
        Ok(self.descriptor.clone())
    }
}

/// `WakeSender` that remembers every address it was asked to wake.
#[derive(Default)]
pub struct FakeWaker {
    pub sent: RefCell<Vec<MacAddress>>,
}

impl WakeSender for FakeWaker {
    async fn broadcast_wake(&self, mac: MacAddress) -> Result<(), CoreError> {
        self.sent.borrow_mut().push(mac);
        Ok(())
    }
}
