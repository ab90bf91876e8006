//! Device communication layer.
//!
//! The dispatcher only sees the [`TvRemote`] and [`WakeSender`] traits.
//! `SamsungRemote` and `WolSender` satisfy them over the network.

pub mod rest;
pub mod websocket;
pub mod wol;

use serde_json::Value;

use crate::error::CoreError;
use crate::types::{AppInfo, DeviceDescriptor, MacAddress};

pub use websocket::{RemoteOptions, SamsungRemote};
pub use wol::WolSender;

/// Remote-control capabilities of a TV.
///
/// Each call is a single round trip; implementations never retry.
#[allow(async_fn_in_trait)]
pub trait TvRemote {
    /// Session token to present on the next handshake. Empty means unpaired.
    fn set_token(&mut self, token: String);

    /// Token currently held, including one issued during a handshake.
    fn token(&self) -> Option<&str>;

    async fn toggle_power(&mut self) -> Result<(), CoreError>;

    async fn open_browser(&mut self, url: &str) -> Result<(), CoreError>;

    async fn list_apps(&mut self) -> Result<Vec<AppInfo>, CoreError>;

    /// Launch an app through the remote-control channel.
    async fn launch_app(&mut self, app_id: &str) -> Result<(), CoreError>;

    async fn app_status(&mut self, app_id: &str) -> Result<Value, CoreError>;

    async fn app_run(&mut self, app_id: &str) -> Result<Value, CoreError>;

    async fn app_close(&mut self, app_id: &str) -> Result<Value, CoreError>;

    async fn app_install(&mut self, app_id: &str) -> Result<Value, CoreError>;

    async fn device_descriptor(&mut self) -> Result<DeviceDescriptor, CoreError>;
}

/// Sends a wake frame for a hardware address.
#[allow(async_fn_in_trait)]
pub trait WakeSender {
    async fn broadcast_wake(&self, mac: MacAddress) -> Result<(), CoreError>;
}
