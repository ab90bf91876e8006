//! WebSocket client for the TV remote-control channel.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{
    connect_async_tls_with_config, tungstenite::Message, Connector, MaybeTlsStream,
    WebSocketStream,
};
use tracing::{debug, info};

use super::rest::RestClient;
use super::TvRemote;
use crate::error::{CoreError, DeviceError};
use crate::protocol::commands::{Commands, KEY_POWER};
use crate::protocol::response::{
    parse_event, parse_installed_apps, ChannelEvent, EVENT_CONNECT, EVENT_INSTALLED_APPS,
    EVENT_UNAUTHORIZED,
};
use crate::types::{AppInfo, DeviceDescriptor};

/// Port of the TLS remote-control channel.
pub const DEFAULT_PORT: u16 = 8002;

/// Port of the plain remote-control channel, also used by the REST API.
pub const PLAIN_PORT: u16 = 8001;

/// Connection settings for a TV.
#[derive(Debug, Clone)]
pub struct RemoteOptions {
    /// Remote-control channel port; `PLAIN_PORT` selects `ws://`.
    pub port: u16,
    /// REST API port.
    pub rest_port: u16,
    /// Connect and reply timeout.
    pub timeout: Duration,
    /// Name shown on the TV's pairing prompt.
    pub client_name: String,
}

impl Default for RemoteOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            rest_port: PLAIN_PORT,
            timeout: Duration::from_secs(5),
            client_name: "tvctl".to_string(),
        }
    }
}

type Channel = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Remote for Tizen-based TVs.
///
/// Every call opens a fresh channel, performs one exchange and closes it.
pub struct SamsungRemote {
    host: String,
    options: RemoteOptions,
    token: Option<String>,
    rest: RestClient,
}

impl SamsungRemote {
    pub fn new(host: &str, options: RemoteOptions) -> Result<Self, CoreError> {
        let rest = RestClient::new(host, options.rest_port, options.timeout)?;
        Ok(Self {
            host: host.to_string(),
            options,
            token: None,
            rest,
        })
    }

    fn channel_url(&self) -> String {
        let scheme = if self.options.port == PLAIN_PORT {
            "ws"
        } else {
            "wss"
        };
        let mut url = format!(
            "{}://{}:{}/api/v2/channels/samsung.remote.control?name={}",
            scheme,
            self.host,
            self.options.port,
            STANDARD.encode(&self.options.client_name)
        );
        if let Some(token) = &self.token {
            url.push_str("&token=");
            url.push_str(token);
        }
        url
    }

    /// The TV serves a self-signed certificate, so chain checks are skipped.
    fn connector(&self) -> Result<Connector, CoreError> {
        let tls = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
            .build()
            .map_err(|e| self.connect_error(format!("TLS setup failed: {}", e)))?;
        Ok(Connector::NativeTls(tls))
    }

    fn connect_error(&self, message: String) -> CoreError {
        DeviceError::Connect {
            host: self.host.clone(),
            message,
        }
        .into()
    }

    fn timeout_error(&self) -> CoreError {
        DeviceError::Timeout {
            host: self.host.clone(),
        }
        .into()
    }

    /// Connect and wait for the TV to accept the channel.
    async fn open_channel(&mut self) -> Result<Channel, CoreError> {
        let url = self.channel_url();
        let connector = self.connector()?;
        debug!(host = %self.host, port = self.options.port, "opening remote channel");

        let (mut channel, _) = timeout(
            self.options.timeout,
            connect_async_tls_with_config(url, None, false, Some(connector)),
        )
        .await
        .map_err(|_| self.timeout_error())?
        .map_err(|e| self.connect_error(e.to_string()))?;

        let event = self.next_event(&mut channel).await?;
        match event.event.as_str() {
            EVENT_CONNECT => {
                if let Some(token) = event.token() {
                    if self.token.as_deref() != Some(token) {
                        info!(host = %self.host, "TV issued a new session token");
                    }
                    self.token = Some(token.to_string());
                }
                Ok(channel)
            }
            EVENT_UNAUTHORIZED => Err(DeviceError::Unauthorized {
                host: self.host.clone(),
            }
            .into()),
            other => Err(DeviceError::Protocol {
                host: self.host.clone(),
                message: format!("unexpected handshake event '{}'", other),
            }
            .into()),
        }
    }

    /// Read the next text frame as an event.
    async fn next_event(&self, channel: &mut Channel) -> Result<ChannelEvent, CoreError> {
        let host = self.host.clone();
        timeout(self.options.timeout, async {
            while let Some(msg) = channel.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        debug!(host = %host, frame = %text, "received");
                        return parse_event(&text, &host).map_err(CoreError::from);
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(e) => {
                        return Err(CoreError::from(DeviceError::Protocol {
                            host: host.clone(),
                            message: format!("WebSocket error: {}", e),
                        }))
                    }
                }
            }

            Err(CoreError::from(DeviceError::Protocol {
                host: host.clone(),
                message: "channel closed before a reply arrived".to_string(),
            }))
        })
        .await
        .map_err(|_| self.timeout_error())?
    }

    async fn send(&self, channel: &mut Channel, message: &Value) -> Result<(), CoreError> {
        channel
            .send(Message::Text(message.to_string()))
            .await
            .map_err(|e| {
                DeviceError::Protocol {
                    host: self.host.clone(),
                    message: format!("WebSocket send error: {}", e),
                }
                .into()
            })
    }

    /// Open a channel, send one message and close.
    async fn send_once(&mut self, message: Value) -> Result<(), CoreError> {
        let mut channel = self.open_channel().await?;
        self.send(&mut channel, &message).await?;
        let _ = channel.close(None).await;
        Ok(())
    }
}

impl TvRemote for SamsungRemote {
    fn set_token(&mut self, token: String) {
        self.token = (!token.is_empty()).then_some(token);
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    async fn toggle_power(&mut self) -> Result<(), CoreError> {
        self.send_once(Commands::click_key(KEY_POWER)).await
    }

    async fn open_browser(&mut self, url: &str) -> Result<(), CoreError> {
        self.send_once(Commands::open_browser(url)).await
    }

    async fn list_apps(&mut self) -> Result<Vec<AppInfo>, CoreError> {
        let mut channel = self.open_channel().await?;
        self.send(&mut channel, &Commands::installed_apps()).await?;

        loop {
            let event = self.next_event(&mut channel).await?;
            if event.event == EVENT_INSTALLED_APPS {
                let apps = parse_installed_apps(&event, &self.host)?;
                let _ = channel.close(None).await;
                return Ok(apps);
            }
            debug!(host = %self.host, event = %event.event, "skipping unrelated event");
        }
    }

    async fn launch_app(&mut self, app_id: &str) -> Result<(), CoreError> {
        self.send_once(Commands::launch_app(app_id)).await
    }

    async fn app_status(&mut self, app_id: &str) -> Result<Value, CoreError> {
        self.rest.app_status(app_id).await
    }

    async fn app_run(&mut self, app_id: &str) -> Result<Value, CoreError> {
        self.rest.app_run(app_id).await
    }

    async fn app_close(&mut self, app_id: &str) -> Result<Value, CoreError> {
        self.rest.app_close(app_id).await
    }

    async fn app_install(&mut self, app_id: &str) -> Result<Value, CoreError> {
        self.rest.app_install(app_id).await
    }

    async fn device_descriptor(&mut self) -> Result<DeviceDescriptor, CoreError> {
        self.rest.device_info().await.map(DeviceDescriptor)
    }
}
