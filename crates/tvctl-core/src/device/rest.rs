//! HTTP client for the TV's REST API.

use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::Value;
use tracing::debug;

use crate::error::{CoreError, DeviceError};
use crate::protocol::response::parse_rest_body;

/// REST endpoints under `http://<host>:<port>/api/v2/`.
pub struct RestClient {
    host: String,
    base_url: String,
    client: Client,
}

impl RestClient {
    pub fn new(host: &str, port: u16, timeout: Duration) -> Result<Self, CoreError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            DeviceError::Http {
                host: host.to_string(),
                message: format!("HTTP client error: {}", e),
            }
        })?;

        Ok(Self {
            host: host.to_string(),
            base_url: format!("http://{}:{}/api/v2/", host, port),
            client,
        })
    }

    fn app_url(&self, app_id: &str) -> String {
        format!("{}applications/{}", self.base_url, app_id)
    }

    /// Device descriptor document.
    pub async fn device_info(&self) -> Result<Value, CoreError> {
        self.request(Method::GET, self.base_url.clone()).await
    }

    pub async fn app_status(&self, app_id: &str) -> Result<Value, CoreError> {
        self.request(Method::GET, self.app_url(app_id)).await
    }

    pub async fn app_run(&self, app_id: &str) -> Result<Value, CoreError> {
        self.request(Method::POST, self.app_url(app_id)).await
    }

    pub async fn app_close(&self, app_id: &str) -> Result<Value, CoreError> {
        self.request(Method::DELETE, self.app_url(app_id)).await
    }

    /// Install from the official store.
    pub async fn app_install(&self, app_id: &str) -> Result<Value, CoreError> {
        self.request(Method::PUT, self.app_url(app_id)).await
    }

    async fn request(&self, method: Method, url: String) -> Result<Value, CoreError> {
        debug!(host = %self.host, %method, %url, "REST request");

        let response = self
            .client
            .request(method, &url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(DeviceError::Http {
                host: self.host.clone(),
                message: format!("{} returned {}: {}", url, status, body),
            }
            .into());
        }

        Ok(parse_rest_body(&body))
    }

    fn transport_error(&self, e: reqwest::Error) -> CoreError {
        let host = self.host.clone();
        if e.is_timeout() {
            DeviceError::Timeout { host }.into()
        } else if e.is_connect() {
            DeviceError::Connect {
                host,
                message: e.to_string(),
            }
            .into()
        } else {
            DeviceError::Http {
                host,
                message: e.to_string(),
            }
            .into()
        }
    }
}
