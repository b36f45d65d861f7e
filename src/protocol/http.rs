// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP implementation of the gateway API.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ProtocolError;
use crate::protocol::{GatewayApi, LoginResponse, OutputStatusRecord};
use crate::session::BearerToken;
use crate::types::{DimmerLevel, OutputId, PowerState};

// ============================================================================
// HttpConfig - Connection parameters for a gateway
// ============================================================================

/// Connection parameters for a gateway's REST API.
///
/// Gateways serve their API over HTTPS with a self-signed certificate, so
/// HTTPS and certificate acceptance are enabled by default.
///
/// # Examples
///
/// ```
/// use openmotics_lib::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("192.168.1.20")
///     .with_port(8443)
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "https://192.168.1.20:8443");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    port: Option<u16>,
    use_https: bool,
    accept_invalid_certs: bool,
    timeout: Duration,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default HTTPS port.
    pub const DEFAULT_HTTPS_PORT: u16 = 443;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the gateway at `host`.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            use_https: true,
            accept_invalid_certs: true,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Uses plain HTTP instead of HTTPS.
    #[must_use]
    pub fn with_plain_http(mut self) -> Self {
        self.use_https = false;
        self
    }

    /// Requires a certificate that chains to a trusted root.
    #[must_use]
    pub fn with_certificate_validation(mut self) -> Self {
        self.accept_invalid_certs = false;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the effective port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(if self.use_https {
            Self::DEFAULT_HTTPS_PORT
        } else {
            Self::DEFAULT_PORT
        })
    }

    /// Returns whether HTTPS is enabled.
    #[must_use]
    pub fn use_https(&self) -> bool {
        self.use_https
    }

    /// Returns whether invalid certificates are accepted.
    #[must_use]
    pub fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        let port = self.port();
        let port_suffix = if (self.use_https && port == Self::DEFAULT_HTTPS_PORT)
            || (!self.use_https && port == Self::DEFAULT_PORT)
        {
            String::new()
        } else {
            format!(":{port}")
        };
        format!("{scheme}://{}{port_suffix}", self.host)
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        if self.host.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpClient {
            base_url: self.base_url(),
            client,
            token: BearerToken::new(),
        })
    }
}

// ============================================================================
// HttpClient - REST client
// ============================================================================

/// HTTP client for the gateway's REST API.
///
/// Endpoints are plain `GET` requests with query parameters; responses are
/// JSON objects carrying a `success` flag.
///
/// # Examples
///
/// ```no_run
/// use openmotics_lib::protocol::{GatewayApi, HttpClient};
///
/// # async fn example() -> Result<(), openmotics_lib::ProtocolError> {
/// let client = HttpClient::new("http://192.168.1.20")?;
/// let login = client.login("admin", "secret", true, 3600).await?;
/// if let Some(token) = login.token {
///     client.bearer_token().set(token);
/// }
/// let outputs = client.get_output_status().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
    token: BearerToken,
}

/// Envelope of `get_output_status`.
#[derive(Debug, Deserialize)]
struct OutputStatusResponse {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    status: Vec<OutputStatusRecord>,
    #[serde(default)]
    msg: Option<String>,
}

/// Envelope of command endpoints.
#[derive(Debug, Deserialize)]
struct AckResponse {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    msg: Option<String>,
}

fn default_success() -> bool {
    true
}

impl HttpClient {
    /// Creates a client for the gateway at `host`.
    ///
    /// A bare host gets an `https://` prefix; a URL with an explicit scheme is
    /// used as-is.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(host: impl Into<String>) -> Result<Self, ProtocolError> {
        let host = host.into();
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("https://{host}")
        };

        let client = Client::builder()
            .timeout(HttpConfig::DEFAULT_TIMEOUT)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self {
            base_url,
            client,
            token: BearerToken::new(),
        })
    }

    /// Returns the base URL of the gateway.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL for an endpoint with query parameters.
    fn build_url(&self, endpoint: &str, params: &[(&str, String)]) -> String {
        let query = params
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        if query.is_empty() {
            format!("{}/{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}?{query}", self.base_url)
        }
    }

    /// Sends a request, attaching the bearer token if one is set.
    async fn send(&self, url: &str) -> Result<Response, ProtocolError> {
        let mut request = self.client.get(url);
        if let Some(token) = self.token.get() {
            request = request.bearer_auth(token.as_str());
        }

        let response = request.send().await.map_err(ProtocolError::Http)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            let message = response.text().await.unwrap_or_default();
            return Err(ProtocolError::Api {
                code: status.as_u16(),
                message: if message.is_empty() {
                    "Unauthorized".to_string()
                } else {
                    message
                },
            });
        }

        if !status.is_success() {
            return Err(ProtocolError::Api {
                code: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        Ok(response)
    }

    /// Sends a request and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProtocolError> {
        let body = self
            .send(url)
            .await?
            .text()
            .await
            .map_err(ProtocolError::Http)?;

        tracing::trace!(body = %body, "Received gateway response");

        serde_json::from_str(&body).map_err(|e| ProtocolError::InvalidResponse(e.to_string()))
    }

    /// Sends a command and checks the `success` flag of the response.
    async fn send_command(&self, url: &str) -> Result<(), ProtocolError> {
        let ack: AckResponse = self.get_json(url).await?;
        if ack.success {
            Ok(())
        } else {
            Err(ProtocolError::Rejected(
                ack.msg.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

impl GatewayApi for HttpClient {
    fn bearer_token(&self) -> &BearerToken {
        &self.token
    }

    async fn login(
        &self,
        username: &str,
        password: &str,
        extend_session: bool,
        lease_secs: u32,
    ) -> Result<LoginResponse, ProtocolError> {
        let url = self.build_url(
            "login",
            &[
                ("username", username.to_string()),
                ("password", password.to_string()),
                ("extend", extend_session.to_string()),
                ("timeout", lease_secs.to_string()),
            ],
        );

        // The URL carries the password, so only the user is logged.
        tracing::debug!(username = %username, lease_secs, "Sending login request");

        self.get_json(&url).await
    }

    async fn get_output_status(&self) -> Result<Vec<OutputStatusRecord>, ProtocolError> {
        let url = self.build_url("get_output_status", &[]);
        tracing::debug!(url = %url, "Fetching output status");

        let response: OutputStatusResponse = self.get_json(&url).await?;
        if !response.success {
            return Err(ProtocolError::Rejected(
                response.msg.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(response.status)
    }

    async fn set_output(
        &self,
        id: OutputId,
        state: PowerState,
        timer: Option<u32>,
        dimmer: Option<DimmerLevel>,
    ) -> Result<(), ProtocolError> {
        let mut params = vec![
            ("id", id.to_string()),
            ("is_on", state.as_api_str().to_string()),
        ];
        if let Some(dimmer) = dimmer {
            params.push(("dimmer", dimmer.value().to_string()));
        }
        if let Some(timer) = timer {
            params.push(("timer", timer.to_string()));
        }

        let url = self.build_url("set_output", &params);
        tracing::debug!(url = %url, "Sending output command");

        self.send_command(&url).await
    }

    async fn do_group_action(&self, id: u32) -> Result<(), ProtocolError> {
        let url = self.build_url("do_group_action", &[("group_action_id", id.to_string())]);
        tracing::debug!(url = %url, "Running group action");

        self.send_command(&url).await
    }
}
