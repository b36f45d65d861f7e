// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gateway configuration.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::session::Credentials;

/// Connection and polling settings of one gateway.
///
/// Deserializes from the platform's configuration; every field except the
/// host and the credentials has a default.
///
/// # Examples
///
/// ```
/// use openmotics_lib::GatewayConfig;
/// use std::time::Duration;
///
/// let config: GatewayConfig = serde_json::from_str(
///     r#"{"host": "192.168.1.20", "username": "admin", "password": "secret"}"#,
/// )
/// .unwrap();
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.poll_interval(), Duration::from_secs(5));
/// assert_eq!(config.session_lease_secs, 3600);
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Gateway host name or IP address.
    pub host: String,
    /// Port, if not the scheme's default.
    pub port: Option<u16>,
    /// Talk HTTPS to the gateway.
    pub use_https: bool,
    /// Accept self-signed gateway certificates.
    pub accept_invalid_certs: bool,
    /// Login user.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Delay between the end of one poll and the start of the next.
    pub poll_interval_secs: u64,
    /// Session lease requested at login.
    pub session_lease_secs: u32,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl GatewayConfig {
    /// Default poll interval in seconds.
    pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
    /// Default session lease in seconds.
    pub const DEFAULT_SESSION_LEASE_SECS: u32 = 3600;
    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            ..Self::default()
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

    /// Sets the poll interval.
    #[must_use]
    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Checks that the configuration can be used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if the host or a credential is
    /// empty, and `ConfigError::InvalidValue` for zero intervals.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingField("host"));
        }
        if self.username.is_empty() {
            return Err(ConfigError::MissingField("username"));
        }
        if self.password.is_empty() {
            return Err(ConfigError::MissingField("password"));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_secs",
                message: "must be at least 1 second".to_string(),
            });
        }
        if self.session_lease_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session_lease_secs",
                message: "must be at least 1 second".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                message: "must be at least 1 second".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the login credentials.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }

    /// Returns the poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Returns the transport configuration.
    #[cfg(feature = "http")]
    #[must_use]
    pub fn http_config(&self) -> crate::protocol::HttpConfig {
        let mut http = crate::protocol::HttpConfig::new(self.host.trim())
            .with_timeout(Duration::from_secs(self.timeout_secs));
        if let Some(port) = self.port {
            http = http.with_port(port);
        }
        if !self.use_https {
            http = http.with_plain_http();
        }
        if !self.accept_invalid_certs {
            http = http.with_certificate_validation();
        }
        http
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: None,
            use_https: true,
            accept_invalid_certs: true,
            username: String::new(),
            password: String::new(),
            poll_interval_secs: Self::DEFAULT_POLL_INTERVAL_SECS,
            session_lease_secs: Self::DEFAULT_SESSION_LEASE_SECS,
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("use_https", &self.use_https)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("session_lease_secs", &self.session_lease_secs)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
