// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `OpenMotics` library.
//!
//! Gateway calls fail with a [`ProtocolError`], which is either a transport
//! failure (no HTTP status available) or a structured API failure carrying the
//! HTTP status code. Only `401 Unauthorized` is treated specially: it triggers
//! the one-shot re-authentication protocol of the session layer.

use thiserror::Error;

/// HTTP status code the gateway returns when a bearer token is missing,
/// expired or revoked.
pub const AUTH_FAIL_CODE: u16 = 401;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the gateway.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The gateway configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The gateway is not online, so the operation was not attempted.
    #[error("gateway is not connected")]
    NotConnected,

    /// Logging in to the gateway failed.
    #[error("authentication failed")]
    AuthenticationFailed,
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// An unknown output module type was reported by the gateway.
    #[error("unknown output module type: {0}")]
    UnknownModuleType(char),
}

/// Errors produced by gateway calls.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed before a response was received.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the gateway failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The gateway answered with a non-success HTTP status.
    #[error("gateway returned HTTP {code}: {message}")]
    Api {
        /// HTTP status code.
        code: u16,
        /// Reason phrase or response body.
        message: String,
    },

    /// The gateway answered `success: false` to a request.
    #[error("request rejected by gateway: {0}")]
    Rejected(String),

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl ProtocolError {
    /// Returns the HTTP status code attached to this failure, if any.
    ///
    /// Transport failures have no status code.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => Some(*code),
            #[cfg(feature = "http")]
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the gateway denied the request for lack of a valid
    /// session.
    #[must_use]
    pub fn is_auth_denied(&self) -> bool {
        self.status_code() == Some(AUTH_FAIL_CODE)
    }

    /// Returns `true` for failures that happened below the HTTP layer.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.status_code().is_none()
            && !matches!(self, Self::Rejected(_) | Self::InvalidResponse(_))
    }
}

/// Errors related to gateway configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is missing or empty.
    #[error("missing configuration field: {0}")]
    MissingField(&'static str),

    /// A field holds an unusable value.
    #[error("invalid {field}: {message}")]
    InvalidValue {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: 150,
        };
        assert_eq!(err.to_string(), "value 150 is out of range [0, 100]");
    }

    #[test]
    fn api_error_exposes_status_code() {
        let err = ProtocolError::Api {
            code: 401,
            message: "invalid_token".to_string(),
        };
        assert_eq!(err.status_code(), Some(401));
        assert!(err.is_auth_denied());
        assert!(!err.is_transport());
    }

    #[test]
    fn server_error_is_not_auth_denied() {
        let err = ProtocolError::Api {
            code: 500,
            message: "Internal Server Error".to_string(),
        };
        assert!(!err.is_auth_denied());
    }

    #[test]
    fn connection_failure_is_transport() {
        let err = ProtocolError::ConnectionFailed("refused".to_string());
        assert_eq!(err.status_code(), None);
        assert!(err.is_transport());
        assert!(!ProtocolError::Rejected("nope".to_string()).is_transport());
    }

    #[test]
    fn error_from_config_error() {
        let err: Error = ConfigError::MissingField("host").into();
        assert!(matches!(err, Error::Config(ConfigError::MissingField("host"))));
        assert_eq!(
            err.to_string(),
            "configuration error: missing configuration field: host"
        );
    }
}
