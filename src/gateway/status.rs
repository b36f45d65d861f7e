// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Externally visible gateway status.

use std::fmt;

/// Status of a gateway as seen by the automation platform.
///
/// ```text
/// Uninitialized -> Authenticating -> Online -> Offline
///                        ^                        |
///                        +---- initialize() ------+
/// ```
///
/// Polling runs only while the gateway is [`GatewayStatus::Online`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GatewayStatus {
    /// Created but never initialized.
    #[default]
    Uninitialized,
    /// Logging in.
    Authenticating,
    /// Logged in and polling.
    Online,
    /// Polling stopped.
    Offline {
        /// Category of the failure, if any.
        detail: StatusDetail,
        /// Human-readable explanation.
        reason: String,
    },
}

/// Reason category attached to [`GatewayStatus::Offline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDetail {
    /// Stopped on request.
    None,
    /// The gateway could not be reached or refused the session.
    CommunicationError,
}

impl GatewayStatus {
    /// Creates an offline status caused by a communication error.
    #[must_use]
    pub fn communication_error(reason: impl Into<String>) -> Self {
        Self::Offline {
            detail: StatusDetail::CommunicationError,
            reason: reason.into(),
        }
    }

    /// Returns `true` while the gateway is online.
    #[must_use]
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }

    /// Returns `true` if the gateway is offline for any reason.
    #[must_use]
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Offline { .. })
    }
}

impl fmt::Display for GatewayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "UNINITIALIZED"),
            Self::Authenticating => write!(f, "AUTHENTICATING"),
            Self::Online => write!(f, "ONLINE"),
            Self::Offline {
                detail: StatusDetail::None,
                reason,
            } => write!(f, "OFFLINE ({reason})"),
            Self::Offline {
                detail: StatusDetail::CommunicationError,
                reason,
            } => write!(f, "OFFLINE - COMMUNICATION_ERROR ({reason})"),
        }
    }
}
