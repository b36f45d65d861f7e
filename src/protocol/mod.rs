// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gateway API client.
//!
//! The [`GatewayApi`] trait is the narrow contract the polling core needs from
//! the gateway: log in, fetch the status of all outputs, and switch or dim an
//! output. [`HttpClient`] implements it over the gateway's REST API.
//!
//! Every call carries the current bearer token as an
//! `Authorization: Bearer <token>` header. The token lives in the client's
//! [`BearerToken`] slot; the session layer writes it, the transport reads it.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpClient, HttpConfig};

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::session::BearerToken;
use crate::types::{DimmerLevel, OutputId, PowerState};

/// Result of a login call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    /// Whether the gateway accepted the credentials.
    #[serde(default)]
    pub success: bool,
    /// The session token, present when `success` is `true`.
    #[serde(default)]
    pub token: Option<String>,
}

impl LoginResponse {
    /// Creates a successful login response carrying a token.
    #[must_use]
    pub fn accepted(token: impl Into<String>) -> Self {
        Self {
            success: true,
            token: Some(token.into()),
        }
    }

    /// Creates a login response for rejected credentials.
    #[must_use]
    pub fn rejected() -> Self {
        Self::default()
    }
}

/// One entry of the `get_output_status` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputStatusRecord {
    /// Output id.
    pub id: OutputId,
    /// Raw status; 1 means on.
    pub status: u8,
    /// Dimmer level (0-100).
    #[serde(default)]
    pub dimmer: u8,
    /// Remaining countdown timer.
    #[serde(default)]
    pub ctimer: u32,
}

/// Operations the polling core performs against the gateway.
///
/// Futures returned by the trait are `Send` so that calls can be driven from
/// the background poll task.
pub trait GatewayApi: Send + Sync {
    /// Returns the token slot injected into every request.
    fn bearer_token(&self) -> &BearerToken;

    /// Logs in and requests a session lease of `lease_secs` seconds.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on transport or protocol failure. Rejected
    /// credentials are reported through [`LoginResponse::success`].
    fn login(
        &self,
        username: &str,
        password: &str,
        extend_session: bool,
        lease_secs: u32,
    ) -> impl Future<Output = Result<LoginResponse, ProtocolError>> + Send;

    /// Fetches the status of every output.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on transport or protocol failure.
    fn get_output_status(
        &self,
    ) -> impl Future<Output = Result<Vec<OutputStatusRecord>, ProtocolError>> + Send;

    /// Switches an output, optionally with a countdown timer and dimmer level.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on transport or protocol failure.
    fn set_output(
        &self,
        id: OutputId,
        state: PowerState,
        timer: Option<u32>,
        dimmer: Option<DimmerLevel>,
    ) -> impl Future<Output = Result<(), ProtocolError>> + Send;

    /// Runs a group action.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on transport or protocol failure.
    fn do_group_action(&self, id: u32) -> impl Future<Output = Result<(), ProtocolError>> + Send;
}
