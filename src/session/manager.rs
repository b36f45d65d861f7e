// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Login flow and the one-shot re-authentication protocol.

use std::future::Future;
use std::sync::Arc;

use crate::error::ProtocolError;
use crate::gateway::StatusDetail;
use crate::gateway::lifecycle::Lifecycle;
use crate::protocol::GatewayApi;

use super::{Credentials, RetryBudget};

/// Default session lease requested at login, in seconds.
pub const DEFAULT_LEASE_SECS: u32 = 3600;

/// Owns the session token lifecycle of one gateway.
///
/// The token itself lives in the client's [`BearerToken`](super::BearerToken)
/// slot. The session manager is the only writer.
pub struct SessionManager<C> {
    client: Arc<C>,
    credentials: Credentials,
    lease_secs: u32,
    lifecycle: Arc<Lifecycle>,
}

impl<C: GatewayApi> SessionManager<C> {
    pub(crate) fn new(
        client: Arc<C>,
        credentials: Credentials,
        lease_secs: u32,
        lifecycle: Arc<Lifecycle>,
    ) -> Self {
        Self {
            client,
            credentials,
            lease_secs,
            lifecycle,
        }
    }

    /// Returns the session lease requested at login.
    #[must_use]
    pub fn lease_secs(&self) -> u32 {
        self.lease_secs
    }

    /// Returns `true` while a session token is held.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.client.bearer_token().is_set()
    }

    /// Logs in with the configured credentials.
    ///
    /// The previous token is dropped before the call. On failure the gateway
    /// goes offline with a communication error, which also stops polling.
    pub async fn authenticate(&self) -> bool {
        let token = self.client.bearer_token();
        token.clear();

        tracing::debug!(
            username = self.credentials.username(),
            lease_secs = self.lease_secs,
            "Logging in"
        );

        let response = self
            .client
            .login(
                self.credentials.username(),
                self.credentials.password(),
                true,
                self.lease_secs,
            )
            .await;

        match response {
            Ok(response) if response.success => {
                if let Some(new_token) = response.token.filter(|t| !t.is_empty()) {
                    token.set(new_token);
                    tracing::debug!("Login succeeded");
                    return true;
                }
                tracing::error!("Login succeeded without a token");
            }
            Ok(_) => tracing::error!("Login failed"),
            Err(e) => tracing::error!(error = %e, "Gateway API call failed during login"),
        }

        token.clear();
        self.lifecycle
            .go_offline(StatusDetail::CommunicationError, "Authentication failed");
        false
    }

    /// Decides whether a failed call may be retried.
    ///
    /// Only `401 Unauthorized` is recoverable: with `allow_reauth` set the
    /// session is re-established and the result of that login is returned.
    /// Every other failure is logged and reported as not retryable.
    pub async fn classify_failure(&self, error: &ProtocolError, allow_reauth: bool) -> bool {
        if error.is_auth_denied() {
            if allow_reauth {
                tracing::debug!("Authorization denied, logging in again");
                return self.authenticate().await;
            }
            tracing::warn!("Authorization denied after re-login, giving up");
            return false;
        }

        tracing::error!(error = %error, code = ?error.status_code(), "Gateway API call failed");
        false
    }

    /// Runs a gateway call, re-authenticating and retrying it at most once
    /// on `401 Unauthorized`.
    ///
    /// A 401 that survives the retry takes the gateway offline.
    ///
    /// # Errors
    ///
    /// Returns the last `ProtocolError` when the call could not be completed.
    pub async fn with_reauth<T, F, Fut>(&self, mut call: F) -> Result<T, ProtocolError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProtocolError>>,
    {
        let mut budget = RetryBudget::single();

        loop {
            let error = match call().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            let allow_reauth = budget.try_consume();
            if self.classify_failure(&error, allow_reauth).await {
                continue;
            }

            if error.is_auth_denied() && !allow_reauth {
                self.client.bearer_token().clear();
                self.lifecycle.go_offline(
                    StatusDetail::CommunicationError,
                    "Authentication failed after retry",
                );
            }
            return Err(error);
        }
    }
}

impl<C> std::fmt::Debug for SessionManager<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("credentials", &self.credentials)
            .field("lease_secs", &self.lease_secs)
            .finish_non_exhaustive()
    }
}
