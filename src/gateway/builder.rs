// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builder for [`Gateway`].

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::dispatch::ChangeDispatcher;
use crate::event::EventBus;
use crate::protocol::GatewayApi;
use crate::session::{Credentials, DEFAULT_LEASE_SECS, SessionManager};
use crate::state::StateStore;

use super::lifecycle::Lifecycle;
use super::poll::DEFAULT_POLL_INTERVAL;
use super::Gateway;

/// Builder for a [`Gateway`] around any [`GatewayApi`] implementation.
///
/// # Examples
///
/// ```no_run
/// use openmotics_lib::gateway::Gateway;
/// use openmotics_lib::protocol::HttpClient;
/// use openmotics_lib::session::Credentials;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), openmotics_lib::Error> {
/// let client = HttpClient::new("https://192.168.1.20")?;
/// let gateway = Gateway::builder(client, Credentials::new("admin", "secret"))
///     .with_poll_interval(Duration::from_secs(2))
///     .build();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
#[must_use]
pub struct GatewayBuilder<C> {
    client: C,
    credentials: Credentials,
    poll_interval: Duration,
    lease_secs: u32,
    event_capacity: Option<usize>,
}

impl<C: GatewayApi + 'static> GatewayBuilder<C> {
    pub(super) fn new(client: C, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
            poll_interval: DEFAULT_POLL_INTERVAL,
            lease_secs: DEFAULT_LEASE_SECS,
            event_capacity: None,
        }
    }

    /// Sets the delay between two poll cycles.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the session lease requested at login, in seconds.
    pub fn with_session_lease(mut self, secs: u32) -> Self {
        self.lease_secs = secs;
        self
    }

    /// Sets the capacity of the event bus.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity);
        self
    }

    /// Wires up the gateway components.
    ///
    /// The gateway starts [`Uninitialized`](super::GatewayStatus::Uninitialized);
    /// call [`Gateway::initialize`] to log in and start polling.
    pub fn build(self) -> Gateway<C> {
        let events = self
            .event_capacity
            .map_or_else(EventBus::new, EventBus::with_capacity);
        let lifecycle = Arc::new(Lifecycle::new(events.clone()));
        let client = Arc::new(self.client);
        let session = Arc::new(SessionManager::new(
            Arc::clone(&client),
            self.credentials,
            self.lease_secs,
            Arc::clone(&lifecycle),
        ));

        Gateway {
            client,
            session,
            store: Arc::new(StateStore::new()),
            dispatcher: Arc::new(ChangeDispatcher::new()),
            lifecycle,
            events,
            poll_interval: self.poll_interval,
            cycle_lock: Arc::new(tokio::sync::Mutex::new(())),
            poll_task: Mutex::new(None),
        }
    }
}
