// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The gateway bridge.
//!
//! A [`Gateway`] composes the polling core for one gateway: the API client,
//! the [`SessionManager`], the [`StateStore`], the [`ChangeDispatcher`] and
//! the background poll task. It owns the status state machine:
//!
//! ```text
//! Uninitialized -> Authenticating -> Online (polling) -> Offline (stopped)
//! ```
//!
//! `Offline` is left only through an explicit [`Gateway::initialize`]. The
//! gateway goes offline when authentication is lost or when it is disposed.
//!
//! # Examples
//!
//! ```no_run
//! use openmotics_lib::{Gateway, GatewayConfig};
//! use openmotics_lib::thing::{Channel, ThingCommand, ThingKind};
//! use openmotics_lib::types::PowerState;
//!
//! # async fn example() -> Result<(), openmotics_lib::Error> {
//! let config = GatewayConfig::new("192.168.1.20", "admin", "secret");
//! let gateway = Gateway::from_config(&config)?;
//! gateway.initialize().await?;
//!
//! let kitchen = gateway.attach_thing(5, ThingKind::Output);
//! kitchen
//!     .handle_command(Channel::Relay, ThingCommand::OnOff(PowerState::On))
//!     .await?;
//!
//! gateway.dispose().await;
//! # Ok(())
//! # }
//! ```

mod builder;
pub(crate) mod lifecycle;
mod poll;
mod status;

pub use builder::GatewayBuilder;
pub use poll::DEFAULT_POLL_INTERVAL;
pub use status::{GatewayStatus, StatusDetail};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::dispatch::ChangeDispatcher;
use crate::error::{Error, Result};
use crate::event::{EventBus, GatewayEvent};
use crate::protocol::GatewayApi;
use crate::session::{Credentials, SessionManager};
use crate::state::{ChangeSet, StateStore};
use crate::thing::{Thing, ThingHandler, ThingKind};

use lifecycle::Lifecycle;
use poll::PollLoop;

/// A polled gateway.
///
/// Dropping the gateway stops polling; [`dispose`](Self::dispose) additionally
/// waits for the poll task to finish.
pub struct Gateway<C> {
    client: Arc<C>,
    session: Arc<SessionManager<C>>,
    store: Arc<StateStore>,
    dispatcher: Arc<ChangeDispatcher>,
    lifecycle: Arc<Lifecycle>,
    events: EventBus,
    poll_interval: Duration,
    cycle_lock: Arc<tokio::sync::Mutex<()>>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

#[cfg(feature = "http")]
impl Gateway<crate::protocol::HttpClient> {
    /// Creates a gateway talking HTTP(S) to the configured host.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is incomplete and
    /// `Error::Protocol` if the HTTP client cannot be created.
    pub fn from_config(config: &crate::config::GatewayConfig) -> Result<Self> {
        config.validate()?;
        let client = config.http_config().into_client()?;

        Ok(Self::builder(client, config.credentials())
            .with_poll_interval(config.poll_interval())
            .with_session_lease(config.session_lease_secs)
            .build())
    }
}

impl<C: GatewayApi + 'static> Gateway<C> {
    /// Creates a gateway with default settings.
    #[must_use]
    pub fn new(client: C, credentials: Credentials) -> Self {
        Self::builder(client, credentials).build()
    }

    /// Returns a builder for a gateway.
    pub fn builder(client: C, credentials: Credentials) -> GatewayBuilder<C> {
        GatewayBuilder::new(client, credentials)
    }

    /// Logs in and starts polling.
    ///
    /// Any running poll loop is stopped first, so this also reconnects an
    /// online or offline gateway.
    ///
    /// # Errors
    ///
    /// Returns `Error::AuthenticationFailed` if the login is rejected or the
    /// gateway cannot be reached; the gateway is then offline.
    pub async fn initialize(&self) -> Result<()> {
        self.lifecycle.begin_authenticating();

        if !self.session.authenticate().await {
            return Err(Error::AuthenticationFailed);
        }

        let cancel = self.lifecycle.go_online();
        let handle = tokio::spawn(self.poll_loop().run(cancel));
        if let Some(previous) = self.poll_task.lock().replace(handle) {
            previous.abort();
        }

        tracing::info!(interval = ?self.poll_interval, "Gateway initialized");
        Ok(())
    }

    /// Stops polling, waits for the poll task and drops the session token.
    pub async fn dispose(&self) {
        self.lifecycle.go_offline(StatusDetail::None, "Gateway disposed");

        let handle = self.poll_task.lock().take();
        if let Some(handle) = handle
            && let Err(e) = handle.await
            && !e.is_cancelled()
        {
            tracing::warn!(error = %e, "Poll task ended abnormally");
        }

        self.client.bearer_token().clear();
        tracing::debug!("Gateway disposed");
    }

    /// Runs one poll cycle now, outside the regular schedule.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotConnected` unless the gateway is online.
    pub async fn refresh(&self) -> Result<ChangeSet> {
        if !self.lifecycle.is_online() {
            return Err(Error::NotConnected);
        }
        let cancel = self.lifecycle.poll_token();
        Ok(self.poll_loop().run_cycle(&cancel).await)
    }

    /// Creates a thing for a gateway output, group action or input and
    /// attaches it to the change dispatcher.
    ///
    /// Output and dimmer things render the latest snapshot immediately.
    pub fn attach_thing(&self, id: u32, kind: ThingKind) -> Arc<Thing<C>> {
        let thing = Arc::new(Thing::new(
            id,
            kind,
            Arc::clone(&self.client),
            Arc::clone(&self.session),
            Arc::clone(&self.store),
            Arc::clone(&self.lifecycle),
        ));
        thing.request_refresh();
        self.dispatcher.attach(Arc::clone(&thing) as Arc<dyn ThingHandler>);
        thing
    }

    /// Attaches a custom thing to the change dispatcher.
    pub fn attach(&self, thing: Arc<dyn ThingHandler>) {
        self.dispatcher.attach(thing);
    }

    /// Detaches a thing. Returns `true` if it was attached.
    pub fn detach_thing(&self, kind: ThingKind, id: u32) -> bool {
        self.dispatcher.detach(kind, id)
    }

    fn poll_loop(&self) -> PollLoop<C> {
        PollLoop {
            client: Arc::clone(&self.client),
            session: Arc::clone(&self.session),
            store: Arc::clone(&self.store),
            dispatcher: Arc::clone(&self.dispatcher),
            events: self.events.clone(),
            cycle_lock: Arc::clone(&self.cycle_lock),
            interval: self.poll_interval,
        }
    }
}

impl<C> Gateway<C> {
    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> GatewayStatus {
        self.lifecycle.status()
    }

    /// Subscribes to status changes.
    #[must_use]
    pub fn subscribe_status(&self) -> watch::Receiver<GatewayStatus> {
        self.lifecycle.subscribe()
    }

    /// Subscribes to gateway events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.events.subscribe()
    }

    /// Returns the state store.
    #[must_use]
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// Returns the session manager.
    #[must_use]
    pub fn session(&self) -> &SessionManager<C> {
        &self.session
    }

    /// Returns the API client.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the number of attached things.
    #[must_use]
    pub fn thing_count(&self) -> usize {
        self.dispatcher.len()
    }

    /// Returns the delay between two poll cycles.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl<C> Drop for Gateway<C> {
    fn drop(&mut self) {
        self.lifecycle.cancel_polling();
    }
}

impl<C> fmt::Debug for Gateway<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("status", &self.lifecycle.status())
            .field("poll_interval", &self.poll_interval)
            .field("things", &self.dispatcher.len())
            .finish_non_exhaustive()
    }
}
