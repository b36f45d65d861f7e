// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Output, dimmer and group action things backed by a gateway.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::gateway::lifecycle::Lifecycle;
use crate::protocol::GatewayApi;
use crate::session::SessionManager;
use crate::state::StateStore;
use crate::types::{DimmerLevel, OutputId, PowerState};

use super::{Channel, ThingKind};

/// A downstream consumer of output state.
///
/// The change dispatcher calls [`request_refresh`](Self::request_refresh) on
/// every attached output or dimmer whose id changed in a poll cycle. The call
/// must not block: implementations read the state store and return.
pub trait ThingHandler: Send + Sync {
    /// Returns the gateway id this thing represents.
    fn id(&self) -> u32;

    /// Returns the kind of this thing.
    fn kind(&self) -> ThingKind;

    /// Re-reads the latest state from the store.
    fn request_refresh(&self);
}

/// Channel values currently shown by a thing.
///
/// A value is `None` until the output was seen in a poll or commanded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThingState {
    /// Relay channel.
    pub relay: Option<PowerState>,
    /// Dimmer channel.
    pub dimmer: Option<DimmerLevel>,
}

/// A command sent to a thing channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThingCommand {
    /// Re-read the channel from the latest snapshot.
    Refresh,
    /// Switch the output on or off.
    OnOff(PowerState),
    /// Set the dimmer level. Zero switches the output off.
    Percent(DimmerLevel),
    /// Run a group action.
    Run,
}

/// A thing attached to a gateway.
///
/// Obtained from [`Gateway::attach_thing`](crate::gateway::Gateway::attach_thing).
/// Commands go through the gateway's session manager, so they share the
/// re-authentication protocol with the poll loop.
pub struct Thing<C> {
    id: u32,
    kind: ThingKind,
    client: Arc<C>,
    session: Arc<SessionManager<C>>,
    store: Arc<StateStore>,
    lifecycle: Arc<Lifecycle>,
    state: watch::Sender<ThingState>,
}

impl<C: GatewayApi> Thing<C> {
    pub(crate) fn new(
        id: u32,
        kind: ThingKind,
        client: Arc<C>,
        session: Arc<SessionManager<C>>,
        store: Arc<StateStore>,
        lifecycle: Arc<Lifecycle>,
    ) -> Self {
        let (state, _) = watch::channel(ThingState::default());
        Self {
            id,
            kind,
            client,
            session,
            store,
            lifecycle,
            state,
        }
    }

    /// Returns the thing UID, e.g. `oid005`.
    #[must_use]
    pub fn uid(&self) -> String {
        self.kind.thing_uid(self.id)
    }

    /// Returns the channel values currently shown.
    #[must_use]
    pub fn state(&self) -> ThingState {
        *self.state.borrow()
    }

    /// Subscribes to channel value updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ThingState> {
        self.state.subscribe()
    }

    /// Handles a command sent to one of the thing's channels.
    ///
    /// Commands for channels the thing does not have, or that make no sense
    /// for the channel, are ignored. After a successful gateway call the
    /// channel values are updated without waiting for the next poll.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotConnected` if the gateway is not online and
    /// `Error::Protocol` if the gateway call failed.
    pub async fn handle_command(&self, channel: Channel, command: ThingCommand) -> Result<()> {
        if !self.kind.has_channel(channel) {
            tracing::debug!(uid = %self.uid(), channel = channel.id(), "Unknown channel");
            return Ok(());
        }

        match (channel, command) {
            (_, ThingCommand::Refresh) => {
                self.refresh_channel(channel);
                Ok(())
            }
            (Channel::Relay | Channel::Dimmer, ThingCommand::OnOff(power)) => {
                self.switch(power).await
            }
            (Channel::Dimmer, ThingCommand::Percent(level)) => self.dim(level).await,
            (Channel::Action, ThingCommand::Run) => self.run_action().await,
            _ => {
                tracing::debug!(
                    uid = %self.uid(),
                    channel = channel.id(),
                    ?command,
                    "Command not supported on channel"
                );
                Ok(())
            }
        }
    }

    /// Re-reads one channel from the latest snapshot.
    pub fn refresh_channel(&self, channel: Channel) {
        if !self.kind.is_output() {
            return;
        }

        let Some(output) = self.store.get(self.output_id()) else {
            tracing::debug!(uid = %self.uid(), "Output not in latest snapshot");
            return;
        };

        match channel {
            Channel::Relay => self.update(|s| s.relay = Some(output.power())),
            Channel::Dimmer => {
                let level = if output.status() == 0 {
                    DimmerLevel::MIN
                } else {
                    output.dimmer_level()
                };
                self.update(|s| s.dimmer = Some(level));
            }
            Channel::Action => {}
        }
    }

    fn output_id(&self) -> OutputId {
        OutputId::new(self.id)
    }

    fn ensure_online(&self) -> Result<()> {
        if self.lifecycle.is_online() {
            Ok(())
        } else {
            tracing::debug!(uid = %self.uid(), "Gateway not online, dropping command");
            Err(Error::NotConnected)
        }
    }

    async fn switch(&self, power: PowerState) -> Result<()> {
        self.ensure_online()?;
        let id = self.output_id();

        self.session
            .with_reauth(|| self.client.set_output(id, power, None, None))
            .await
            .inspect_err(|e| tracing::warn!(uid = %self.uid(), error = %e, "Switching output failed"))?;

        let dim_off = self.kind == ThingKind::Dimmer && !power.is_on();
        self.update(|s| {
            s.relay = Some(power);
            if dim_off {
                s.dimmer = Some(DimmerLevel::MIN);
            }
        });
        Ok(())
    }

    async fn dim(&self, level: DimmerLevel) -> Result<()> {
        self.ensure_online()?;
        let id = self.output_id();

        let (power, dimmer) = if level.is_off() {
            (PowerState::Off, None)
        } else {
            (PowerState::On, Some(level))
        };

        self.session
            .with_reauth(|| self.client.set_output(id, power, None, dimmer))
            .await
            .inspect_err(|e| tracing::warn!(uid = %self.uid(), error = %e, "Dimming output failed"))?;

        self.update(|s| {
            s.relay = Some(power);
            s.dimmer = Some(level);
        });
        Ok(())
    }

    async fn run_action(&self) -> Result<()> {
        self.ensure_online()?;

        self.session
            .with_reauth(|| self.client.do_group_action(self.id))
            .await
            .inspect_err(|e| {
                tracing::warn!(uid = %self.uid(), error = %e, "Group action failed");
            })?;

        tracing::debug!(uid = %self.uid(), "Group action executed");
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut ThingState)) {
        self.state.send_if_modified(|state| {
            let before = *state;
            apply(state);
            *state != before
        });
    }
}

impl<C: GatewayApi> ThingHandler for Thing<C> {
    fn id(&self) -> u32 {
        self.id
    }

    fn kind(&self) -> ThingKind {
        self.kind
    }

    fn request_refresh(&self) {
        for &channel in self.kind.channels() {
            self.refresh_channel(channel);
        }
    }
}

impl<C> fmt::Debug for Thing<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thing")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
