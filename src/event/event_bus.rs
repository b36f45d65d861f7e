// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast channel carrying gateway events.

use tokio::sync::broadcast;

use super::GatewayEvent;

/// Events buffered per subscriber before the oldest are dropped.
const DEFAULT_CAPACITY: usize = 256;

/// Fan-out of [`GatewayEvent`]s to any number of subscribers.
///
/// Clones publish into the same channel. A subscriber that falls more than
/// the capacity behind skips the oldest events and gets
/// `RecvError::Lagged` once.
///
/// ```
/// use openmotics_lib::event::{EventBus, GatewayEvent};
/// use openmotics_lib::state::ChangeSet;
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// let delivered = bus.publish(GatewayEvent::OutputsChanged(ChangeSet::new()));
/// assert_eq!(delivered, 1);
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<GatewayEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to 256 events per subscriber.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a bus buffering up to `capacity` events per subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tx: broadcast::channel(capacity).0,
        }
    }

    /// Returns a receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.tx.subscribe()
    }

    /// Returns the number of live receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Sends an event to every receiver and returns how many got it.
    ///
    /// Publishing without receivers is not an error; the event is dropped.
    pub fn publish(&self, event: GatewayEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
