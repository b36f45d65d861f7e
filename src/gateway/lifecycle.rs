// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status transitions and poll cancellation shared by the gateway parts.

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::event::{EventBus, GatewayEvent};

use super::{GatewayStatus, StatusDetail};

/// Owns the gateway status and the cancellation token of the running poll
/// loop.
///
/// Going offline always cancels the current poll generation, so whoever
/// detects a lost session (the session manager, the poll loop or a command)
/// also stops polling.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    status: watch::Sender<GatewayStatus>,
    poll_cancel: Mutex<CancellationToken>,
    events: EventBus,
}

impl Lifecycle {
    pub(crate) fn new(events: EventBus) -> Self {
        let (status, _) = watch::channel(GatewayStatus::Uninitialized);
        let poll_cancel = CancellationToken::new();
        poll_cancel.cancel();

        Self {
            status,
            poll_cancel: Mutex::new(poll_cancel),
            events,
        }
    }

    pub(crate) fn status(&self) -> GatewayStatus {
        self.status.borrow().clone()
    }

    pub(crate) fn is_online(&self) -> bool {
        self.status.borrow().is_online()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<GatewayStatus> {
        self.status.subscribe()
    }

    /// Returns the token of the current poll generation.
    pub(crate) fn poll_token(&self) -> CancellationToken {
        self.poll_cancel.lock().clone()
    }

    pub(crate) fn begin_authenticating(&self) {
        self.cancel_polling();
        self.set_status(GatewayStatus::Authenticating);
    }

    /// Marks the gateway online and starts a new poll generation.
    pub(crate) fn go_online(&self) -> CancellationToken {
        let token = CancellationToken::new();
        {
            let mut current = self.poll_cancel.lock();
            current.cancel();
            *current = token.clone();
        }
        self.set_status(GatewayStatus::Online);
        token
    }

    /// Stops polling and marks the gateway offline.
    pub(crate) fn go_offline(&self, detail: StatusDetail, reason: impl Into<String>) {
        self.cancel_polling();
        self.set_status(GatewayStatus::Offline {
            detail,
            reason: reason.into(),
        });
    }

    pub(crate) fn cancel_polling(&self) {
        self.poll_cancel.lock().cancel();
    }

    fn set_status(&self, status: GatewayStatus) {
        let changed = self.status.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status.clone();
                true
            }
        });

        if changed {
            tracing::info!(status = %status, "Gateway status changed");
            self.events.publish(GatewayEvent::StatusChanged(status));
        }
    }
}
