// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gateway event types.

use crate::gateway::GatewayStatus;
use crate::state::ChangeSet;

/// Events emitted by a gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    /// The gateway moved to a new status.
    StatusChanged(GatewayStatus),

    /// A poll cycle found outputs whose state changed.
    ///
    /// Only published for non-empty change sets.
    OutputsChanged(ChangeSet),
}

impl GatewayEvent {
    /// Returns the change set if this is an [`GatewayEvent::OutputsChanged`]
    /// event.
    #[must_use]
    pub fn changes(&self) -> Option<&ChangeSet> {
        match self {
            Self::OutputsChanged(changes) => Some(changes),
            Self::StatusChanged(_) => None,
        }
    }
}
