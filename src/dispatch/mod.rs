// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Routing of per-cycle output changes to attached things.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::state::ChangeSet;
use crate::thing::{ThingHandler, ThingKind};
use crate::types::OutputId;

/// Refreshes only the things whose output changed in a poll cycle.
///
/// Things are attached and detached by the platform while the poll loop is
/// running. Dispatch works on a copy of the attachment list, so handlers run
/// without the lock held and may themselves attach or detach things.
#[derive(Default)]
pub struct ChangeDispatcher {
    things: RwLock<Vec<Arc<dyn ThingHandler>>>,
}

impl ChangeDispatcher {
    /// Creates a dispatcher with no attached things.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a thing, replacing any thing with the same kind and id.
    pub fn attach(&self, thing: Arc<dyn ThingHandler>) {
        let mut things = self.things.write();
        things.retain(|t| !(t.kind() == thing.kind() && t.id() == thing.id()));
        tracing::debug!(kind = %thing.kind(), id = thing.id(), "Thing attached");
        things.push(thing);
    }

    /// Detaches a thing. Returns `true` if it was attached.
    pub fn detach(&self, kind: ThingKind, id: u32) -> bool {
        let mut things = self.things.write();
        let before = things.len();
        things.retain(|t| !(t.kind() == kind && t.id() == id));
        before != things.len()
    }

    /// Returns the number of attached things.
    #[must_use]
    pub fn len(&self) -> usize {
        self.things.read().len()
    }

    /// Returns `true` if no thing is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.things.read().is_empty()
    }

    /// Asks every attached output or dimmer whose id is in `changes` to
    /// refresh. Returns the number of things refreshed.
    pub fn dispatch(&self, changes: &ChangeSet) -> usize {
        if changes.is_empty() {
            return 0;
        }

        let things = self.things.read().clone();
        let mut refreshed = 0;

        for thing in things
            .iter()
            .filter(|t| t.kind().is_output() && changes.contains(OutputId::new(t.id())))
        {
            thing.request_refresh();
            refreshed += 1;
        }

        tracing::debug!(changed = changes.len(), refreshed, "Dispatched output changes");
        refreshed
    }
}

impl fmt::Debug for ChangeDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeDispatcher")
            .field("things", &self.len())
            .finish()
    }
}
