// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Set of outputs that changed between two consecutive snapshots.

use std::collections::BTreeSet;

use crate::types::OutputId;

use super::Snapshot;

/// Ordered, duplicate-free set of output ids whose state changed.
///
/// An output counts as changed when it is present in the newer snapshot and
/// either absent from the older one or reported with different values.
/// Outputs that disappear from the newer snapshot are not reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    ids: BTreeSet<OutputId>,
}

impl ChangeSet {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the outputs that changed from `previous` to `current`.
    #[must_use]
    pub fn between(previous: &Snapshot, current: &Snapshot) -> Self {
        current
            .iter()
            .filter(|state| previous.get(state.id()) != Some(*state))
            .map(|state| state.id())
            .collect()
    }

    /// Returns `true` if the output changed.
    #[must_use]
    pub fn contains(&self, id: OutputId) -> bool {
        self.ids.contains(&id)
    }

    /// Returns the number of changed outputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates over the changed ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = OutputId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<OutputId> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = OutputId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
