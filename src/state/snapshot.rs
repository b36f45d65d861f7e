// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Complete output state as of one poll cycle.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::protocol::OutputStatusRecord;
use crate::types::OutputId;

use super::OutputState;

/// Mapping from output id to its state, built fresh on every poll.
///
/// A snapshot is never modified after construction. The state store publishes
/// whole snapshots, so a reader always sees the outputs of exactly one poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    states: HashMap<OutputId, OutputState>,
    fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Creates an empty snapshot that was never fetched.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot from the records of a `get_output_status` response.
    ///
    /// If the gateway lists the same id twice, the last record wins.
    #[must_use]
    pub fn from_records(records: &[OutputStatusRecord]) -> Self {
        Self::from_states(records.iter().map(OutputState::from))
    }

    /// Builds a snapshot from output states, stamped with the current time.
    #[must_use]
    pub fn from_states(states: impl IntoIterator<Item = OutputState>) -> Self {
        Self {
            states: states.into_iter().map(|s| (s.id(), s)).collect(),
            fetched_at: Some(Utc::now()),
        }
    }

    /// Returns the state of an output.
    #[must_use]
    pub fn get(&self, id: OutputId) -> Option<&OutputState> {
        self.states.get(&id)
    }

    /// Returns `true` if the snapshot contains the output.
    #[must_use]
    pub fn contains(&self, id: OutputId) -> bool {
        self.states.contains_key(&id)
    }

    /// Iterates over all output states, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &OutputState> {
        self.states.values()
    }

    /// Returns the number of outputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if no outputs are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns when this snapshot was fetched, or `None` for the initial
    /// empty snapshot.
    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}
