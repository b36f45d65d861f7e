// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Current and previous output snapshots.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};

use crate::types::OutputId;

use super::{ChangeSet, OutputState, Snapshot};

/// Holds the latest two output snapshots and answers point queries.
///
/// Reads are lock-free and only ever observe `current`. Snapshots are
/// published by swapping a whole [`Snapshot`] in, so a reader never sees a
/// mapping that mixes outputs from two different polls.
///
/// Only the poll cycle writes to the store; the gateway serializes cycles, so
/// `current` and `previous` never change while a diff is being computed.
///
/// # Examples
///
/// ```
/// use openmotics_lib::state::StateStore;
/// use openmotics_lib::types::OutputId;
///
/// let store = StateStore::new();
/// assert!(!store.contains(OutputId::new(5)));
/// assert_eq!(store.status_of(OutputId::new(5)), None);
/// ```
#[derive(Debug)]
pub struct StateStore {
    current: ArcSwap<Snapshot>,
    previous: ArcSwap<Snapshot>,
    failed_cycles: AtomicU32,
}

impl StateStore {
    /// Creates a store holding two empty snapshots.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Snapshot::empty()),
            previous: ArcSwap::from_pointee(Snapshot::empty()),
            failed_cycles: AtomicU32::new(0),
        }
    }

    /// Returns `true` if the latest snapshot contains the output.
    #[must_use]
    pub fn contains(&self, id: OutputId) -> bool {
        self.current.load().contains(id)
    }

    /// Returns the raw status of an output, or `None` if the id is unknown.
    #[must_use]
    pub fn status_of(&self, id: OutputId) -> Option<u8> {
        self.current.load().get(id).map(OutputState::status)
    }

    /// Returns the raw dimmer value of an output, or `None` if the id is
    /// unknown.
    #[must_use]
    pub fn dimmer_of(&self, id: OutputId) -> Option<u8> {
        self.current.load().get(id).map(OutputState::dimmer)
    }

    /// Returns the full state of an output from the latest snapshot.
    #[must_use]
    pub fn get(&self, id: OutputId) -> Option<OutputState> {
        self.current.load().get(id).copied()
    }

    /// Returns the latest snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Returns when the latest snapshot was fetched.
    ///
    /// `None` until the first successful poll.
    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.current.load().fetched_at()
    }

    /// Returns the number of consecutive poll cycles that failed since the
    /// last successful one.
    #[must_use]
    pub fn failed_cycles(&self) -> u32 {
        self.failed_cycles.load(Ordering::Acquire)
    }

    /// Replaces `previous` with the current snapshot.
    pub(crate) fn rotate(&self) {
        self.previous.store(self.current.load_full());
    }

    /// Publishes a freshly fetched snapshot as `current`.
    pub(crate) fn publish(&self, snapshot: Snapshot) {
        self.current.store(Arc::new(snapshot));
        self.failed_cycles.store(0, Ordering::Release);
    }

    /// Records a poll cycle that left `current` untouched.
    pub(crate) fn record_failure(&self) {
        self.failed_cycles.fetch_add(1, Ordering::AcqRel);
    }

    /// Computes the outputs that changed from `previous` to `current`.
    pub(crate) fn changes(&self) -> ChangeSet {
        ChangeSet::between(&self.previous.load(), &self.current.load())
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
