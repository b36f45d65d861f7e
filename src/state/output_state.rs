// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State of a single output as reported by one poll.

use crate::protocol::OutputStatusRecord;
use crate::types::{DimmerLevel, OutputId, PowerState};

/// State of one gateway output at the time of a poll.
///
/// Values are immutable: a new `OutputState` is built for every poll and
/// replaces the old one wholesale.
///
/// Equality compares the reported values (`status`, `dimmer`, `ctimer`).
#[derive(Debug, Clone, Copy)]
pub struct OutputState {
    id: OutputId,
    status: u8,
    dimmer: u8,
    ctimer: u32,
}

impl OutputState {
    /// Creates an output state from raw gateway values.
    #[must_use]
    pub const fn new(id: OutputId, status: u8, dimmer: u8, ctimer: u32) -> Self {
        Self {
            id,
            status,
            dimmer,
            ctimer,
        }
    }

    /// Returns the output id.
    #[must_use]
    pub const fn id(&self) -> OutputId {
        self.id
    }

    /// Returns the raw status (0/1 for relays, possibly richer for dimmers).
    #[must_use]
    pub const fn status(&self) -> u8 {
        self.status
    }

    /// Returns the raw dimmer value.
    #[must_use]
    pub const fn dimmer(&self) -> u8 {
        self.dimmer
    }

    /// Returns the configured countdown timer.
    #[must_use]
    pub const fn ctimer(&self) -> u32 {
        self.ctimer
    }

    /// Returns the power state derived from the status.
    #[must_use]
    pub const fn power(&self) -> PowerState {
        PowerState::from_status(self.status)
    }

    /// Returns the dimmer level, clamped to 0-100.
    #[must_use]
    pub const fn dimmer_level(&self) -> DimmerLevel {
        DimmerLevel::clamped(self.dimmer)
    }
}

impl PartialEq for OutputState {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status && self.dimmer == other.dimmer && self.ctimer == other.ctimer
    }
}

impl Eq for OutputState {}

impl From<&OutputStatusRecord> for OutputState {
    fn from(record: &OutputStatusRecord) -> Self {
        Self::new(record.id, record.status, record.dimmer, record.ctimer)
    }
}
