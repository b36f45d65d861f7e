// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Output identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a gateway output (relay or dimmer channel).
///
/// Ids are assigned by the gateway and stay stable for the lifetime of the
/// installation, so they can be used as keys across poll cycles.
///
/// # Examples
///
/// ```
/// use openmotics_lib::types::OutputId;
///
/// let id = OutputId::new(5);
/// assert_eq!(id.value(), 5);
/// assert_eq!(id.to_string(), "5");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OutputId(u32);

impl OutputId {
    /// Creates an output identifier.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the numeric id.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for OutputId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<OutputId> for u32 {
    fn from(id: OutputId) -> Self {
        id.0
    }
}
