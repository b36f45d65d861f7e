// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state of a gateway output.

use std::fmt;

/// On/off state of a relay or dimmer output.
///
/// # Examples
///
/// ```
/// use openmotics_lib::types::PowerState;
///
/// assert_eq!(PowerState::On.as_api_str(), "true");
/// assert_eq!(PowerState::from_status(1), PowerState::On);
/// assert_eq!(PowerState::from_status(0), PowerState::Off);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerState {
    /// Output is off.
    Off,
    /// Output is on.
    On,
}

impl PowerState {
    /// Returns the value of the `is_on` query parameter for this state.
    #[must_use]
    pub const fn as_api_str(&self) -> &'static str {
        match self {
            Self::Off => "false",
            Self::On => "true",
        }
    }

    /// Maps a raw output status to a power state.
    ///
    /// Only a status of exactly 1 means "on"; any other value is reported
    /// as off.
    #[must_use]
    pub const fn from_status(status: u8) -> Self {
        if status == 1 { Self::On } else { Self::Off }
    }

    /// Returns `true` if the state is [`PowerState::On`].
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "OFF"),
            Self::On => write!(f, "ON"),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}
