// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kinds of downstream things and their channels.

use std::fmt;

use crate::error::ValueError;

/// The kind of a thing attached to a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThingKind {
    /// A relay output.
    Output,
    /// A dimmable output.
    Dimmer,
    /// A gateway group action.
    GroupAction,
    /// A gateway input.
    Input,
}

impl ThingKind {
    /// Maps the module type letter the gateway reports for an output.
    ///
    /// ```
    /// use openmotics_lib::thing::ThingKind;
    ///
    /// assert_eq!(ThingKind::from_module_type('O').unwrap(), ThingKind::Output);
    /// assert_eq!(ThingKind::from_module_type('D').unwrap(), ThingKind::Dimmer);
    /// assert!(ThingKind::from_module_type('X').is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownModuleType` for any other letter.
    pub fn from_module_type(module_type: char) -> Result<Self, ValueError> {
        match module_type {
            'O' => Ok(Self::Output),
            'D' => Ok(Self::Dimmer),
            other => Err(ValueError::UnknownModuleType(other)),
        }
    }

    /// Returns the prefix used in thing UIDs.
    #[must_use]
    pub const fn uid_prefix(&self) -> &'static str {
        match self {
            Self::Output | Self::Dimmer => "oid",
            Self::GroupAction => "aid",
            Self::Input => "iid",
        }
    }

    /// Builds the UID of the thing with the given id, e.g. `oid005`.
    #[must_use]
    pub fn thing_uid(&self, id: u32) -> String {
        format!("{}{id:03}", self.uid_prefix())
    }

    /// Returns `true` for kinds backed by a gateway output.
    #[must_use]
    pub const fn is_output(&self) -> bool {
        matches!(self, Self::Output | Self::Dimmer)
    }

    /// Returns the channels a thing of this kind exposes.
    #[must_use]
    pub const fn channels(&self) -> &'static [Channel] {
        match self {
            Self::Output => &[Channel::Relay],
            Self::Dimmer => &[Channel::Relay, Channel::Dimmer],
            Self::GroupAction => &[Channel::Action],
            Self::Input => &[],
        }
    }

    /// Returns `true` if things of this kind expose the channel.
    #[must_use]
    pub fn has_channel(&self, channel: Channel) -> bool {
        self.channels().contains(&channel)
    }
}

impl fmt::Display for ThingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Output => "output",
            Self::Dimmer => "dimmer",
            Self::GroupAction => "groupaction",
            Self::Input => "input",
        };
        f.write_str(name)
    }
}

/// A channel of a thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// On/off switch of an output.
    Relay,
    /// Brightness of a dimmer.
    Dimmer,
    /// Trigger of a group action.
    Action,
}

impl Channel {
    /// Returns the channel id.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Relay => "switch",
            Self::Dimmer => "dimmer",
            Self::Action => "action",
        }
    }
}
