// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for gateway output control.
//!
//! # Types
//!
//! - [`OutputId`] - Stable, gateway-assigned output identifier
//! - [`PowerState`] - On/Off state of a relay or dimmer output
//! - [`DimmerLevel`] - Brightness level (0-100%)

mod dimmer;
mod output_id;
mod power;

pub use dimmer::DimmerLevel;
pub use output_id::OutputId;
pub use power::PowerState;
