// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Downstream things fed by the polling core.
//!
//! A thing represents one gateway output, dimmer, group action or input in
//! the automation platform. Output and dimmer things render their channels
//! from the [`StateStore`](crate::state::StateStore) whenever the change
//! dispatcher asks them to refresh.
//!
//! | Kind          | UID      | Channels          |
//! |---------------|----------|-------------------|
//! | `Output`      | `oid005` | switch            |
//! | `Dimmer`      | `oid006` | switch, dimmer    |
//! | `GroupAction` | `aid003` | action            |
//! | `Input`       | `iid012` |                   |

mod handler;
mod kind;

pub use handler::{Thing, ThingCommand, ThingHandler, ThingState};
pub use kind::{Channel, ThingKind};
