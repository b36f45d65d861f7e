// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Output state tracking.
//!
//! Every poll cycle fetches the complete state of all gateway outputs and
//! turns it into a [`Snapshot`]. The [`StateStore`] keeps the latest
//! (`current`) and the one before it (`previous`); comparing the two yields a
//! [`ChangeSet`] naming the outputs whose state differs.
//!
//! # Examples
//!
//! ```
//! use openmotics_lib::state::{ChangeSet, OutputState, Snapshot};
//! use openmotics_lib::types::OutputId;
//!
//! let before = Snapshot::from_states([OutputState::new(OutputId::new(3), 0, 0, 0)]);
//! let after = Snapshot::from_states([OutputState::new(OutputId::new(3), 1, 0, 0)]);
//!
//! let changes = ChangeSet::between(&before, &after);
//! assert!(changes.contains(OutputId::new(3)));
//! ```

mod change_set;
mod output_state;
mod snapshot;
mod store;

pub use change_set::ChangeSet;
pub use output_state::OutputState;
pub use snapshot::Snapshot;
pub use store::StateStore;
