// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for gateway notifications.
//!
//! The [`EventBus`] uses tokio's broadcast channel to let any number of
//! subscribers follow status transitions and per-cycle output changes.
//!
//! # Examples
//!
//! ```
//! use openmotics_lib::event::{EventBus, GatewayEvent};
//! use openmotics_lib::gateway::GatewayStatus;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(GatewayEvent::StatusChanged(GatewayStatus::Online));
//! ```

mod event_bus;
mod gateway_event;

pub use event_bus::EventBus;
pub use gateway_event::GatewayEvent;
