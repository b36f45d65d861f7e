// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `OpenMotics` Lib - A Rust library to poll and control `OpenMotics`
//! home-automation gateways.
//!
//! The gateway exposes a REST API guarded by bearer-token sessions. This
//! library keeps such a session alive, polls the state of every output on a
//! fixed schedule and tells attached things which outputs changed since the
//! previous poll.
//!
//! # Supported Features
//!
//! - **Sessions**: Login with a server-side lease, transparent re-login and a
//!   single retry when the gateway answers `401 Unauthorized`
//! - **Polling**: Fixed-delay background polling of all outputs with
//!   atomically published snapshots
//! - **Change detection**: Only things whose output changed are refreshed
//! - **Control**: Switch and dim outputs, run group actions
//! - **Events**: Status transitions and per-cycle change sets over a
//!   broadcast channel
//!
//! # Quick Start
//!
//! ```no_run
//! use openmotics_lib::{Gateway, GatewayConfig, GatewayEvent};
//! use openmotics_lib::thing::{Channel, ThingCommand, ThingKind};
//! use openmotics_lib::types::DimmerLevel;
//!
//! #[tokio::main]
//! async fn main() -> openmotics_lib::Result<()> {
//!     let config = GatewayConfig::new("192.168.1.20", "admin", "secret");
//!     let gateway = Gateway::from_config(&config)?;
//!     gateway.initialize().await?;
//!
//!     let lamp = gateway.attach_thing(7, ThingKind::Dimmer);
//!     lamp.handle_command(Channel::Dimmer, ThingCommand::Percent(DimmerLevel::new(50)?))
//!         .await?;
//!
//!     let mut events = gateway.subscribe();
//!     while let Ok(event) = events.recv().await {
//!         if let GatewayEvent::OutputsChanged(changes) = event {
//!             for id in changes.iter() {
//!                 println!("output {id} changed: {:?}", gateway.store().get(id));
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod gateway;
pub mod protocol;
pub mod session;
pub mod state;
pub mod thing;
pub mod types;

#[cfg(test)]
mod mock;

pub use config::GatewayConfig;
pub use dispatch::ChangeDispatcher;
pub use error::{ConfigError, Error, ProtocolError, Result, ValueError};
pub use event::{EventBus, GatewayEvent};
pub use gateway::{Gateway, GatewayBuilder, GatewayStatus, StatusDetail};
#[cfg(feature = "http")]
pub use protocol::{HttpClient, HttpConfig};
pub use protocol::{GatewayApi, LoginResponse, OutputStatusRecord};
pub use session::{Credentials, SessionManager};
pub use state::{ChangeSet, OutputState, StateStore};
pub use thing::{Channel, Thing, ThingCommand, ThingHandler, ThingKind, ThingState};
pub use types::{DimmerLevel, OutputId, PowerState};
