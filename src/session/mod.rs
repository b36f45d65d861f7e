// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session management for gateway calls.
//!
//! The gateway hands out bearer tokens with a server-defined lease and may
//! revoke them at any time. Nothing expires locally: a `401 Unauthorized`
//! answer is the only signal that the session is gone.
//!
//! [`SessionManager`] owns the login flow and the retry protocol: every
//! gateway call is wrapped in [`SessionManager::with_reauth`], which on a 401
//! logs in again and retries the call once, bounded by a [`RetryBudget`].

mod credentials;
mod manager;
mod retry;
mod token;

pub use credentials::Credentials;
pub use manager::{DEFAULT_LEASE_SECS, SessionManager};
pub use retry::RetryBudget;
pub use token::BearerToken;
