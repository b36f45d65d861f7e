// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared bearer token slot.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// Slot holding the current session token.
///
/// The token is replaced with a single reference swap, so a request that is
/// being built concurrently with a re-login sees either the old or the new
/// token, never a partial value. Clones share the same slot.
///
/// ```
/// use openmotics_lib::session::BearerToken;
///
/// let token = BearerToken::new();
/// assert!(!token.is_set());
///
/// token.set("T1");
/// assert_eq!(token.get().as_deref().map(String::as_str), Some("T1"));
///
/// token.clear();
/// assert!(token.get().is_none());
/// ```
#[derive(Clone, Default)]
pub struct BearerToken {
    inner: Arc<ArcSwapOption<String>>,
}

impl BearerToken {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current token.
    #[must_use]
    pub fn get(&self) -> Option<Arc<String>> {
        self.inner.load_full()
    }

    /// Stores a new token.
    pub fn set(&self, token: impl Into<String>) {
        self.inner.store(Some(Arc::new(token.into())));
    }

    /// Removes the token; subsequent requests are sent unauthenticated.
    pub fn clear(&self) {
        self.inner.store(None);
    }

    /// Returns `true` if a token is present.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.inner.load().is_some()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("set", &self.is_set())
            .finish()
    }
}
