// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Retry budget for gateway calls.

/// Number of retries a single gateway call may still use.
///
/// A call that fails spends one unit of budget to be allowed to re-login and
/// retry. Once the budget is spent, the next failure is final.
///
/// ```
/// use openmotics_lib::session::RetryBudget;
///
/// let mut budget = RetryBudget::single();
/// assert!(budget.try_consume());
/// assert!(!budget.try_consume());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    remaining: u8,
}

impl RetryBudget {
    /// A budget allowing exactly one retry.
    #[must_use]
    pub const fn single() -> Self {
        Self { remaining: 1 }
    }

    /// A budget allowing no retries.
    #[must_use]
    pub const fn exhausted() -> Self {
        Self { remaining: 0 }
    }

    /// Spends one retry. Returns `false` if none was left.
    pub fn try_consume(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// Returns the number of retries left.
    #[must_use]
    pub const fn remaining(&self) -> u8 {
        self.remaining
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self::single()
    }
}
