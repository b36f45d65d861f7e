// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dimmer level type for brightness control.
//!
//! This module provides a type-safe representation of dimmer values,
//! ensuring values are always within the valid range of 0-100%.

use std::fmt;

use crate::error::ValueError;

/// Brightness level as a percentage (0-100).
///
/// The gateway reports and accepts dimmer values in the range 0-100, where 0
/// is off and 100 is full brightness.
///
/// # Examples
///
/// ```
/// use openmotics_lib::types::DimmerLevel;
///
/// let dim = DimmerLevel::new(75).unwrap();
/// assert_eq!(dim.value(), 75);
///
/// assert_eq!(DimmerLevel::MIN.value(), 0);
/// assert_eq!(DimmerLevel::MAX.value(), 100);
///
/// assert!(DimmerLevel::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DimmerLevel(u8);

impl DimmerLevel {
    /// Minimum dimmer value (0%).
    pub const MIN: Self = Self(0);

    /// Maximum dimmer value (100%).
    pub const MAX: Self = Self(100);

    /// Creates a new dimmer level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a dimmer level, clamping to the valid range.
    ///
    /// Gateway firmware occasionally reports values above 100 while a dimmer
    /// is ramping; those are clamped to 100.
    ///
    /// ```
    /// use openmotics_lib::types::DimmerLevel;
    ///
    /// assert_eq!(DimmerLevel::clamped(150).value(), 100);
    /// ```
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value > 100 { Self(100) } else { Self(value) }
    }

    /// Returns the brightness percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns `true` for a level of 0%.
    #[must_use]
    pub const fn is_off(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for DimmerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for DimmerLevel {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
