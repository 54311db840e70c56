// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized fan speed percentage.
//!
//! The accessory interface exposes fan speed as a 0-100 percentage. This
//! module provides the type-safe representation used at that boundary.
//! Percentages are always derived from the stored speed level via
//! [`level_to_percent`](crate::types::level_to_percent), never stored.

use std::fmt;

use crate::error::ValueError;

/// Normalized fan speed (0-100%).
///
/// # Examples
///
/// ```
/// use mqtt_fan::types::SpeedPercent;
///
/// let percent = SpeedPercent::new(66).unwrap();
/// assert_eq!(percent.value(), 66);
///
/// // Out-of-range input clamps instead of failing
/// assert_eq!(SpeedPercent::clamped(150).value(), 100);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SpeedPercent(u8);

impl SpeedPercent {
    /// Minimum percentage.
    pub const MIN: u8 = 0;

    /// Maximum percentage.
    pub const MAX: u8 = 100;

    /// The fan is stopped.
    pub const ZERO: Self = Self(0);

    /// The fan runs at full speed.
    pub const FULL: Self = Self(100);

    /// Creates a new speed percentage.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > Self::MAX {
            return Err(ValueError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Creates a speed percentage, clamping to the valid range.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl Default for SpeedPercent {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for SpeedPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for SpeedPercent {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
