// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Physical actuator setpoint.
//!
//! A setpoint is the raw command value the actuator understands. The library
//! never interprets it; it is looked up in the configured
//! [`DegreeTable`](crate::config::DegreeTable) and published on the `update`
//! topic as a decimal string.

use std::fmt;

/// A physical actuator setpoint value.
///
/// The [`Display`](fmt::Display) impl renders the exact wire payload:
/// integral values print without a fractional part.
///
/// # Examples
///
/// ```
/// use mqtt_fan::types::Setpoint;
///
/// assert_eq!(Setpoint::new(10.0).to_string(), "10");
/// assert_eq!(Setpoint::new(22.5).to_string(), "22.5");
/// assert_eq!(Setpoint::new(0.0).to_string(), "0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Setpoint(f64);

impl Setpoint {
    /// Creates a new setpoint.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Returns the raw setpoint value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Renders the wire payload published on the `update` topic.
    #[must_use]
    pub fn to_payload(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Setpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f64> for Setpoint {
    fn from(value: f64) -> Self {
        Self(value)
    }
}
