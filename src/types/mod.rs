// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for fan control.
//!
//! This module provides type-safe representations of the values that cross
//! the library's boundaries, plus the pure conversions between them.
//!
//! # Types
//!
//! - [`SpeedPercent`] - Normalized fan speed (0-100%)
//! - [`Setpoint`] - Physical actuator command value
//! - [`level_to_percent`] / [`percent_to_level`] - Level/percent conversion

mod level;
mod percent;
mod setpoint;

pub use level::{level_to_percent, percent_to_level};
pub use percent::SpeedPercent;
pub use setpoint::Setpoint;
