// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan state tracking.

/// The authoritative state of the fan.
///
/// `level` is meaningful even while the fan is inactive: it is the remembered
/// speed the fan resumes at. The [`FanController`](crate::FanController) is
/// the sole owner and keeps `level` within [1, levels] at all times.
///
/// State is recreated fresh on every process start; there is no persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanState {
    /// Whether the fan is running.
    pub active: bool,
    /// Current (or remembered, when inactive) speed level, 1-based.
    pub level: u8,
}

impl FanState {
    /// Creates a fan state.
    #[must_use]
    pub const fn new(active: bool, level: u8) -> Self {
        Self { active, level }
    }
}

impl Default for FanState {
    /// The startup state: inactive, remembered speed at the lowest level.
    fn default() -> Self {
        Self {
            active: false,
            level: 1,
        }
    }
}
