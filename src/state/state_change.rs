// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change notifications.

use crate::types::SpeedPercent;

/// A committed state transition, as observed by subscribers.
///
/// Carries the externally visible view of the new state: the active flag and
/// the derived speed percentage. Dispatched after every transition, including
/// no-op transitions that re-assert the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    /// Whether the fan is running after the transition.
    pub active: bool,
    /// The derived speed percentage after the transition.
    pub percent: SpeedPercent,
}

impl StateChange {
    /// Creates a state change snapshot.
    #[must_use]
    pub const fn new(active: bool, percent: SpeedPercent) -> Self {
        Self { active, percent }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_change_fields() {
        let change = StateChange::new(true, SpeedPercent::clamped(66));
        assert!(change.active);
        assert_eq!(change.percent.value(), 66);
    }
}
