// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion between discrete speed levels and percentages.
//!
//! A fan with `levels` speeds numbers them 1 to `levels`. The accessory
//! interface works in 0-100 percent instead, so every boundary crossing goes
//! through these two pure functions:
//!
//! - [`level_to_percent`]: `floor(level * (100 / levels))`, clamped to [0, 100]
//! - [`percent_to_level`]: `ceil(percent / (100 / levels))`, clamped to [1, levels]
//!
//! # Rounding asymmetry
//!
//! The two functions are deliberately NOT exact inverses. Converting a level
//! to a percent and back yields the same level, but an arbitrary percent does
//! not survive the round trip: with 3 levels, 50% maps to level 2, which maps
//! back to 66%. The accessory layer is expected to re-read the derived percent
//! after a write rather than assume its input was preserved.

use super::SpeedPercent;

/// Converts a speed level to its normalized percentage.
///
/// `levels` is the total number of configured speeds and must be at least 1
/// (enforced by [`DegreeTable`](crate::config::DegreeTable) validation).
/// Levels that do not evenly divide 100 floor down, so the top level may map
/// slightly below 100.
#[must_use]
pub fn level_to_percent(level: u8, levels: u8) -> SpeedPercent {
    let step = 100.0 / f64::from(levels);
    let percent = (f64::from(level) * step).floor().clamp(0.0, 100.0);

    // Safe: clamped to [0, 100] above
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    SpeedPercent::clamped(percent as u8)
}

/// Converts a normalized percentage to the nearest speed level.
///
/// Always returns a valid level in [1, `levels`]; in particular 0% clamps up
/// to level 1, never to a nonexistent level 0.
#[must_use]
pub fn percent_to_level(percent: SpeedPercent, levels: u8) -> u8 {
    let step = 100.0 / f64::from(levels);
    let level = (f64::from(percent.value()) / step)
        .ceil()
        .clamp(1.0, f64::from(levels));

    // Safe: clamped to [1, levels] above, levels is u8
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let level = level as u8;
    level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_to_percent_in_range() {
        for levels in 1..=100u8 {
            for level in 1..=levels {
                let percent = level_to_percent(level, levels);
                assert!(percent.value() <= 100);
            }
        }
    }

    #[test]
    fn percent_to_level_in_range() {
        for levels in 1..=100u8 {
            for raw in 0..=100u8 {
                let level = percent_to_level(SpeedPercent::clamped(raw), levels);
                assert!(level >= 1, "percent {raw} with {levels} levels gave level 0");
                assert!(level <= levels);
            }
        }
    }

    #[test]
    fn zero_percent_maps_to_level_one() {
        for levels in 1..=100u8 {
            assert_eq!(percent_to_level(SpeedPercent::ZERO, levels), 1);
        }
    }

    #[test]
    fn three_level_fan() {
        assert_eq!(level_to_percent(1, 3).value(), 33);
        assert_eq!(level_to_percent(2, 3).value(), 66);
        assert_eq!(level_to_percent(3, 3).value(), 100);

        assert_eq!(percent_to_level(SpeedPercent::clamped(33), 3), 1);
        assert_eq!(percent_to_level(SpeedPercent::clamped(66), 3), 2);
        assert_eq!(percent_to_level(SpeedPercent::FULL, 3), 3);
    }

    #[test]
    fn single_level_fan() {
        assert_eq!(level_to_percent(1, 1).value(), 100);
        assert_eq!(percent_to_level(SpeedPercent::ZERO, 1), 1);
        assert_eq!(percent_to_level(SpeedPercent::FULL, 1), 1);
    }

    #[test]
    fn level_survives_round_trip() {
        for levels in 1..=100u8 {
            for level in 1..=levels {
                let percent = level_to_percent(level, levels);
                assert_eq!(percent_to_level(percent, levels), level);
            }
        }
    }

    #[test]
    fn percent_round_trip_is_lossy() {
        // Documented asymmetry: arbitrary percents snap to the level grid.
        let level = percent_to_level(SpeedPercent::clamped(50), 3);
        assert_eq!(level, 2);
        assert_eq!(level_to_percent(level, 3).value(), 66);
    }
}
