// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The fan state machine.
//!
//! [`FanController`] is the sole owner of the fan's `(active, level)` state.
//! Every transition runs the same committed sequence: compute the next state,
//! map it to an actuator setpoint, commit, publish the setpoint on the
//! `update` topic, and notify subscribers of the new active flag and derived
//! percentage.
//!
//! Transitions are serialized against each other so the accessory write path
//! and the inbound toggle path can never interleave a partially applied
//! update. Reads only take a short state-copy lock and are never blocked by
//! an in-flight publish.
//!
//! A transition to the values already in place is NOT short-circuited: it
//! re-publishes the setpoint and re-notifies. Delivery of published setpoints
//! is best-effort, so replaying the current state is the error-recovery
//! mechanism.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::DegreeTable;
use crate::error::{ConfigError, InvariantError, Result, ValueError};
use crate::protocol::SetpointPublisher;
use crate::state::{FanState, StateChange};
use crate::subscription::CallbackRegistry;
use crate::types::{SpeedPercent, level_to_percent, percent_to_level};

/// Controls a single multi-speed fan.
///
/// # Examples
///
/// ```ignore
/// use std::sync::Arc;
/// use mqtt_fan::{DegreeTable, FanController};
///
/// let degrees = DegreeTable::new(vec![10.0.into(), 20.0.into(), 30.0.into()], 0.0.into());
/// let fan = FanController::new(degrees, publisher)?;
///
/// fan.toggle()?; // off -> on at level 1, publishes "10"
/// assert!(fan.active());
/// ```
#[derive(Debug)]
pub struct FanController {
    /// The configured setpoint table.
    degrees: DegreeTable,
    /// Number of speed levels, cached from the table.
    levels: u8,
    /// The authoritative state. Held only long enough to copy or replace.
    state: Mutex<FanState>,
    /// Serializes the read-modify-publish-notify sequence.
    transitions: Mutex<()>,
    /// Outbound setpoint sink.
    publisher: Arc<dyn SetpointPublisher>,
    /// Observers notified after every committed transition.
    callbacks: Arc<CallbackRegistry>,
}

impl FanController {
    /// Creates a controller in the startup state (inactive, level 1).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the setpoint table is invalid. A fan with no
    /// speed levels must fail here, at startup, not at runtime.
    pub fn new(
        degrees: DegreeTable,
        publisher: Arc<dyn SetpointPublisher>,
    ) -> std::result::Result<Self, ConfigError> {
        degrees.validate()?;
        let levels = degrees.level_count();
        Ok(Self {
            degrees,
            levels,
            state: Mutex::new(FanState::default()),
            transitions: Mutex::new(()),
            publisher,
            callbacks: Arc::new(CallbackRegistry::new()),
        })
    }

    /// Returns whether the fan is running.
    #[must_use]
    pub fn active(&self) -> bool {
        self.state.lock().active
    }

    /// Returns the current speed as a percentage.
    ///
    /// Always derived from the stored level, never cached, so it cannot
    /// drift from the state.
    #[must_use]
    pub fn speed_percent(&self) -> SpeedPercent {
        let level = self.state.lock().level;
        level_to_percent(level, self.levels)
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> FanState {
        *self.state.lock()
    }

    /// Returns the number of configured speed levels.
    #[must_use]
    pub fn level_count(&self) -> u8 {
        self.levels
    }

    /// Returns the registry for state change subscriptions.
    #[must_use]
    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }

    /// Transitions to the given state.
    ///
    /// Setting the current values again is valid and still re-publishes the
    /// setpoint and re-notifies subscribers.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `level` is not in
    /// [1, `level_count`]. The call leaves state untouched and publishes
    /// nothing.
    pub fn set_state(&self, active: bool, level: u8) -> Result<()> {
        let levels = self.levels;
        self.transition(move |_| {
            if !(1..=levels).contains(&level) {
                return Err(ValueError::OutOfRange {
                    min: 1,
                    max: levels,
                    actual: level,
                }
                .into());
            }
            Ok(FanState::new(active, level))
        })
    }

    /// Transitions the active flag, keeping the remembered speed level.
    ///
    /// # Errors
    ///
    /// Cannot fail under the level invariant; errors surface only if the
    /// setpoint table refuses the stored level.
    pub fn set_active(&self, active: bool) -> Result<()> {
        self.transition(move |current| Ok(FanState::new(active, current.level)))
    }

    /// Transitions the speed from a percentage, keeping the active flag.
    ///
    /// The percentage snaps to the nearest level; 0% maps to level 1, it
    /// does not turn the fan off.
    ///
    /// # Errors
    ///
    /// Cannot fail under the level invariant; errors surface only if the
    /// setpoint table refuses the converted level.
    pub fn set_speed(&self, percent: SpeedPercent) -> Result<()> {
        let levels = self.levels;
        self.transition(move |current| {
            Ok(FanState::new(current.active, percent_to_level(percent, levels)))
        })
    }

    /// Advances the fan one step through its toggle cycle.
    ///
    /// - inactive → active at level 1
    /// - active below the top level → next level up
    /// - active at the top level → inactive, level remembered
    ///
    /// # Errors
    ///
    /// Returns `InvariantError::LevelCorrupted` if the stored level is ever
    /// observed outside [1, `level_count`]. The transition is refused and
    /// reported; the process keeps running.
    pub fn toggle(&self) -> Result<()> {
        let levels = self.levels;
        self.transition(move |current| {
            if !(1..=levels).contains(&current.level) {
                return Err(InvariantError::LevelCorrupted {
                    level: current.level,
                    levels,
                }
                .into());
            }

            let next = if !current.active {
                FanState::new(true, 1)
            } else if current.level >= levels {
                FanState::new(false, current.level)
            } else {
                FanState::new(true, current.level + 1)
            };
            Ok(next)
        })
    }

    /// Runs the committed transition sequence.
    ///
    /// The next state is computed from the current one inside the transition
    /// lock, so concurrent callers never act on a stale read. The setpoint is
    /// mapped before the commit: any failure leaves state, wire, and
    /// observers untouched.
    fn transition<F>(&self, compute: F) -> Result<()>
    where
        F: FnOnce(FanState) -> Result<FanState>,
    {
        let _serialize = self.transitions.lock();

        let current = *self.state.lock();
        let next = compute(current)?;
        let setpoint = self.degrees.setpoint_for(next.active, next.level)?;

        *self.state.lock() = next;

        // Fire-and-forget; the publisher must not block this sequence.
        self.publisher.publish_setpoint(setpoint);

        let change = StateChange::new(next.active, level_to_percent(next.level, self.levels));
        tracing::debug!(
            active = next.active,
            level = next.level,
            setpoint = %setpoint,
            "Committed fan transition"
        );
        self.callbacks.dispatch(&change);

        Ok(())
    }
}
