// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory-facing handler surface.
//!
//! An automation framework exposes the fan as two properties: an
//! active/inactive characteristic and a 0-100% rotation speed. This module
//! provides the plain synchronous get/set handlers such a framework binds to,
//! without depending on any framework types. Change notifications flow the
//! other way through [`FanAccessory::on_active_changed`] and
//! [`FanAccessory::on_speed_changed`], so the framework learns about
//! transitions it did not initiate (the inbound toggle path).

use std::sync::Arc;

use crate::error::Result;
use crate::fan::FanController;
use crate::subscription::SubscriptionId;
use crate::types::SpeedPercent;

/// The accessory's active characteristic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActiveState {
    /// The fan is off.
    Inactive,
    /// The fan is running.
    Active,
}

impl ActiveState {
    /// Returns `true` for [`ActiveState::Active`].
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl From<bool> for ActiveState {
    fn from(active: bool) -> Self {
        if active { Self::Active } else { Self::Inactive }
    }
}

impl From<ActiveState> for bool {
    fn from(state: ActiveState) -> Self {
        state.is_active()
    }
}

/// Get/set handler surface bound by the accessory framework.
///
/// Thin facade over a shared [`FanController`]; cloning it shares the same
/// fan.
#[derive(Debug, Clone)]
pub struct FanAccessory {
    controller: Arc<FanController>,
}

impl FanAccessory {
    /// Creates the accessory surface for a fan.
    #[must_use]
    pub fn new(controller: Arc<FanController>) -> Self {
        Self { controller }
    }

    /// Read handler for the active characteristic.
    #[must_use]
    pub fn handle_active_get(&self) -> ActiveState {
        ActiveState::from(self.controller.active())
    }

    /// Write handler for the active characteristic.
    ///
    /// Keeps the remembered speed level.
    ///
    /// # Errors
    ///
    /// Surfaces the controller's error; the write appears failed to the
    /// framework and the property stays unchanged.
    pub fn handle_active_set(&self, value: ActiveState) -> Result<()> {
        self.controller.set_active(value.is_active())
    }

    /// Read handler for the rotation speed characteristic.
    #[must_use]
    pub fn handle_rotation_speed_get(&self) -> SpeedPercent {
        self.controller.speed_percent()
    }

    /// Write handler for the rotation speed characteristic.
    ///
    /// The framework declares a 0-100 range, so the raw value clamps rather
    /// than errors; it then snaps to the nearest speed level. The active flag
    /// is kept as-is.
    ///
    /// # Errors
    ///
    /// Surfaces the controller's error; state stays unchanged on failure.
    pub fn handle_rotation_speed_set(&self, percent: u8) -> Result<()> {
        self.controller.set_speed(SpeedPercent::clamped(percent))
    }

    /// Registers a notification for active characteristic updates.
    pub fn on_active_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ActiveState) + Send + Sync + 'static,
    {
        self.controller
            .callbacks()
            .on_active_changed(move |active| callback(ActiveState::from(active)))
    }

    /// Registers a notification for rotation speed updates.
    pub fn on_speed_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(SpeedPercent) + Send + Sync + 'static,
    {
        self.controller.callbacks().on_speed_changed(callback)
    }

    /// Removes a previously registered notification.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.controller.callbacks().unsubscribe(id)
    }
}
