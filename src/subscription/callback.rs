// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for state change subscriptions.
//!
//! The accessory layer must be told about every transition the fan makes,
//! including transitions it did not initiate (the inbound toggle path). This
//! module provides the registry those notifications flow through:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Stores and dispatches change callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::StateChange;
use crate::types::SpeedPercent;

/// Unique identifier for a subscription.
///
/// Returned when registering a callback; pass it to
/// [`CallbackRegistry::unsubscribe`] to remove the callback again. IDs are
/// unique within a registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for active state callbacks.
type ActiveCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Type alias for speed percentage callbacks.
type SpeedCallback = Arc<dyn Fn(SpeedPercent) + Send + Sync>;

/// Type alias for generic state change callbacks.
type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Registry for fan state change callbacks.
///
/// # Thread Safety
///
/// The registry is fully thread-safe; callbacks may be registered and
/// dispatched from different tasks concurrently. Callbacks are wrapped in
/// `Arc` so dispatch clones them cheaply and never holds a lock while a
/// callback runs.
#[derive(Default)]
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Active state change callbacks.
    active_callbacks: RwLock<HashMap<SubscriptionId, ActiveCallback>>,
    /// Speed percentage change callbacks.
    speed_callbacks: RwLock<HashMap<SubscriptionId, SpeedCallback>>,
    /// Generic state change callbacks (receive the full snapshot).
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            active_callbacks: RwLock::new(HashMap::new()),
            speed_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Generates a new unique subscription ID.
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback for active state changes.
    pub fn on_active_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.active_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for speed percentage changes.
    pub fn on_speed_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(SpeedPercent) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.speed_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for every committed transition.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Removes a subscription.
    ///
    /// Returns `true` if the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.active_callbacks.write().remove(&id).is_some()
            || self.speed_callbacks.write().remove(&id).is_some()
            || self.state_changed_callbacks.write().remove(&id).is_some()
    }

    /// Dispatches a committed transition to all registered callbacks.
    pub fn dispatch(&self, change: &StateChange) {
        let active: Vec<ActiveCallback> = self.active_callbacks.read().values().cloned().collect();
        for callback in active {
            callback(change.active);
        }

        let speed: Vec<SpeedCallback> = self.speed_callbacks.read().values().cloned().collect();
        for callback in speed {
            callback(change.percent);
        }

        let generic: Vec<StateChangedCallback> = self
            .state_changed_callbacks
            .read()
            .values()
            .cloned()
            .collect();
        for callback in generic {
            callback(change);
        }
    }

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.active_callbacks.read().len()
            + self.speed_callbacks.read().len()
            + self.state_changed_callbacks.read().len()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callbacks", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn subscription_ids_are_unique() {
        let registry = CallbackRegistry::new();
        let a = registry.on_active_changed(|_| {});
        let b = registry.on_speed_changed(|_| {});
        assert_ne!(a, b);
    }

    #[test]
    fn dispatch_reaches_all_callback_kinds() {
        let registry = CallbackRegistry::new();

        let hits = Arc::new(AtomicU32::new(0));

        let h = hits.clone();
        registry.on_active_changed(move |active| {
            assert!(active);
            h.fetch_add(1, Ordering::SeqCst);
        });

        let h = hits.clone();
        registry.on_speed_changed(move |percent| {
            assert_eq!(percent.value(), 66);
            h.fetch_add(1, Ordering::SeqCst);
        });

        let h = hits.clone();
        registry.on_state_changed(move |change| {
            assert!(change.active);
            h.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&StateChange::new(true, SpeedPercent::clamped(66)));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn unsubscribe_removes_callback() {
        let registry = CallbackRegistry::new();

        let hits = Arc::new(AtomicU32::new(0));
        let h = hits.clone();
        let id = registry.on_active_changed(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));

        registry.dispatch(&StateChange::new(false, SpeedPercent::ZERO));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dispatch_without_callbacks_is_noop() {
        let registry = CallbackRegistry::new();
        registry.dispatch(&StateChange::new(false, SpeedPercent::ZERO));
        assert_eq!(registry.callback_count(), 0);
    }
}
