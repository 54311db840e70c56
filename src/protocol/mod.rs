// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport boundary for the fan.
//!
//! The fan talks to the outside world over a pub/sub channel with two fixed
//! topics: it publishes actuator setpoints on [`UPDATE_TOPIC`] and receives
//! parameterless toggle signals on [`TOGGLE_TOPIC`].
//!
//! The state machine itself only depends on the [`SetpointPublisher`] trait,
//! so it can be driven by the real [`MqttTransport`] in production and by an
//! in-memory recorder in tests.

mod mqtt;
mod topic_router;

pub use mqtt::{MqttTransport, MqttTransportBuilder};
pub use topic_router::TopicRouter;

use crate::types::Setpoint;

/// Outbound topic carrying the current actuator setpoint.
pub const UPDATE_TOPIC: &str = "update";

/// Inbound topic whose messages cycle the fan through its states.
///
/// The payload is ignored; the topic itself is the signal.
pub const TOGGLE_TOPIC: &str = "main_switch";

/// Fire-and-forget sink for actuator setpoints.
///
/// Implementations must not block the caller: the fan publishes from inside
/// its transition sequence, and a slow broker must not starve concurrent
/// state reads. Delivery is best-effort; a failed publish is logged by the
/// implementation and never rolls back the state transition, since the
/// in-memory state is the source of truth and the next transition
/// re-publishes.
pub trait SetpointPublisher: Send + Sync + std::fmt::Debug {
    /// Publishes a setpoint on the `update` topic.
    fn publish_setpoint(&self, setpoint: Setpoint);
}
