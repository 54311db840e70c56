// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `mqtt-fan` - Bridge a multi-speed fan between MQTT and a home-automation
//! accessory interface.
//!
//! The fan's authoritative `(active, level)` state lives in a single
//! [`FanController`]. Two surfaces drive it:
//!
//! - **Accessory writes**: an automation framework binds the get/set handlers
//!   on [`FanAccessory`] (active characteristic, 0-100% rotation speed).
//! - **Toggle messages**: every message on the `main_switch` topic advances
//!   the fan one step through its cycle (on at level 1, up through the
//!   levels, then off).
//!
//! Every committed transition publishes the mapped actuator setpoint on the
//! `update` topic and notifies subscribers of the new active flag and derived
//! speed percentage. Publishing is fire-and-forget; the in-memory state is
//! the source of truth and the next transition re-publishes.
//!
//! # Quick Start
//!
//! ```no_run
//! use mqtt_fan::{FanBridge, FanConfig};
//!
//! #[tokio::main]
//! async fn main() -> mqtt_fan::Result<()> {
//!     let config = FanConfig::from_json(
//!         r#"{
//!             "name": "Bedroom Fan",
//!             "mqtt": { "host": "localhost", "port": 1883 },
//!             "degrees": { "on": [10, 20, 30], "off": 0 }
//!         }"#,
//!     )?;
//!
//!     let bridge = FanBridge::connect(config).await?;
//!     let accessory = bridge.accessory();
//!
//!     // Framework-driven write path
//!     accessory.handle_rotation_speed_set(66)?;
//!     accessory.handle_active_set(mqtt_fan::ActiveState::Active)?;
//!
//!     // Push notifications for transitions the framework did not initiate
//!     accessory.on_speed_changed(|percent| {
//!         println!("fan speed is now {percent}");
//!     });
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing without a broker
//!
//! [`FanController`] only depends on the [`SetpointPublisher`] trait, so the
//! state machine is constructible as an isolated unit with an in-memory
//! publisher:
//!
//! ```
//! use std::sync::Arc;
//! use mqtt_fan::config::DegreeTable;
//! use mqtt_fan::protocol::SetpointPublisher;
//! use mqtt_fan::types::Setpoint;
//! use mqtt_fan::FanController;
//!
//! #[derive(Debug, Default)]
//! struct NullPublisher;
//!
//! impl SetpointPublisher for NullPublisher {
//!     fn publish_setpoint(&self, _setpoint: Setpoint) {}
//! }
//!
//! let degrees = DegreeTable::new(vec![10.0.into(), 20.0.into()], 0.0.into());
//! let fan = FanController::new(degrees, Arc::new(NullPublisher)).unwrap();
//! fan.toggle().unwrap();
//! assert!(fan.active());
//! ```

mod accessory;
mod bridge;
pub mod config;
pub mod error;
mod fan;
pub mod protocol;
pub mod state;
pub mod subscription;
pub mod types;

pub use accessory::{ActiveState, FanAccessory};
pub use bridge::FanBridge;
pub use config::{DegreeTable, FanConfig, MqttSettings};
pub use error::{ConfigError, Error, InvariantError, ProtocolError, Result, ValueError};
pub use fan::FanController;
pub use protocol::{
    MqttTransport, MqttTransportBuilder, SetpointPublisher, TOGGLE_TOPIC, TopicRouter, UPDATE_TOPIC,
};
pub use state::{FanState, StateChange};
pub use subscription::{CallbackRegistry, SubscriptionId};
pub use types::{Setpoint, SpeedPercent, level_to_percent, percent_to_level};
