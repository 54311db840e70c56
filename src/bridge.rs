// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Startup wiring.
//!
//! [`FanBridge`] assembles a running fan from a validated [`FanConfig`]:
//! it connects the MQTT transport, hands it to a fresh [`FanController`] as
//! the setpoint publisher, and registers the toggle handler so inbound
//! messages on the toggle topic advance the fan's cycle.

use std::sync::Arc;

use crate::accessory::FanAccessory;
use crate::config::{DegreeTable, FanConfig};
use crate::error::Result;
use crate::fan::FanController;
use crate::protocol::{MqttTransportBuilder, SetpointPublisher, TOGGLE_TOPIC, TopicRouter};

/// A fully wired fan: transport, state machine, and accessory surface.
#[derive(Debug)]
pub struct FanBridge {
    controller: Arc<FanController>,
    router: Arc<TopicRouter>,
}

impl FanBridge {
    /// Validates the configuration, connects to the broker, and wires the
    /// fan.
    ///
    /// Nothing is persisted across restarts: connecting publishes the off
    /// setpoint so the actuator lands in the known startup state (inactive,
    /// level 1) no matter where a previous run left it. The toggle handler
    /// is bound before the broker subscription exists, so no inbound message
    /// can slip through unhandled.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an invalid configuration and
    /// `ProtocolError` if the transport cannot be set up. Both are fatal at
    /// startup.
    pub async fn connect(config: FanConfig) -> Result<Self> {
        config.validate()?;

        tracing::info!(name = %config.name, levels = config.degrees.level_count(), "Starting fan");

        let router = Arc::new(TopicRouter::new());
        let transport =
            MqttTransportBuilder::from_settings(&config.mqtt).open(Arc::clone(&router))?;

        let publisher: Arc<dyn SetpointPublisher> = Arc::new(transport.clone());
        let controller = Self::assemble(config.degrees, publisher, &router)?;

        transport.subscribe(TOGGLE_TOPIC).await?;

        Ok(Self { controller, router })
    }

    /// Builds the controller, binds the toggle handler, and re-asserts the
    /// startup state.
    ///
    /// The physical fan may be anywhere after a restart; publishing the off
    /// setpoint drives it back onto the state the controller believes in.
    fn assemble(
        degrees: DegreeTable,
        publisher: Arc<dyn SetpointPublisher>,
        router: &TopicRouter,
    ) -> Result<Arc<FanController>> {
        let controller = Arc::new(FanController::new(degrees, publisher)?);
        Self::register_toggle_handler(router, &controller);
        controller.set_active(false)?;
        Ok(controller)
    }

    /// Binds the toggle topic to the controller's toggle transition.
    ///
    /// Holds only a `Weak` reference so a dropped controller does not keep
    /// cycling; the payload is ignored, the topic is the signal.
    fn register_toggle_handler(router: &TopicRouter, controller: &Arc<FanController>) {
        let weak = Arc::downgrade(controller);
        router.register(TOGGLE_TOPIC, move |_payload| {
            let Some(controller) = weak.upgrade() else {
                tracing::trace!("Toggle message after controller shutdown");
                return;
            };
            if let Err(e) = controller.toggle() {
                tracing::error!(error = %e, "Toggle transition refused");
            }
        });
    }

    /// Returns the fan controller.
    #[must_use]
    pub fn controller(&self) -> &Arc<FanController> {
        &self.controller
    }

    /// Returns the accessory handler surface for this fan.
    #[must_use]
    pub fn accessory(&self) -> FanAccessory {
        FanAccessory::new(Arc::clone(&self.controller))
    }

    /// Returns the inbound topic router.
    #[must_use]
    pub fn router(&self) -> &Arc<TopicRouter> {
        &self.router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DegreeTable;
    use crate::protocol::SetpointPublisher;
    use crate::state::FanState;
    use crate::types::Setpoint;

    #[derive(Debug, Default)]
    struct NullPublisher;

    impl SetpointPublisher for NullPublisher {
        fn publish_setpoint(&self, _setpoint: Setpoint) {}
    }

    #[derive(Debug, Default)]
    struct RecordingPublisher {
        payloads: parking_lot::Mutex<Vec<String>>,
    }

    impl SetpointPublisher for RecordingPublisher {
        fn publish_setpoint(&self, setpoint: Setpoint) {
            self.payloads.lock().push(setpoint.to_payload());
        }
    }

    #[test]
    fn startup_publishes_off_setpoint() {
        let publisher = Arc::new(RecordingPublisher::default());
        let degrees = DegreeTable::new(vec![10.0.into(), 20.0.into()], 0.0.into());

        let router = TopicRouter::new();
        let controller =
            FanBridge::assemble(degrees, Arc::clone(&publisher) as _, &router).unwrap();

        // The actuator is driven to the known reset state on every start.
        assert_eq!(publisher.payloads.lock().clone(), vec!["0"]);
        assert_eq!(controller.state(), FanState::default());

        // And the toggle handler is already live at that point.
        assert!(router.route(TOGGLE_TOPIC, ""));
        assert_eq!(publisher.payloads.lock().clone(), vec!["0", "10"]);
    }

    #[test]
    fn toggle_handler_drives_controller() {
        let degrees = DegreeTable::new(vec![10.0.into(), 20.0.into()], 0.0.into());
        let controller =
            Arc::new(FanController::new(degrees, Arc::new(NullPublisher)).unwrap());

        let router = TopicRouter::new();
        FanBridge::register_toggle_handler(&router, &controller);

        assert!(router.route(TOGGLE_TOPIC, ""));
        assert_eq!(controller.state(), FanState::new(true, 1));

        // Payload content is irrelevant.
        assert!(router.route(TOGGLE_TOPIC, "whatever"));
        assert_eq!(controller.state(), FanState::new(true, 2));
    }

    #[test]
    fn toggle_handler_survives_dropped_controller() {
        let degrees = DegreeTable::new(vec![10.0.into()], 0.0.into());
        let controller =
            Arc::new(FanController::new(degrees, Arc::new(NullPublisher)).unwrap());

        let router = TopicRouter::new();
        FanBridge::register_toggle_handler(&router, &controller);
        drop(controller);

        // Routing still succeeds; the handler no-ops on the dead reference.
        assert!(router.route(TOGGLE_TOPIC, ""));
    }

    #[test]
    fn unrelated_topic_does_not_reach_controller() {
        let degrees = DegreeTable::new(vec![10.0.into()], 0.0.into());
        let controller =
            Arc::new(FanController::new(degrees, Arc::new(NullPublisher)).unwrap());

        let router = TopicRouter::new();
        FanBridge::register_toggle_handler(&router, &controller);

        assert!(!router.route("some_other_topic", "payload"));
        assert_eq!(controller.state(), FanState::default());
    }
}
