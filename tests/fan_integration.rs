// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests over the public API: inbound message -> state transition
//! -> setpoint publish + accessory notification, using an in-memory
//! publisher in place of the MQTT transport.

use std::sync::Arc;

use parking_lot::Mutex;

use mqtt_fan::config::{DegreeTable, FanConfig};
use mqtt_fan::protocol::{SetpointPublisher, TOGGLE_TOPIC, TopicRouter};
use mqtt_fan::types::Setpoint;
use mqtt_fan::{ActiveState, FanAccessory, FanController};

/// Records every payload that would go out on the `update` topic.
#[derive(Debug, Default)]
struct RecordingPublisher {
    payloads: Mutex<Vec<String>>,
}

impl RecordingPublisher {
    fn payloads(&self) -> Vec<String> {
        self.payloads.lock().clone()
    }
}

impl SetpointPublisher for RecordingPublisher {
    fn publish_setpoint(&self, setpoint: Setpoint) {
        self.payloads.lock().push(setpoint.to_payload());
    }
}

/// A three-speed fan wired to a router the way `FanBridge` wires it, minus
/// the real broker.
fn wired_fan() -> (Arc<FanController>, Arc<RecordingPublisher>, TopicRouter) {
    let publisher = Arc::new(RecordingPublisher::default());
    let degrees = DegreeTable::new(vec![10.0.into(), 20.0.into(), 30.0.into()], 0.0.into());
    let controller = Arc::new(FanController::new(degrees, publisher.clone()).unwrap());

    let router = TopicRouter::new();
    let weak = Arc::downgrade(&controller);
    router.register(TOGGLE_TOPIC, move |_payload| {
        if let Some(controller) = weak.upgrade() {
            let _ = controller.toggle();
        }
    });

    (controller, publisher, router)
}

#[test]
fn toggle_messages_cycle_the_fan() {
    let (controller, publisher, router) = wired_fan();

    for _ in 0..5 {
        assert!(router.route(TOGGLE_TOPIC, ""));
    }

    // (t,1) (t,2) (t,3) (f,3) (t,1) with level memory across the off step.
    assert_eq!(publisher.payloads(), vec!["10", "20", "30", "0", "10"]);
    assert!(controller.active());
    assert_eq!(controller.speed_percent().value(), 33);
}

#[test]
fn unrelated_topics_change_nothing() {
    let (controller, publisher, router) = wired_fan();

    assert!(!router.route("update", "30"));
    assert!(!router.route("main_switch_2", ""));

    assert!(!controller.active());
    assert!(publisher.payloads().is_empty());
}

#[test]
fn accessory_writes_and_toggle_messages_share_one_state() {
    let (controller, publisher, router) = wired_fan();
    let accessory = FanAccessory::new(Arc::clone(&controller));

    // Framework sets 100% while the fan is off: speed is remembered.
    accessory.handle_rotation_speed_set(100).unwrap();
    assert_eq!(accessory.handle_active_get(), ActiveState::Inactive);

    // A toggle message powers on at level 1 regardless of the remembered
    // speed.
    router.route(TOGGLE_TOPIC, "");
    assert_eq!(accessory.handle_active_get(), ActiveState::Active);
    assert_eq!(accessory.handle_rotation_speed_get().value(), 33);

    assert_eq!(publisher.payloads(), vec!["0", "10"]);
}

#[test]
fn toggle_transitions_notify_the_accessory_layer() {
    let (controller, _publisher, router) = wired_fan();
    let accessory = FanAccessory::new(Arc::clone(&controller));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    accessory.on_speed_changed(move |percent| {
        s.lock().push(percent.value());
    });

    router.route(TOGGLE_TOPIC, "");
    router.route(TOGGLE_TOPIC, "");

    assert_eq!(seen.lock().clone(), vec![33, 66]);
}

#[test]
fn config_drives_the_level_count() {
    let config = FanConfig::from_json(
        r#"{
            "name": "Workshop Fan",
            "degrees": { "on": [25, 50, 75, 100], "off": 0 }
        }"#,
    )
    .unwrap();

    let publisher = Arc::new(RecordingPublisher::default());
    let controller = FanController::new(config.degrees, publisher.clone()).unwrap();
    assert_eq!(controller.level_count(), 4);

    controller.set_state(true, 4).unwrap();
    assert_eq!(publisher.payloads(), vec!["100"]);
    assert_eq!(controller.speed_percent().value(), 100);
}

#[test]
fn invalid_write_is_isolated_from_the_wire() {
    let (controller, publisher, _router) = wired_fan();

    controller.set_state(true, 2).unwrap();
    assert!(controller.set_state(true, 9).is_err());

    // The failed write neither moved state nor produced traffic.
    assert_eq!(controller.state().level, 2);
    assert_eq!(publisher.payloads(), vec!["20"]);
}
