// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT transport implementation.
//!
//! [`MqttTransport`] owns the broker connection. Inbound messages are fed to
//! a [`TopicRouter`] from a background event-loop task; outbound setpoints
//! are published through the non-blocking [`SetpointPublisher`] impl.
//! Reconnection is handled by polling the rumqttc event loop, which
//! re-establishes the connection on the next poll after an error.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};

use crate::config::MqttSettings;
use crate::error::ProtocolError;
use crate::protocol::{SetpointPublisher, TopicRouter, UPDATE_TOPIC};
use crate::types::Setpoint;

/// Global counter for generating unique client IDs.
static CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// MQTT transport for the fan.
///
/// Cheap to clone into the publisher role: the underlying rumqttc client is
/// itself a handle onto the shared connection.
#[derive(Debug, Clone)]
pub struct MqttTransport {
    client: AsyncClient,
}

impl MqttTransport {
    /// Returns a builder for configuring the transport.
    #[must_use]
    pub fn builder() -> MqttTransportBuilder {
        MqttTransportBuilder::new()
    }

    /// Subscribes to an inbound topic.
    ///
    /// Messages arriving on it are fed to the router this transport was
    /// opened with. Subscribe only after the router has a handler for the
    /// topic, otherwise early messages are dropped as unhandled.
    ///
    /// # Errors
    ///
    /// Returns error if the subscription cannot be enqueued.
    pub async fn subscribe(&self, topic: impl Into<String>) -> Result<(), ProtocolError> {
        self.client
            .subscribe(topic.into(), QoS::AtLeastOnce)
            .await
            .map_err(ProtocolError::Mqtt)
    }
}

impl SetpointPublisher for MqttTransport {
    /// Publishes the setpoint on the `update` topic, best-effort.
    ///
    /// Uses `try_publish` so the caller never blocks on the broker. A full
    /// request queue or lost connection is logged and dropped; the next
    /// transition re-publishes the then-current setpoint.
    fn publish_setpoint(&self, setpoint: Setpoint) {
        let payload = setpoint.to_payload();
        match self
            .client
            .try_publish(UPDATE_TOPIC, QoS::AtMostOnce, false, payload.clone())
        {
            Ok(()) => {
                tracing::debug!(topic = UPDATE_TOPIC, payload = %payload, "Published setpoint");
            }
            Err(e) => {
                tracing::warn!(
                    topic = UPDATE_TOPIC,
                    payload = %payload,
                    error = %e,
                    "Failed to publish setpoint"
                );
            }
        }
    }
}

/// Builder for creating an MQTT transport.
#[derive(Debug, Default)]
pub struct MqttTransportBuilder {
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    client_id: Option<String>,
    keep_alive: Option<Duration>,
}

impl MqttTransportBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-populated from configuration.
    ///
    /// A username without a password authenticates with an empty password;
    /// a password alone is ignored, the broker has no one to authenticate.
    #[must_use]
    pub fn from_settings(settings: &MqttSettings) -> Self {
        let mut builder = Self::new().host(&settings.host).port(settings.port);
        if let Some(username) = &settings.username {
            builder = builder.credentials(username, settings.password.as_deref().unwrap_or(""));
        }
        builder
    }

    /// Sets the broker hostname or IP address.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the broker port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets authentication credentials for the broker.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets a custom client ID.
    #[must_use]
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    /// Sets the keep-alive interval.
    #[must_use]
    pub fn keep_alive(mut self, duration: Duration) -> Self {
        self.keep_alive = Some(duration);
        self
    }

    /// Opens the transport and starts its event-loop task, without
    /// subscribing to anything yet.
    ///
    /// Incoming publishes are routed to `router` for the lifetime of the
    /// connection; add subscriptions with [`MqttTransport::subscribe`] once
    /// their handlers are registered. Must be called within a Tokio runtime,
    /// the event-loop task is spawned immediately.
    ///
    /// # Errors
    ///
    /// Returns error if the host is missing or empty.
    pub fn open(self, router: Arc<TopicRouter>) -> Result<MqttTransport, ProtocolError> {
        let host = self
            .host
            .ok_or_else(|| ProtocolError::InvalidAddress("host is required".to_string()))?;
        if host.is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "host must not be empty".to_string(),
            ));
        }
        let port = self.port.unwrap_or(1883);

        // Generate or use provided client ID (PID + counter to avoid conflicts)
        let client_id = self.client_id.unwrap_or_else(|| {
            let counter = CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
            format!("mqtt_fan_{}_{}", std::process::id(), counter)
        });

        let mut mqtt_options = MqttOptions::new(&client_id, host, port);
        mqtt_options.set_keep_alive(self.keep_alive.unwrap_or(Duration::from_secs(30)));
        mqtt_options.set_clean_session(true);

        if let (Some(username), Some(password)) = (self.username, self.password) {
            mqtt_options.set_credentials(username, password);
        }

        let (client, event_loop) = AsyncClient::new(mqtt_options, 10);

        tokio::spawn(handle_mqtt_events(event_loop, router));

        Ok(MqttTransport { client })
    }

    /// Opens the transport and subscribes to every topic currently
    /// registered on `router`.
    ///
    /// Convenience for callers whose router is fully populated up front.
    ///
    /// # Errors
    ///
    /// Returns error if the host is missing or a subscription cannot be
    /// enqueued.
    pub async fn connect(self, router: Arc<TopicRouter>) -> Result<MqttTransport, ProtocolError> {
        let topics = router.topics();
        let transport = self.open(router)?;
        for topic in topics {
            transport.subscribe(topic).await?;
        }
        Ok(transport)
    }
}

/// Drives the MQTT event loop, feeding incoming publishes to the router.
///
/// Poll errors cover connection loss; rumqttc reconnects on the next poll,
/// so the loop backs off briefly and keeps polling.
async fn handle_mqtt_events(mut event_loop: EventLoop, router: Arc<TopicRouter>) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, "MQTT connected");
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                match String::from_utf8(publish.payload.to_vec()) {
                    Ok(payload) => {
                        router.route(&publish.topic, &payload);
                    }
                    Err(_) => {
                        // Topic-only signals still route; the payload is opaque.
                        router.route(&publish.topic, "");
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "MQTT event loop error, reconnecting");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_fields() {
        let builder = MqttTransportBuilder::new()
            .host("broker.local")
            .port(8883)
            .credentials("user", "pass")
            .client_id("my_fan")
            .keep_alive(Duration::from_secs(60));

        assert_eq!(builder.host, Some("broker.local".to_string()));
        assert_eq!(builder.port, Some(8883));
        assert_eq!(builder.username, Some("user".to_string()));
        assert_eq!(builder.password, Some("pass".to_string()));
        assert_eq!(builder.client_id, Some("my_fan".to_string()));
        assert_eq!(builder.keep_alive, Some(Duration::from_secs(60)));
    }

    #[test]
    fn builder_from_settings() {
        let settings = MqttSettings {
            host: "192.168.1.50".to_string(),
            port: 1884,
            username: Some("fan".to_string()),
            password: Some("secret".to_string()),
        };

        let builder = MqttTransportBuilder::from_settings(&settings);
        assert_eq!(builder.host, Some("192.168.1.50".to_string()));
        assert_eq!(builder.port, Some(1884));
        assert_eq!(builder.username, Some("fan".to_string()));
        assert_eq!(builder.password, Some("secret".to_string()));
    }

    #[test]
    fn builder_from_settings_username_only() {
        let settings = MqttSettings {
            host: "192.168.1.50".to_string(),
            port: 1883,
            username: Some("fan".to_string()),
            password: None,
        };

        // A lone username still authenticates, with an empty password.
        let builder = MqttTransportBuilder::from_settings(&settings);
        assert_eq!(builder.username, Some("fan".to_string()));
        assert_eq!(builder.password, Some(String::new()));
    }

    #[test]
    fn builder_from_settings_without_credentials() {
        let settings = MqttSettings::default();

        let builder = MqttTransportBuilder::from_settings(&settings);
        assert_eq!(builder.host, Some("localhost".to_string()));
        assert_eq!(builder.port, Some(1883));
        assert!(builder.username.is_none());
        assert!(builder.password.is_none());
    }

    #[tokio::test]
    async fn connect_requires_host() {
        let router = Arc::new(TopicRouter::new());
        let result = MqttTransportBuilder::new().connect(router).await;
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }
}
