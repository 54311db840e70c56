// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Routing of inbound messages to topic handlers.
//!
//! The [`TopicRouter`] maps a topic string to a handler function. The MQTT
//! event loop feeds every incoming publish through [`TopicRouter::route`];
//! messages on topics without a handler are ignored. New topics only need a
//! `register` call, no restructuring.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Handler invoked with the raw payload of a matching message.
type TopicHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Routes inbound messages to registered topic handlers.
#[derive(Default)]
pub struct TopicRouter {
    /// Map from topic name to its handler.
    handlers: RwLock<HashMap<String, TopicHandler>>,
}

impl TopicRouter {
    /// Creates a new empty topic router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for the given topic.
    ///
    /// If a previous handler exists for this topic, it is replaced.
    pub fn register<F>(&self, topic: impl Into<String>, handler: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let topic = topic.into();
        tracing::debug!(topic = %topic, "Registering topic handler");
        self.handlers.write().insert(topic, Arc::new(handler));
    }

    /// Removes the handler for a topic.
    ///
    /// Returns `true` if a handler was previously registered.
    pub fn unregister(&self, topic: &str) -> bool {
        tracing::debug!(topic = %topic, "Unregistering topic handler");
        self.handlers.write().remove(topic).is_some()
    }

    /// Routes an inbound message to its handler.
    ///
    /// Returns `true` if a handler was invoked. Messages on unknown topics
    /// are trace-logged and dropped; they are not an error.
    pub fn route(&self, topic: &str, payload: &str) -> bool {
        let handler = self.handlers.read().get(topic).cloned();

        let Some(handler) = handler else {
            tracing::trace!(topic = %topic, "Ignoring message on unhandled topic");
            return false;
        };

        tracing::debug!(topic = %topic, "Routing inbound message");
        handler(payload);
        true
    }

    /// Returns the registered topic names.
    ///
    /// The transport subscribes to exactly these topics.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        self.handlers.read().keys().cloned().collect()
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }
}

impl std::fmt::Debug for TopicRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicRouter")
            .field("topics", &self.topics())
            .finish()
    }
}
