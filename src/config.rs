// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan configuration.
//!
//! Configuration is loaded once at startup from JSON and validated before
//! any device is constructed. The shape mirrors the accessory's `config.json`
//! block:
//!
//! ```json
//! {
//!   "name": "Bedroom Fan",
//!   "mqtt": { "host": "localhost", "port": 1883 },
//!   "degrees": { "on": [10, 20, 30], "off": 0 }
//! }
//! ```

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::Setpoint;

/// Top-level fan configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FanConfig {
    /// Device display name. Cosmetic; not used by the state machine.
    #[serde(default)]
    pub name: String,
    /// MQTT broker connection settings.
    #[serde(default)]
    pub mqtt: MqttSettings,
    /// Setpoint table defining the fan's speed levels.
    pub degrees: DegreeTable,
}

impl FanConfig {
    /// Parses and validates a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the JSON is malformed or the setpoint table
    /// is invalid. Both are fatal: the device must not start.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the setpoint table is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.degrees.validate()
    }
}

/// MQTT broker connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MqttSettings {
    /// Broker hostname or IP address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Broker port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Optional broker username.
    #[serde(default)]
    pub username: Option<String>,
    /// Optional broker password.
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for MqttSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: None,
            password: None,
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    1883
}

/// The setpoint table mapping fan state to actuator commands.
///
/// Index `i` (0-based) of `on` holds the setpoint for speed level `i + 1`;
/// the number of entries defines how many speed levels the fan has.
///
/// # Examples
///
/// ```
/// use mqtt_fan::config::DegreeTable;
/// use mqtt_fan::types::Setpoint;
///
/// let degrees = DegreeTable::new(vec![10.0.into(), 20.0.into(), 30.0.into()], 0.0.into());
/// assert_eq!(degrees.level_count(), 3);
/// assert_eq!(degrees.setpoint_for(true, 2).unwrap().to_payload(), "20");
/// assert_eq!(degrees.setpoint_for(false, 2).unwrap().to_payload(), "0");
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct DegreeTable {
    /// One setpoint per speed level, lowest speed first.
    pub on: Vec<Setpoint>,
    /// The setpoint published when the fan is inactive.
    pub off: Setpoint,
}

impl DegreeTable {
    /// Creates a new setpoint table.
    #[must_use]
    pub fn new(on: Vec<Setpoint>, off: Setpoint) -> Self {
        Self { on, off }
    }

    /// Validates the table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoSpeedLevels` if `on` is empty, or
    /// `ConfigError::TooManyLevels` if it has more entries than the percent
    /// scale can distinguish.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.on.is_empty() {
            return Err(ConfigError::NoSpeedLevels);
        }
        if self.on.len() > 100 {
            return Err(ConfigError::TooManyLevels(self.on.len()));
        }
        Ok(())
    }

    /// Returns the number of configured speed levels.
    ///
    /// # Panics
    ///
    /// Never panics for a validated table (at most 100 entries).
    #[must_use]
    pub fn level_count(&self) -> u8 {
        u8::try_from(self.on.len().min(100)).unwrap_or(100)
    }

    /// Maps a fan state to its actuator setpoint.
    ///
    /// Returns `off` when inactive; otherwise the `on` entry for `level`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LevelOutOfBounds` if `level` has no entry in the
    /// table. The state machine's invariant makes this unreachable, but the
    /// lookup refuses to index out of range regardless.
    pub fn setpoint_for(&self, active: bool, level: u8) -> Result<Setpoint, ConfigError> {
        if !active {
            return Ok(self.off);
        }
        if level == 0 {
            return Err(ConfigError::LevelOutOfBounds {
                level,
                levels: self.level_count(),
            });
        }
        self.on
            .get(usize::from(level) - 1)
            .copied()
            .ok_or(ConfigError::LevelOutOfBounds {
                level,
                levels: self.level_count(),
            })
    }
}
