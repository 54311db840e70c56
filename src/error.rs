// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `mqtt-fan` library.
//!
//! This module provides the error hierarchy for handling failures across the
//! library: configuration validation, value constraints, state invariants,
//! and transport communication.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error in the fan configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Internal state was observed outside its documented bounds.
    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantError),

    /// Error occurred during transport communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Errors related to the fan configuration.
///
/// All of these are fatal at startup: a fan must not be constructed from an
/// invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The `degrees.on` table is empty; a fan needs at least one speed level.
    #[error("degrees.on must contain at least one setpoint")]
    NoSpeedLevels,

    /// More speed levels than the percent scale can distinguish.
    #[error("degrees.on has {0} entries, at most 100 are supported")]
    TooManyLevels(usize),

    /// A level was mapped that has no entry in the `degrees.on` table.
    #[error("level {level} has no setpoint, valid levels are 1..={levels}")]
    LevelOutOfBounds {
        /// The level that was requested.
        level: u8,
        /// The number of configured speed levels.
        levels: u8,
    },

    /// The configuration JSON could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors related to value validation and constraints.
///
/// These errors occur when a caller supplies a value outside its allowed
/// range. The offending call is rejected and no state is modified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u8,
        /// Maximum allowed value.
        max: u8,
        /// The actual value that was provided.
        actual: u8,
    },
}

/// Defensive errors raised when internal state is observed corrupted.
///
/// These should be unreachable. They are reported and the offending
/// transition is refused; they never crash the process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// The stored speed level was outside [1, levels].
    #[error("stored level {level} is outside [1, {levels}]")]
    LevelCorrupted {
        /// The corrupted level value.
        level: u8,
        /// The number of configured speed levels.
        levels: u8,
    },
}

/// Errors related to MQTT transport communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT connection or communication failed.
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Invalid broker address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
