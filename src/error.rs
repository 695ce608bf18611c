// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the adaptor.
//!
//! None of these errors are fatal to a running adaptor: message handlers log
//! them and carry on. They exist so that parsing and validation code can use
//! `?` and so that callers of the public API get typed failures.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A domain value was invalid.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// An inbound message could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The adaptor configuration is invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The adaptor runtime is no longer accepting events.
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Errors raised when a value does not belong to the adaptor's vocabulary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Characteristic name not offered by this device.
    #[error("unknown characteristic: {0}")]
    UnknownCharacteristic(String),

    /// Command class id that could not be parsed.
    #[error("invalid command class: {0}")]
    InvalidCommandClass(String),

    /// Switch payload other than `on` / `off`.
    #[error("invalid switch command: {0}")]
    InvalidSwitchCommand(String),

    /// Lifecycle state name that is not recognised.
    #[error("invalid adaptor state: {0}")]
    InvalidAdaptorState(String),
}

/// Errors related to parsing inbound messages.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON decoding failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the message.
    #[error("missing field in message: {0}")]
    MissingField(String),

    /// A field was present but held the wrong kind of value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },

    /// A domain value inside the message was invalid.
    #[error(transparent)]
    Value(#[from] ValueError),
}

impl ParseError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Errors related to adaptor configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A timer period was zero.
    #[error("{0} must be greater than zero")]
    ZeroPeriod(&'static str),

    /// The power clamp bounds are inverted.
    #[error("power clamp minimum {min} is greater than maximum {max}")]
    InvertedPowerBounds {
        /// Configured lower bound.
        min: f64,
        /// Configured upper bound.
        max: f64,
    },

    /// A required field was empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Errors related to the adaptor runtime task.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// The runtime task has stopped and its inbox is closed.
    #[error("adaptor runtime has stopped")]
    Stopped,
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::UnknownCharacteristic("humidity".to_string());
        assert_eq!(err.to_string(), "unknown characteristic: humidity");
    }

    #[test]
    fn error_from_value_error() {
        let err: Error = ValueError::InvalidSwitchCommand("dim".to_string()).into();
        assert!(matches!(
            err,
            Error::Value(ValueError::InvalidSwitchCommand(ref s)) if s == "dim"
        ));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("data.updateTime".to_string());
        assert_eq!(err.to_string(), "missing field in message: data.updateTime");

        let err = ParseError::invalid("data.val.value", "expected a number");
        assert_eq!(
            err.to_string(),
            "failed to parse data.val.value: expected a number"
        );
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvertedPowerBounds {
            min: 10.0,
            max: 5.0,
        };
        assert_eq!(
            err.to_string(),
            "power clamp minimum 10 is greater than maximum 5"
        );
        assert_eq!(
            ConfigError::ZeroPeriod("poll_interval").to_string(),
            "poll_interval must be greater than zero"
        );
    }
}
