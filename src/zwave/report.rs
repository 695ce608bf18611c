// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound messages from the Z-Wave transport.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::CommandClass;
use crate::error::ParseError;

/// Kind of message delivered by the Z-Wave transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZwaveContent {
    /// The device node is ready; the adaptor should start querying it.
    Init,
    /// A value report from the device.
    Data,
    /// Anything else; ignored.
    #[serde(other)]
    Other,
}

/// A message as delivered by the Z-Wave transport.
///
/// Only `content` is mandatory at this level. The remaining fields are
/// validated when the message is turned into a [`RawReport`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZwaveMessage {
    /// Message kind.
    pub content: ZwaveContent,
    /// Command class id as a string, e.g. `"50"`.
    #[serde(default)]
    pub command_class: Option<String>,
    /// Value selector when the transport uses the top-level field.
    #[serde(default)]
    pub value: Option<Value>,
    /// Device data tree for the reported value.
    #[serde(default)]
    pub data: Option<Value>,
}

impl ZwaveMessage {
    /// Parses a message from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if the text is not a valid message.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Where the transport puts the value selector of a report.
///
/// Transports differ: some send the meter scale or `"level"` in the
/// top-level `value` field, others in `data.name`. Which one applies is a
/// property of the deployment and is configured, never guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorShape {
    /// Selector in the top-level `value` field.
    #[default]
    ValueField,
    /// Selector in `data.name`.
    DataName,
}

/// Normalized identifier of the value inside a command class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Numeric selector, e.g. the meter scale (0 = kWh, 2 = W, ...).
    Index(u8),
    /// Binary switch level.
    Level,
    /// Time of the last wake-up notification.
    LastWakeup,
    /// Any other named selector.
    Named(String),
}

impl Selector {
    fn from_json(value: &Value) -> Result<Self, ParseError> {
        match value {
            Value::String(s) => Ok(Self::from_name(s)),
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .map(Self::Index)
                .ok_or_else(|| ParseError::invalid("selector", format!("{n} is not a valid index"))),
            other => Err(ParseError::invalid(
                "selector",
                format!("expected string or number, got {other}"),
            )),
        }
    }

    fn from_name(name: &str) -> Self {
        if let Ok(index) = name.parse::<u8>() {
            return Self::Index(index);
        }
        match name {
            "level" => Self::Level,
            "lastWakeup" => Self::LastWakeup,
            other => Self::Named(other.to_string()),
        }
    }

    /// Returns the selector as the transport expects it in a command.
    #[must_use]
    pub fn as_wire(&self) -> String {
        match self {
            Self::Index(i) => i.to_string(),
            Self::Level => "level".to_string(),
            Self::LastWakeup => "lastWakeup".to_string(),
            Self::Named(s) => s.clone(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_wire())
    }
}

/// A device value report normalized to a single shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReport {
    /// Command class of the report.
    pub command_class: CommandClass,
    /// Which value inside the command class was reported.
    pub selector: Selector,
    /// The reported value, if any.
    pub value: Option<Value>,
    /// Device timestamp of this particular value (Unix seconds).
    pub update_time: Option<f64>,
    /// Device timestamp of the report as a whole (Unix seconds).
    ///
    /// Taken from `data.updateTime`, falling back to the value's own
    /// timestamp. Used for liveness.
    pub report_time: Option<f64>,
}

impl RawReport {
    /// Normalizes a `data` message from the transport.
    ///
    /// Readings are looked up under `data.val` when that is an object, and
    /// directly under `data` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the command class, selector or data tree is
    /// missing or malformed.
    pub fn from_message(message: &ZwaveMessage, shape: SelectorShape) -> Result<Self, ParseError> {
        let command_class = message
            .command_class
            .as_deref()
            .ok_or_else(|| ParseError::MissingField("commandClass".to_string()))?
            .parse::<CommandClass>()?;

        let data = message
            .data
            .as_ref()
            .filter(|d| d.is_object())
            .ok_or_else(|| ParseError::MissingField("data".to_string()))?;

        let selector = match shape {
            SelectorShape::ValueField => message
                .value
                .as_ref()
                .ok_or_else(|| ParseError::MissingField("value".to_string()))?,
            SelectorShape::DataName => data
                .get("name")
                .ok_or_else(|| ParseError::MissingField("data.name".to_string()))?,
        };
        let selector = Selector::from_json(selector)?;

        let reading = data.get("val").filter(|v| v.is_object()).unwrap_or(data);
        let update_time = timestamp(reading, "updateTime")?;
        let report_time = timestamp(data, "updateTime")?.or(update_time);

        Ok(Self {
            command_class,
            selector,
            value: reading.get("value").cloned(),
            update_time,
            report_time,
        })
    }
}

fn timestamp(tree: &Value, field: &str) -> Result<Option<f64>, ParseError> {
    match tree.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| ParseError::invalid(field, format!("expected a number, got {v}"))),
    }
}
