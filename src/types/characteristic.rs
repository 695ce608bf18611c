// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Characteristics exposed to subscriber applications.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// A named signal published by the adaptor.
///
/// Characteristics decouple subscriber applications from raw Z-Wave
/// command classes. Their wire names are the `snake_case` strings returned
/// by [`as_str`](Self::as_str).
///
/// # Examples
///
/// ```
/// use zwave_meter_socket::types::Characteristic;
///
/// let c: Characteristic = "power_factor".parse().unwrap();
/// assert_eq!(c, Characteristic::PowerFactor);
/// assert_eq!(c.to_string(), "power_factor");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Characteristic {
    /// Accumulated energy in kWh.
    Energy,
    /// Instantaneous power in W.
    Power,
    /// Mains voltage in V.
    Voltage,
    /// Load current in A.
    Current,
    /// Power factor (0-1).
    PowerFactor,
    /// Relay state reported by the device, as `"on"` / `"off"`.
    BinarySensor,
    /// Switch actuation channel.
    Switch,
    /// Derived device reachability.
    Connected,
}

impl Characteristic {
    /// Every characteristic, in announcement order.
    pub const ALL: [Self; 8] = [
        Self::Energy,
        Self::Power,
        Self::Voltage,
        Self::Current,
        Self::PowerFactor,
        Self::Connected,
        Self::BinarySensor,
        Self::Switch,
    ];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Energy => "energy",
            Self::Power => "power",
            Self::Voltage => "voltage",
            Self::Current => "current",
            Self::PowerFactor => "power_factor",
            Self::BinarySensor => "binary_sensor",
            Self::Switch => "switch",
            Self::Connected => "connected",
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Characteristic {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValueError::UnknownCharacteristic(s.to_string()))
    }
}

/// The value carried by a characteristic update.
///
/// Serialized untagged, so a reading of 120 W appears as `120.0` in the
/// `data` field, a connectivity flag as `true`, and a binary sensor as
/// `"on"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    /// Numeric meter reading.
    Number(f64),
    /// Boolean flag.
    Bool(bool),
    /// Text value.
    Text(String),
}

impl CharacteristicValue {
    /// Returns the numeric value, if this is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text value, if this is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for CharacteristicValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for CharacteristicValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}
