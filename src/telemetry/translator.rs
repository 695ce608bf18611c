// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translation of raw Z-Wave reports into characteristic updates.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::PowerClamp;
use crate::AdaptorConfig;
use crate::clock::unix_seconds;
use crate::error::ParseError;
use crate::state::{CharacteristicUpdate, DeviceState};
use crate::types::{Characteristic, CharacteristicValue, SwitchState};
use crate::zwave::{CommandClass, RawReport, Selector};

/// What a `(command class, selector)` pair maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mapping {
    /// A meter reading published as a number.
    Numeric(Characteristic),
    /// A boolean published as `"on"` / `"off"` on `binary_sensor`.
    Binary {
        /// Whether the value also reflects the relay state.
        tracks_switch: bool,
    },
    /// Understood but not published.
    Ignored,
}

impl Mapping {
    fn lookup(command_class: CommandClass, selector: &Selector) -> Option<Self> {
        let mapping = match (command_class, selector) {
            (CommandClass::Meter, Selector::Index(0)) => Self::Numeric(Characteristic::Energy),
            (CommandClass::Meter, Selector::Index(2)) => Self::Numeric(Characteristic::Power),
            (CommandClass::Meter, Selector::Index(4)) => Self::Numeric(Characteristic::Voltage),
            (CommandClass::Meter, Selector::Index(5)) => Self::Numeric(Characteristic::Current),
            (CommandClass::Meter, Selector::Index(6)) => {
                Self::Numeric(Characteristic::PowerFactor)
            }
            (CommandClass::SwitchBinary, Selector::Level) => Self::Binary {
                tracks_switch: true,
            },
            (CommandClass::Alarm, Selector::Index(1)) => Self::Binary {
                tracks_switch: false,
            },
            (CommandClass::WakeUp, Selector::LastWakeup) => Self::Ignored,
            _ => return None,
        };
        Some(mapping)
    }

    fn characteristic(self) -> Option<Characteristic> {
        match self {
            Self::Numeric(c) => Some(c),
            Self::Binary { .. } => Some(Characteristic::BinarySensor),
            Self::Ignored => None,
        }
    }
}

/// Result of translating one report.
#[derive(Debug, Clone, PartialEq)]
pub struct Translated {
    /// The update to record and publish.
    pub update: CharacteristicUpdate,
    /// New relay state carried by the report, if any.
    pub switch_state: Option<SwitchState>,
}

/// Maps raw reports to characteristic updates.
///
/// The translator is stateless: it reads the [`DeviceState`] to decide
/// whether a report is a duplicate but never mutates it. Applying the result
/// is the caller's job.
///
/// # Examples
///
/// ```
/// use chrono::{DateTime, Utc};
/// use zwave_meter_socket::AdaptorConfig;
/// use zwave_meter_socket::state::DeviceState;
/// use zwave_meter_socket::telemetry::InboundTranslator;
/// use zwave_meter_socket::zwave::{RawReport, SelectorShape, ZwaveMessage};
///
/// let translator = InboundTranslator::from_config(&AdaptorConfig::new("zw1", "5"));
/// let msg = ZwaveMessage::from_json(
///     r#"{"content":"data","commandClass":"50","value":"2","data":{"val":{"value":5000,"updateTime":1700000000}}}"#,
/// ).unwrap();
/// let report = RawReport::from_message(&msg, SelectorShape::ValueField).unwrap();
/// let now = DateTime::from_timestamp(1_700_000_010, 0).unwrap();
///
/// let translated = translator.translate(&report, &DeviceState::new(), now).unwrap().unwrap();
/// assert_eq!(translated.update.value.as_f64(), Some(0.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InboundTranslator {
    power_clamp: PowerClamp,
    deduplicate: bool,
    staleness_cutoff: Duration,
}

impl InboundTranslator {
    /// Creates a translator from the adaptor configuration.
    #[must_use]
    pub fn from_config(config: &AdaptorConfig) -> Self {
        Self {
            power_clamp: config.power_clamp,
            deduplicate: config.deduplicate,
            staleness_cutoff: config.staleness_cutoff,
        }
    }

    /// Translates a report observed at `now`.
    ///
    /// Returns `Ok(None)` for reports that are understood but produce no
    /// update: unknown selectors, wake-up notifications, duplicates and stale
    /// readings.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if a mapped report lacks its timestamp or
    /// carries a value of the wrong type.
    pub fn translate(
        &self,
        report: &RawReport,
        state: &DeviceState,
        now: DateTime<Utc>,
    ) -> Result<Option<Translated>, ParseError> {
        let Some(mapping) = Mapping::lookup(report.command_class, &report.selector) else {
            tracing::debug!(
                command_class = %report.command_class,
                selector = %report.selector,
                "Ignoring report for unmapped value"
            );
            return Ok(None);
        };
        let Some(characteristic) = mapping.characteristic() else {
            return Ok(None);
        };

        let device_time = report
            .update_time
            .ok_or_else(|| ParseError::MissingField("updateTime".to_string()))?;

        if self.deduplicate && !self.is_fresh(characteristic, device_time, state, now) {
            return Ok(None);
        }

        let raw = report
            .value
            .as_ref()
            .ok_or_else(|| ParseError::MissingField("value".to_string()))?;

        let (value, switch_state) = match mapping {
            Mapping::Numeric(Characteristic::Power) => {
                let watts = number(raw)?;
                let clamped = self.power_clamp.apply(watts);
                if (clamped - watts).abs() > f64::EPSILON {
                    tracing::debug!(
                        raw = watts,
                        published = clamped,
                        policy = ?self.power_clamp.policy,
                        "Power reading out of range"
                    );
                }
                (CharacteristicValue::Number(clamped), None)
            }
            Mapping::Numeric(_) => (CharacteristicValue::Number(number(raw)?), None),
            Mapping::Binary { tracks_switch } => {
                let switch = SwitchState::from(truthy(raw)?);
                let value = CharacteristicValue::from(switch.as_str());
                (value, tracks_switch.then_some(switch))
            }
            Mapping::Ignored => return Ok(None),
        };

        Ok(Some(Translated {
            update: CharacteristicUpdate {
                characteristic,
                value,
                timestamp: now,
                device_time: Some(device_time),
            },
            switch_state,
        }))
    }

    fn is_fresh(
        &self,
        characteristic: Characteristic,
        device_time: f64,
        state: &DeviceState,
        now: DateTime<Utc>,
    ) -> bool {
        if state.last_device_time(characteristic) == Some(device_time) {
            tracing::trace!(%characteristic, device_time, "Dropping repeated report");
            return false;
        }
        let age = unix_seconds(now) - device_time;
        if age >= self.staleness_cutoff.as_secs_f64() {
            tracing::debug!(%characteristic, device_time, age, "Dropping stale report");
            return false;
        }
        true
    }
}

fn number(value: &Value) -> Result<f64, ParseError> {
    value
        .as_f64()
        .ok_or_else(|| ParseError::invalid("value", format!("expected a number, got {value}")))
}

fn truthy(value: &Value) -> Result<bool, ParseError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|n| n != 0.0)),
        other => Err(ParseError::invalid(
            "value",
            format!("expected a boolean, got {other}"),
        )),
    }
}
