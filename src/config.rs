// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adaptor configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ParseError};
use crate::telemetry::PowerClamp;
use crate::zwave::SelectorShape;

/// How often sensor values are requested from the device.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// How often connectivity is re-evaluated and published.
pub const DEFAULT_LIVENESS_PERIOD: Duration = Duration::from_secs(60);

/// Delay before the first connectivity check after device init.
pub const DEFAULT_LIVENESS_INITIAL_DELAY: Duration = Duration::from_secs(30);

/// Expected maximum gap between two device reports.
pub const DEFAULT_CHECK_ALIVE_INTERVAL: Duration = Duration::from_secs(120);

/// Slack added to [`DEFAULT_CHECK_ALIVE_INTERVAL`] before declaring the device gone.
pub const DEFAULT_LIVENESS_GRACE: Duration = Duration::from_secs(60);

/// Reports older than this are considered stale and dropped.
pub const DEFAULT_STALENESS_CUTOFF: Duration = Duration::from_secs(1800);

const DEFAULT_NAME: &str = "zwave_power_meter_socket";

/// Configuration for one adaptor instance.
///
/// Durations are expressed in whole seconds when (de)serialized.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use zwave_meter_socket::AdaptorConfig;
/// use zwave_meter_socket::telemetry::{ClampPolicy, PowerClamp};
///
/// let config = AdaptorConfig::new("zwave7", "12")
///     .with_name("Kitchen socket")
///     .with_power_clamp(PowerClamp::new(ClampPolicy::CapAtMax))
///     .with_poll_interval(Duration::from_secs(30));
///
/// assert!(config.validate().is_ok());
///
/// let from_hub = AdaptorConfig::from_json(r#"{"id":"zwave7","address":"12","poll_interval":30}"#).unwrap();
/// assert_eq!(from_hub.poll_interval, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptorConfig {
    /// Adaptor id on the hub bus.
    pub id: String,
    /// Human readable adaptor name, sent in service announcements.
    #[serde(default = "default_name")]
    pub name: String,
    /// Z-Wave node address of the socket.
    pub address: String,
    /// Sensor polling period.
    #[serde(default = "default_poll_interval", with = "seconds")]
    pub poll_interval: Duration,
    /// Delay before the first poll after device init.
    #[serde(default = "default_poll_interval", with = "seconds")]
    pub poll_initial_delay: Duration,
    /// Connectivity check period.
    #[serde(default = "default_liveness_period", with = "seconds")]
    pub liveness_period: Duration,
    /// Delay before the first connectivity check after device init.
    #[serde(default = "default_liveness_initial_delay", with = "seconds")]
    pub liveness_initial_delay: Duration,
    /// Expected maximum gap between device reports.
    #[serde(default = "default_check_alive_interval", with = "seconds")]
    pub check_alive_interval: Duration,
    /// Slack on top of `check_alive_interval`.
    #[serde(default = "default_liveness_grace", with = "seconds")]
    pub liveness_grace: Duration,
    /// Maximum age of a report before it is dropped.
    #[serde(default = "default_staleness_cutoff", with = "seconds")]
    pub staleness_cutoff: Duration,
    /// Drop repeated and stale reports.
    #[serde(default = "default_deduplicate")]
    pub deduplicate: bool,
    /// Plausibility limits for power readings.
    #[serde(default)]
    pub power_clamp: PowerClamp,
    /// Where the transport puts the value selector.
    #[serde(default)]
    pub selector_shape: SelectorShape,
}

impl AdaptorConfig {
    /// Creates a configuration with default timings.
    #[must_use]
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: default_name(),
            address: address.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_initial_delay: DEFAULT_POLL_INTERVAL,
            liveness_period: DEFAULT_LIVENESS_PERIOD,
            liveness_initial_delay: DEFAULT_LIVENESS_INITIAL_DELAY,
            check_alive_interval: DEFAULT_CHECK_ALIVE_INTERVAL,
            liveness_grace: DEFAULT_LIVENESS_GRACE,
            staleness_cutoff: DEFAULT_STALENESS_CUTOFF,
            deduplicate: true,
            power_clamp: PowerClamp::default(),
            selector_shape: SelectorShape::default(),
        }
    }

    /// Parses and validates a configuration supplied by the hub.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the configuration is
    /// invalid.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(ParseError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the adaptor name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the polling period.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the delay before the first poll.
    #[must_use]
    pub fn with_poll_initial_delay(mut self, delay: Duration) -> Self {
        self.poll_initial_delay = delay;
        self
    }

    /// Sets the connectivity check period and its initial delay.
    #[must_use]
    pub fn with_liveness_schedule(mut self, period: Duration, initial_delay: Duration) -> Self {
        self.liveness_period = period;
        self.liveness_initial_delay = initial_delay;
        self
    }

    /// Sets the expected report gap and the grace added on top of it.
    #[must_use]
    pub fn with_liveness_threshold(mut self, check_alive: Duration, grace: Duration) -> Self {
        self.check_alive_interval = check_alive;
        self.liveness_grace = grace;
        self
    }

    /// Sets the staleness cutoff.
    #[must_use]
    pub fn with_staleness_cutoff(mut self, cutoff: Duration) -> Self {
        self.staleness_cutoff = cutoff;
        self
    }

    /// Enables or disables de-duplication and staleness filtering.
    #[must_use]
    pub fn with_deduplicate(mut self, enabled: bool) -> Self {
        self.deduplicate = enabled;
        self
    }

    /// Sets the power clamp.
    #[must_use]
    pub fn with_power_clamp(mut self, clamp: PowerClamp) -> Self {
        self.power_clamp = clamp;
        self
    }

    /// Sets the selector shape used by the transport.
    #[must_use]
    pub fn with_selector_shape(mut self, shape: SelectorShape) -> Self {
        self.selector_shape = shape;
        self
    }

    /// Returns the report age after which the device is considered gone.
    #[must_use]
    pub fn liveness_threshold(&self) -> Duration {
        self.check_alive_interval + self.liveness_grace
    }

    /// Checks the configuration for values the adaptor cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on empty identifiers, zero periods, or
    /// inverted power bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.is_empty() {
            return Err(ConfigError::Empty("id"));
        }
        if self.address.is_empty() {
            return Err(ConfigError::Empty("address"));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPeriod("poll_interval"));
        }
        if self.liveness_period.is_zero() {
            return Err(ConfigError::ZeroPeriod("liveness_period"));
        }
        if self.staleness_cutoff.is_zero() {
            return Err(ConfigError::ZeroPeriod("staleness_cutoff"));
        }
        if self.power_clamp.min > self.power_clamp.max {
            return Err(ConfigError::InvertedPowerBounds {
                min: self.power_clamp.min,
                max: self.power_clamp.max,
            });
        }
        Ok(())
    }
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

fn default_liveness_period() -> Duration {
    DEFAULT_LIVENESS_PERIOD
}

fn default_liveness_initial_delay() -> Duration {
    DEFAULT_LIVENESS_INITIAL_DELAY
}

fn default_check_alive_interval() -> Duration {
    DEFAULT_CHECK_ALIVE_INTERVAL
}

fn default_liveness_grace() -> Duration {
    DEFAULT_LIVENESS_GRACE
}

fn default_staleness_cutoff() -> Duration {
    DEFAULT_STALENESS_CUTOFF
}

fn default_deduplicate() -> bool {
    true
}

/// Serde adapter storing a [`Duration`] as whole seconds.
mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::telemetry::ClampPolicy;

    #[test]
    fn defaults() {
        let config = AdaptorConfig::new("zw1", "5");
        assert_eq!(config.name, "zwave_power_meter_socket");
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.liveness_initial_delay, Duration::from_secs(30));
        assert_eq!(config.liveness_threshold(), Duration::from_secs(180));
        assert_eq!(config.staleness_cutoff, Duration::from_secs(1800));
        assert!(config.deduplicate);
        assert_eq!(config.power_clamp.policy, ClampPolicy::ZeroAboveMaxFloorMin);
        assert_eq!(config.selector_shape, SelectorShape::ValueField);
    }

    #[test]
    fn from_json_applies_defaults() {
        let config = AdaptorConfig::from_json(r#"{"id":"zw1","address":"5"}"#).unwrap();
        assert_eq!(config, AdaptorConfig::new("zw1", "5"));
    }

    #[test]
    fn from_json_overrides() {
        let config = AdaptorConfig::from_json(
            r#"{
                "id": "zw1",
                "address": "5",
                "name": "Heater",
                "staleness_cutoff": 600,
                "deduplicate": false,
                "power_clamp": {"policy": "cap_at_max", "max": 3000},
                "selector_shape": "data_name"
            }"#,
        )
        .unwrap();

        assert_eq!(config.name, "Heater");
        assert_eq!(config.staleness_cutoff, Duration::from_secs(600));
        assert!(!config.deduplicate);
        assert_eq!(config.power_clamp.policy, ClampPolicy::CapAtMax);
        assert!((config.power_clamp.max - 3000.0).abs() < f64::EPSILON);
        assert!((config.power_clamp.min - -1.0).abs() < f64::EPSILON);
        assert_eq!(config.selector_shape, SelectorShape::DataName);
    }

    #[test]
    fn from_json_rejects_invalid() {
        let err = AdaptorConfig::from_json(r#"{"id":"zw1","address":"5","poll_interval":0}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::ZeroPeriod("poll_interval"))
        ));

        let err = AdaptorConfig::from_json(r#"{"id":"zw1"}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        let config = AdaptorConfig::new("zw1", "5")
            .with_power_clamp(PowerClamp::default().with_bounds(100.0, 10.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedPowerBounds { .. })
        ));
    }

    #[test]
    fn validate_rejects_empty_address() {
        assert_eq!(
            AdaptorConfig::new("zw1", "").validate(),
            Err(ConfigError::Empty("address"))
        );
    }

    #[test]
    fn serialize_round_trips_seconds() {
        let config = AdaptorConfig::new("zw1", "5").with_poll_interval(Duration::from_secs(15));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["poll_interval"], 15);
    }
}
