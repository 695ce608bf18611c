// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plausibility limits for power readings.

use serde::{Deserialize, Serialize};

/// Default upper bound for a plausible power reading, in W.
pub const DEFAULT_POWER_MAX: f64 = 4000.0;

/// Default lower bound for a plausible power reading, in W.
pub const DEFAULT_POWER_MIN: f64 = -1.0;

/// What to do with a power reading outside `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampPolicy {
    /// Readings above `max` become 0, readings below `min` become `min`.
    #[default]
    ZeroAboveMaxFloorMin,
    /// Readings are clamped into `[min, max]`.
    CapAtMax,
    /// Readings are published unchanged.
    Passthrough,
}

/// Power clamp configuration.
///
/// # Examples
///
/// ```
/// use zwave_meter_socket::telemetry::{ClampPolicy, PowerClamp};
///
/// let clamp = PowerClamp::default();
/// assert_eq!(clamp.apply(120.0), 120.0);
/// assert_eq!(clamp.apply(5000.0), 0.0);
/// assert_eq!(clamp.apply(-5.0), -1.0);
///
/// let capped = PowerClamp::new(ClampPolicy::CapAtMax);
/// assert_eq!(capped.apply(5000.0), 4000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerClamp {
    /// Policy for out-of-range readings.
    pub policy: ClampPolicy,
    /// Lowest plausible reading.
    pub min: f64,
    /// Highest plausible reading.
    pub max: f64,
}

impl PowerClamp {
    /// Creates a clamp with the default bounds and the given policy.
    #[must_use]
    pub const fn new(policy: ClampPolicy) -> Self {
        Self {
            policy,
            min: DEFAULT_POWER_MIN,
            max: DEFAULT_POWER_MAX,
        }
    }

    /// Sets the bounds.
    #[must_use]
    pub const fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Applies the policy to a reading.
    #[must_use]
    pub fn apply(&self, watts: f64) -> f64 {
        match self.policy {
            ClampPolicy::Passthrough => watts,
            ClampPolicy::ZeroAboveMaxFloorMin if watts > self.max => 0.0,
            ClampPolicy::CapAtMax if watts > self.max => self.max,
            ClampPolicy::ZeroAboveMaxFloorMin | ClampPolicy::CapAtMax if watts < self.min => {
                self.min
            }
            ClampPolicy::ZeroAboveMaxFloorMin | ClampPolicy::CapAtMax => watts,
        }
    }
}

impl Default for PowerClamp {
    fn default() -> Self {
        Self::new(ClampPolicy::default())
    }
}
