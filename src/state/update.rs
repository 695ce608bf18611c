// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Characteristic updates.

use chrono::{DateTime, Utc};

use crate::types::{Characteristic, CharacteristicValue};

/// A new value for one characteristic, ready to be recorded and published.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacteristicUpdate {
    /// Which characteristic changed.
    pub characteristic: Characteristic,
    /// The normalized value.
    pub value: CharacteristicValue,
    /// When the adaptor produced the update.
    pub timestamp: DateTime<Utc>,
    /// Device timestamp of the report behind this update, if any.
    pub device_time: Option<f64>,
}

impl CharacteristicUpdate {
    /// Creates an update that does not stem from a device report.
    #[must_use]
    pub fn new(
        characteristic: Characteristic,
        value: impl Into<CharacteristicValue>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            characteristic,
            value: value.into(),
            timestamp,
            device_time: None,
        }
    }

    /// Attaches the device timestamp of the originating report.
    #[must_use]
    pub fn with_device_time(mut self, device_time: f64) -> Self {
        self.device_time = Some(device_time);
        self
    }
}
