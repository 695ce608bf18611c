// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::types::{AdaptorState, Characteristic, CharacteristicValue, LifecycleAction, SwitchState};

use super::CharacteristicUpdate;

/// Last recorded update of one characteristic.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacteristicRecord {
    /// Last published value.
    pub value: CharacteristicValue,
    /// When it was published.
    pub published_at: DateTime<Utc>,
    /// Device timestamp of the report it came from.
    pub device_time: Option<f64>,
}

/// Tracked state of the socket and the adaptor serving it.
///
/// One instance exists per adaptor. It is owned by the adaptor and mutated
/// only from its handlers, so it needs no interior mutability.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use zwave_meter_socket::state::{CharacteristicUpdate, DeviceState};
/// use zwave_meter_socket::types::{Characteristic, SwitchState};
///
/// let mut state = DeviceState::new();
/// assert_eq!(state.switch_state(), SwitchState::Unknown);
///
/// let update = CharacteristicUpdate::new(Characteristic::Power, 120.0, Utc::now())
///     .with_device_time(1_700_000_000.0);
/// assert!(state.apply(&update));
/// assert_eq!(state.last_device_time(Characteristic::Power), Some(1_700_000_000.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceState {
    lifecycle: AdaptorState,
    connected: bool,
    switch_state: SwitchState,
    records: HashMap<Characteristic, CharacteristicRecord>,
    /// Device timestamp of the most recent report of any kind.
    last_report_time: Option<f64>,
}

impl DeviceState {
    /// Creates a fresh state: stopped, disconnected, switch unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Lifecycle ==========

    /// Returns the adaptor lifecycle state.
    #[must_use]
    pub fn lifecycle(&self) -> AdaptorState {
        self.lifecycle
    }

    /// Applies a lifecycle action.
    ///
    /// Returns the new state, or `None` if the action is not allowed from
    /// the current state (the state is then left unchanged).
    pub fn apply_lifecycle(&mut self, action: LifecycleAction) -> Option<AdaptorState> {
        let next = self.lifecycle.transition(action)?;
        self.lifecycle = next;
        Some(next)
    }

    // ========== Connectivity ==========

    /// Returns whether the device is considered reachable.
    #[must_use]
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// Sets the connectivity flag, returning `true` if it changed.
    pub fn set_connected(&mut self, connected: bool) -> bool {
        let changed = self.connected != connected;
        self.connected = connected;
        changed
    }

    /// Returns the device timestamp of the most recent report.
    #[must_use]
    pub fn last_report_time(&self) -> Option<f64> {
        self.last_report_time
    }

    /// Records that the device reported at `device_time`.
    pub fn note_report(&mut self, device_time: f64) {
        self.last_report_time = Some(device_time);
    }

    /// Forgets report recency, e.g. after the device re-initialises.
    pub fn reset_reports(&mut self) {
        self.last_report_time = None;
    }

    // ========== Switch ==========

    /// Returns the last known relay state.
    #[must_use]
    pub fn switch_state(&self) -> SwitchState {
        self.switch_state
    }

    /// Sets the relay state.
    pub fn set_switch_state(&mut self, state: SwitchState) {
        self.switch_state = state;
    }

    // ========== Characteristics ==========

    /// Returns the last record of a characteristic.
    #[must_use]
    pub fn record(&self, characteristic: Characteristic) -> Option<&CharacteristicRecord> {
        self.records.get(&characteristic)
    }

    /// Returns the last published value of a characteristic.
    #[must_use]
    pub fn last_value(&self, characteristic: Characteristic) -> Option<&CharacteristicValue> {
        self.record(characteristic).map(|r| &r.value)
    }

    /// Returns the device timestamp behind the last applied update.
    #[must_use]
    pub fn last_device_time(&self, characteristic: Characteristic) -> Option<f64> {
        self.record(characteristic).and_then(|r| r.device_time)
    }

    /// Records an update.
    ///
    /// Returns `true` if the value differs from the previously recorded one.
    pub fn apply(&mut self, update: &CharacteristicUpdate) -> bool {
        let record = CharacteristicRecord {
            value: update.value.clone(),
            published_at: update.timestamp,
            device_time: update.device_time,
        };
        self.records
            .insert(update.characteristic, record)
            .is_none_or(|previous| previous.value != update.value)
    }
}
