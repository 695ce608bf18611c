// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Messages exchanged with applications and the hub manager.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{AdaptorState, Characteristic, CharacteristicValue};

/// Identifier of a subscriber application on the hub bus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(String);

impl SubscriberId {
    /// Creates a subscriber id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubscriberId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Sent by an application when it starts talking to the adaptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppInit {
    /// The application's id.
    pub id: SubscriberId,
}

/// One characteristic requested by an application.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceRequest {
    /// Requested characteristic.
    pub characteristic: Characteristic,
    /// Desired update interval hint, in seconds.
    #[serde(default)]
    pub interval: Option<f64>,
    /// Optional service type.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// An application's subscription request.
///
/// The listed characteristics replace whatever the application subscribed
/// to before.
///
/// # Examples
///
/// ```
/// use zwave_meter_socket::bus::AppRegistration;
/// use zwave_meter_socket::types::Characteristic;
///
/// let req: AppRegistration = serde_json::from_str(
///     r#"{"id":"app1","service":[{"characteristic":"power","interval":0}]}"#,
/// ).unwrap();
/// assert_eq!(req.characteristics().collect::<Vec<_>>(), vec![Characteristic::Power]);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppRegistration {
    /// The application's id.
    pub id: SubscriberId,
    /// Requested characteristics.
    #[serde(default)]
    pub service: Vec<ServiceRequest>,
}

impl AppRegistration {
    /// Iterates over the requested characteristics.
    pub fn characteristics(&self) -> impl Iterator<Item = Characteristic> + '_ {
        self.service.iter().map(|s| s.characteristic)
    }
}

/// A command from an application, e.g. `{"id":"app1","data":"on"}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppCommand {
    /// The application's id.
    pub id: SubscriberId,
    /// Command payload; the socket understands `"on"` and `"off"`.
    #[serde(default)]
    pub data: Option<Value>,
}

/// One entry of the adaptor's service announcement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceOffer {
    /// Offered characteristic.
    pub characteristic: Characteristic,
    /// Update interval hint in seconds; 0 means "on change".
    pub interval: u64,
    /// Service type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

/// The adaptor's reply to [`AppInit`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceAnnouncement {
    /// Adaptor name.
    pub name: String,
    /// Adaptor id.
    pub id: String,
    /// Always `"ok"`.
    pub status: &'static str,
    /// Offered characteristics.
    pub service: Vec<ServiceOffer>,
    /// Always `"service"`.
    pub content: &'static str,
}

impl ServiceAnnouncement {
    /// Creates an announcement for the given offers.
    #[must_use]
    pub fn new(name: impl Into<String>, id: impl Into<String>, service: Vec<ServiceOffer>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            status: "ok",
            service,
            content: "service",
        }
    }
}

/// A characteristic update delivered to one application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacteristicMessage {
    /// Adaptor id.
    pub id: String,
    /// Always `"characteristic"`.
    pub content: &'static str,
    /// Updated characteristic.
    pub characteristic: Characteristic,
    /// New value.
    pub data: CharacteristicValue,
    /// Unix seconds at which the adaptor produced the update.
    pub time_stamp: f64,
}

impl CharacteristicMessage {
    /// Creates a characteristic message.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        characteristic: Characteristic,
        data: CharacteristicValue,
        time_stamp: f64,
    ) -> Self {
        Self {
            id: id.into(),
            content: "characteristic",
            characteristic,
            data,
            time_stamp,
        }
    }
}

/// A message addressed to an application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AppMessage {
    /// Reply to an application's init.
    Service(ServiceAnnouncement),
    /// Characteristic update.
    Characteristic(CharacteristicMessage),
}

/// Lifecycle report sent to the hub manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateReport {
    /// Adaptor id.
    pub id: String,
    /// Always `"state"`.
    pub status: &'static str,
    /// Current lifecycle state.
    pub state: AdaptorState,
}

impl StateReport {
    /// Creates a state report.
    #[must_use]
    pub fn new(id: impl Into<String>, state: AdaptorState) -> Self {
        Self {
            id: id.into(),
            status: "state",
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn registration_rejects_unknown_characteristic() {
        let result = serde_json::from_str::<AppRegistration>(
            r#"{"id":"app1","service":[{"characteristic":"humidity","interval":60}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn registration_with_type() {
        let req: AppRegistration = serde_json::from_str(
            r#"{"id":"app1","service":[{"characteristic":"switch","interval":0,"type":"switch"}]}"#,
        )
        .unwrap();
        assert_eq!(req.service[0].kind.as_deref(), Some("switch"));
        assert_eq!(req.service[0].interval, Some(0.0));
    }

    #[test]
    fn command_without_data() {
        let cmd: AppCommand = serde_json::from_str(r#"{"id":"app1"}"#).unwrap();
        assert_eq!(cmd.data, None);
    }

    #[test]
    fn characteristic_message_wire_shape() {
        let msg = CharacteristicMessage::new(
            "zw1",
            Characteristic::Power,
            CharacteristicValue::Number(120.0),
            1_700_000_000.5,
        );
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "id": "zw1",
                "content": "characteristic",
                "characteristic": "power",
                "data": 120.0,
                "timeStamp": 1_700_000_000.5
            })
        );
    }

    #[test]
    fn state_report_wire_shape() {
        let report = StateReport::new("zw1", AdaptorState::Running);
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"id": "zw1", "status": "state", "state": "running"})
        );
    }

    #[test]
    fn service_offer_omits_missing_type() {
        let offer = ServiceOffer {
            characteristic: Characteristic::Switch,
            interval: 0,
            kind: None,
        };
        assert_eq!(
            serde_json::to_value(&offer).unwrap(),
            json!({"characteristic": "switch", "interval": 0})
        );
    }
}
