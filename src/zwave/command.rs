// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound commands to the Z-Wave transport.

use serde::{Deserialize, Serialize};

use super::{CommandClass, Selector};
use crate::types::SwitchCommand;

/// Request verb understood by the Z-Wave transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZwaveRequest {
    /// Ask the transport to query a value from the device.
    Get,
    /// Ask the transport to invoke an action on the device.
    Post,
}

/// A command for the Z-Wave transport.
///
/// # Examples
///
/// ```
/// use zwave_meter_socket::types::SwitchCommand;
/// use zwave_meter_socket::zwave::ZwaveCommand;
///
/// let cmd = ZwaveCommand::switch_binary_set("zwave7", "12", SwitchCommand::On);
/// let json = serde_json::to_value(&cmd).unwrap();
/// assert_eq!(json["commandClass"], "37");
/// assert_eq!(json["action"], "Set");
/// assert_eq!(json["value"], "255");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZwaveCommand {
    /// Id of the adaptor issuing the command.
    pub id: String,
    /// Request verb.
    pub request: ZwaveRequest,
    /// Z-Wave node address.
    pub address: String,
    /// Endpoint instance; the socket has a single instance `"0"`.
    pub instance: String,
    /// Command class id as a decimal string.
    pub command_class: String,
    /// Action name for `post` requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Selector for `get` requests, argument for `post` requests.
    pub value: String,
}

impl ZwaveCommand {
    /// Builds a `get` request for one value of a command class.
    #[must_use]
    pub fn get(
        id: impl Into<String>,
        address: impl Into<String>,
        command_class: CommandClass,
        selector: &Selector,
    ) -> Self {
        Self {
            id: id.into(),
            request: ZwaveRequest::Get,
            address: address.into(),
            instance: "0".to_string(),
            command_class: command_class.to_string(),
            action: None,
            value: selector.as_wire(),
        }
    }

    /// Builds a `post` request invoking `action` on a command class.
    #[must_use]
    pub fn post(
        id: impl Into<String>,
        address: impl Into<String>,
        command_class: CommandClass,
        action: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            request: ZwaveRequest::Post,
            address: address.into(),
            instance: "0".to_string(),
            command_class: command_class.to_string(),
            action: Some(action.into()),
            value: value.into(),
        }
    }

    /// Builds the meter `Get` action used for periodic polling.
    #[must_use]
    pub fn meter_poll(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self::post(id, address, CommandClass::Meter, "Get", "")
    }

    /// Builds a binary switch `Set` action.
    #[must_use]
    pub fn switch_binary_set(
        id: impl Into<String>,
        address: impl Into<String>,
        command: SwitchCommand,
    ) -> Self {
        Self::post(
            id,
            address,
            CommandClass::SwitchBinary,
            "Set",
            command.zwave_level(),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn get_request_has_no_action() {
        let cmd = ZwaveCommand::get("zw1", "5", CommandClass::Meter, &Selector::Index(2));
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({
                "id": "zw1",
                "request": "get",
                "address": "5",
                "instance": "0",
                "commandClass": "50",
                "value": "2"
            })
        );
    }

    #[test]
    fn meter_poll_shape() {
        let cmd = ZwaveCommand::meter_poll("zw1", "5");
        assert_eq!(cmd.request, ZwaveRequest::Post);
        assert_eq!(cmd.command_class, "50");
        assert_eq!(cmd.action.as_deref(), Some("Get"));
        assert_eq!(cmd.value, "");
    }

    #[test]
    fn switch_off_level() {
        let cmd = ZwaveCommand::switch_binary_set("zw1", "5", SwitchCommand::Off);
        assert_eq!(cmd.value, "0");
        assert_eq!(cmd.instance, "0");
    }
}
