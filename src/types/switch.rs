// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switch state and switch commands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Last known relay state of the socket.
///
/// The state starts as [`Unknown`](Self::Unknown) and only changes when the
/// device reports its binary switch level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchState {
    /// Relay is closed.
    On,
    /// Relay is open.
    Off,
    /// No report received yet.
    #[default]
    Unknown,
}

impl SwitchState {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Unknown => "unknown",
        }
    }
}

impl From<bool> for SwitchState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl From<SwitchCommand> for SwitchState {
    fn from(value: SwitchCommand) -> Self {
        match value {
            SwitchCommand::On => Self::On,
            SwitchCommand::Off => Self::Off,
        }
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested switch position from a subscriber application.
///
/// # Examples
///
/// ```
/// use zwave_meter_socket::types::SwitchCommand;
///
/// let cmd: SwitchCommand = "on".parse().unwrap();
/// assert_eq!(cmd.zwave_level(), "255");
/// assert!("dim".parse::<SwitchCommand>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchCommand {
    /// Close the relay.
    On,
    /// Open the relay.
    Off,
}

impl SwitchCommand {
    /// Returns the Z-Wave binary switch level for this command.
    #[must_use]
    pub const fn zwave_level(&self) -> &'static str {
        match self {
            Self::On => "255",
            Self::Off => "0",
        }
    }

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl FromStr for SwitchCommand {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            _ => Err(ValueError::InvalidSwitchCommand(s.to_string())),
        }
    }
}

impl fmt::Display for SwitchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_state_defaults_to_unknown() {
        assert_eq!(SwitchState::default(), SwitchState::Unknown);
    }

    #[test]
    fn switch_state_from_bool() {
        assert_eq!(SwitchState::from(true), SwitchState::On);
        assert_eq!(SwitchState::from(false), SwitchState::Off);
    }

    #[test]
    fn switch_command_levels() {
        assert_eq!(SwitchCommand::On.zwave_level(), "255");
        assert_eq!(SwitchCommand::Off.zwave_level(), "0");
    }

    #[test]
    fn switch_command_is_case_sensitive() {
        assert_eq!("off".parse::<SwitchCommand>().unwrap(), SwitchCommand::Off);
        assert!(matches!(
            "ON".parse::<SwitchCommand>(),
            Err(ValueError::InvalidSwitchCommand(_))
        ));
    }

    #[test]
    fn command_maps_to_state() {
        assert_eq!(SwitchState::from(SwitchCommand::On), SwitchState::On);
        assert_ne!(SwitchState::from(SwitchCommand::Off), SwitchState::Unknown);
    }
}
