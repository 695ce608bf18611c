// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Z-Wave message shapes exchanged with the hub's Z-Wave transport.
//!
//! The transport hands the adaptor JSON objects of the form
//! `{content, commandClass, value, data}` and accepts commands of the form
//! `{id, request, address, instance, commandClass, action?, value}`. This
//! module parses the former into a [`RawReport`] and builds the latter as
//! [`ZwaveCommand`].
//!
//! # Examples
//!
//! ```
//! use zwave_meter_socket::zwave::{CommandClass, RawReport, SelectorShape, ZwaveMessage};
//!
//! let msg: ZwaveMessage = serde_json::from_str(
//!     r#"{"content":"data","commandClass":"50","value":"2",
//!         "data":{"updateTime":1700000000,"val":{"value":120,"updateTime":1700000000}}}"#,
//! ).unwrap();
//!
//! let report = RawReport::from_message(&msg, SelectorShape::ValueField).unwrap();
//! assert_eq!(report.command_class, CommandClass::Meter);
//! ```

mod command;
mod report;

use std::fmt;
use std::str::FromStr;

pub use command::{ZwaveCommand, ZwaveRequest};
pub use report::{RawReport, Selector, SelectorShape, ZwaveContent, ZwaveMessage};

use crate::error::ValueError;

/// Z-Wave command classes understood by the adaptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandClass {
    /// `COMMAND_CLASS_SWITCH_BINARY` (0x25).
    SwitchBinary,
    /// `COMMAND_CLASS_ALARM` (0x30), reported by older firmware.
    Alarm,
    /// `COMMAND_CLASS_METER` (0x32).
    Meter,
    /// `COMMAND_CLASS_WAKE_UP` (0x84).
    WakeUp,
    /// Any other command class.
    Other(u8),
}

impl CommandClass {
    /// Returns the numeric command class id.
    #[must_use]
    pub const fn id(&self) -> u8 {
        match self {
            Self::SwitchBinary => 37,
            Self::Alarm => 48,
            Self::Meter => 50,
            Self::WakeUp => 132,
            Self::Other(id) => *id,
        }
    }
}

impl From<u8> for CommandClass {
    fn from(id: u8) -> Self {
        match id {
            37 => Self::SwitchBinary,
            48 => Self::Alarm,
            50 => Self::Meter,
            132 => Self::WakeUp,
            other => Self::Other(other),
        }
    }
}

impl FromStr for CommandClass {
    type Err = ValueError;

    /// Parses a decimal (`"50"`) or hexadecimal (`"0x32"`) command class id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u8::from_str_radix(hex, 16),
            None => trimmed.parse::<u8>(),
        };
        parsed
            .map(Self::from)
            .map_err(|_| ValueError::InvalidCommandClass(s.to_string()))
    }
}

impl fmt::Display for CommandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decimal_and_hex() {
        assert_eq!("50".parse::<CommandClass>().unwrap(), CommandClass::Meter);
        assert_eq!(
            "0x25".parse::<CommandClass>().unwrap(),
            CommandClass::SwitchBinary
        );
        assert_eq!("132".parse::<CommandClass>().unwrap(), CommandClass::WakeUp);
        assert_eq!("48".parse::<CommandClass>().unwrap(), CommandClass::Alarm);
        assert_eq!("113".parse::<CommandClass>().unwrap(), CommandClass::Other(113));
    }

    #[test]
    fn parse_invalid() {
        assert!(matches!(
            "meter".parse::<CommandClass>(),
            Err(ValueError::InvalidCommandClass(_))
        ));
        assert!("0xZZ".parse::<CommandClass>().is_err());
        assert!("300".parse::<CommandClass>().is_err());
    }

    #[test]
    fn display_is_decimal_id() {
        assert_eq!(CommandClass::SwitchBinary.to_string(), "37");
        assert_eq!(CommandClass::Other(7).to_string(), "7");
    }
}
