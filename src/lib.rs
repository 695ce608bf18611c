// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adaptor for Z-Wave power-metering smart sockets.
//!
//! The adaptor sits between a Z-Wave transport and applications on a hub
//! bus. It translates device reports into named characteristics, fans them
//! out to subscribed applications, and turns application commands into
//! Z-Wave requests.
//!
//! # Characteristics
//!
//! | Characteristic  | Source                           | Value              |
//! |-----------------|----------------------------------|--------------------|
//! | `energy`        | meter (class 50), scale 0        | kWh                |
//! | `power`         | meter, scale 2                   | W, clamped         |
//! | `voltage`       | meter, scale 4                   | V                  |
//! | `current`       | meter, scale 5                   | A                  |
//! | `power_factor`  | meter, scale 6                   | ratio              |
//! | `binary_sensor` | binary switch (class 37) `level` | `"on"` / `"off"`   |
//! | `connected`     | liveness monitor                 | `true` / `false`   |
//! | `switch`        | accepted as a command            | `"on"` / `"off"`   |
//!
//! # Quick Start
//!
//! ```
//! use zwave_meter_socket::bus::{AppRegistration, MemoryOutbox, Outbound};
//! use zwave_meter_socket::zwave::ZwaveMessage;
//! use zwave_meter_socket::{Adaptor, AdaptorConfig};
//!
//! # fn main() -> zwave_meter_socket::Result<()> {
//! let mut adaptor = Adaptor::new(AdaptorConfig::new("zw1", "5"), MemoryOutbox::new())?;
//!
//! let registration: AppRegistration = serde_json::from_str(
//!     r#"{"id":"app1","service":[{"characteristic":"power","interval":0}]}"#,
//! ).map_err(zwave_meter_socket::ParseError::from)?;
//! adaptor.on_app_request(&registration);
//!
//! let now = chrono::Utc::now().timestamp();
//! let report = format!(
//!     r#"{{"content":"data","commandClass":"50","value":"2","data":{{"val":{{"value":120,"updateTime":{now}}}}}}}"#
//! );
//! adaptor.on_zwave_message(&ZwaveMessage::from_json(&report)?);
//!
//! let sent = adaptor.outbox().take();
//! assert_eq!(sent.len(), 1);
//! assert!(matches!(&sent[0], Outbound::App { to, .. } if to.as_str() == "app1"));
//! # Ok(())
//! # }
//! ```
//!
//! For a long-running adaptor with its poll and liveness timers, see
//! [`runtime::spawn`].

mod adaptor;
pub mod bus;
mod clock;
pub mod config;
pub mod error;
pub mod runtime;
pub mod state;
pub mod subscription;
pub mod telemetry;
pub mod types;
pub mod zwave;

pub use adaptor::{Adaptor, ZwaveOutcome};
pub use config::AdaptorConfig;
pub use error::{ConfigError, Error, ParseError, Result, RuntimeError, ValueError};
pub use runtime::{AdaptorEvent, AdaptorHandle};
pub use types::{
    AdaptorState, Characteristic, CharacteristicValue, LifecycleAction, SwitchCommand,
    SwitchState,
};
