// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound telemetry: turning device reports into characteristic updates.
//!
//! | command class | selector | characteristic |
//! |---|---|---|
//! | 50 (meter) | 0 | `energy` |
//! | 50 | 2 | `power` (clamped, see [`PowerClamp`]) |
//! | 50 | 4 | `voltage` |
//! | 50 | 5 | `current` |
//! | 50 | 6 | `power_factor` |
//! | 37 (binary switch) | `level` | `binary_sensor`, plus relay state |
//! | 48 (alarm) | 1 | `binary_sensor` |
//! | 132 (wake-up) | `lastWakeup` | none |
//!
//! With de-duplication enabled a report is only applied if its device
//! timestamp differs from the last applied one for the same characteristic
//! and it is younger than the staleness cutoff.

mod clamp;
mod translator;

pub use clamp::{ClampPolicy, DEFAULT_POWER_MAX, DEFAULT_POWER_MIN, PowerClamp};
pub use translator::{InboundTranslator, Translated};
