// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the adaptor.
//!
//! # Types
//!
//! - [`Characteristic`] - Named signals offered to subscriber applications
//! - [`CharacteristicValue`] - Number, flag or text carried by an update
//! - [`SwitchState`] - Last known relay state (on/off/unknown)
//! - [`SwitchCommand`] - Requested relay position
//! - [`AdaptorState`] - Lifecycle reported to the hub manager

mod characteristic;
mod lifecycle;
mod switch;

pub use characteristic::{Characteristic, CharacteristicValue};
pub use lifecycle::{AdaptorState, LifecycleAction};
pub use switch::{SwitchCommand, SwitchState};
