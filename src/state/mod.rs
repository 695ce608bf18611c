// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! [`DeviceState`] holds everything the adaptor knows about the socket:
//! lifecycle, connectivity, relay state and the last update of every
//! characteristic. [`CharacteristicUpdate`] is the unit that flows from the
//! translator into the state and out to subscribers.

mod device_state;
mod update;

pub use device_state::{CharacteristicRecord, DeviceState};
pub use update::CharacteristicUpdate;
