// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversions between wall-clock instants and the Unix-seconds timestamps
//! used on the wire.

use chrono::{DateTime, Utc};

/// Converts an instant to fractional Unix seconds (millisecond precision).
#[must_use]
#[allow(clippy::cast_precision_loss)] // millisecond timestamps fit in f64's mantissa
pub(crate) fn unix_seconds(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / 1000.0
}
