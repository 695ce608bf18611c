// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscriber bookkeeping and fan-out.
//!
//! - [`SubscriptionRegistry`] - which application wants which characteristic
//! - [`dispatch`] - deliver an update to every subscriber of its characteristic
//!
//! Subscriptions live until an application replaces them; nothing is
//! removed when an application goes quiet.

mod dispatch;
mod registry;

pub use dispatch::dispatch;
pub use registry::SubscriptionRegistry;
