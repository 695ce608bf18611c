// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hub bus message types and outbound delivery.
//!
//! The bus transport itself belongs to the hub. The adaptor only sees typed
//! inbound messages ([`AppInit`], [`AppRegistration`], [`AppCommand`]) and
//! pushes [`Outbound`] messages into an [`Outbox`].

mod messages;
mod outbox;

pub use messages::{
    AppCommand, AppInit, AppMessage, AppRegistration, CharacteristicMessage, ServiceAnnouncement,
    ServiceOffer, ServiceRequest, StateReport, SubscriberId,
};
pub use outbox::{MemoryOutbox, Outbound, Outbox};
