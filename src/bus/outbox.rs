// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Non-blocking delivery of outbound messages.

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::{AppMessage, StateReport, SubscriberId};
use crate::zwave::ZwaveCommand;

/// A message leaving the adaptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// To an application on the hub bus.
    App {
        /// Recipient application.
        to: SubscriberId,
        /// The message.
        message: AppMessage,
    },
    /// To the hub manager.
    Manager(StateReport),
    /// To the Z-Wave transport.
    Zwave(ZwaveCommand),
}

/// Sink for outbound messages.
///
/// Implementations must not block: handlers call [`deliver`](Self::deliver)
/// from inside the adaptor's event loop. Delivery is fire-and-forget; there
/// is no acknowledgement and no retry.
pub trait Outbox: Send + Sync {
    /// Queues a message for delivery.
    fn deliver(&self, message: Outbound);
}

impl Outbox for mpsc::UnboundedSender<Outbound> {
    fn deliver(&self, message: Outbound) {
        if mpsc::UnboundedSender::send(self, message).is_err() {
            tracing::debug!("Outbound channel closed, dropping message");
        }
    }
}

impl<O: Outbox + ?Sized> Outbox for std::sync::Arc<O> {
    fn deliver(&self, message: Outbound) {
        (**self).deliver(message);
    }
}

/// An [`Outbox`] that keeps messages in memory.
///
/// Useful when embedding the adaptor in a host that drains messages on its
/// own schedule, and in tests.
///
/// # Examples
///
/// ```
/// use zwave_meter_socket::bus::{MemoryOutbox, Outbound, Outbox, StateReport};
/// use zwave_meter_socket::types::AdaptorState;
///
/// let outbox = MemoryOutbox::new();
/// outbox.deliver(Outbound::Manager(StateReport::new("zw1", AdaptorState::Starting)));
/// assert_eq!(outbox.len(), 1);
/// assert_eq!(outbox.take().len(), 1);
/// assert!(outbox.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryOutbox {
    messages: Mutex<Vec<Outbound>>,
}

impl MemoryOutbox {
    /// Creates an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns all queued messages.
    #[must_use]
    pub fn take(&self) -> Vec<Outbound> {
        std::mem::take(&mut *self.messages.lock())
    }

    /// Returns the number of queued messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl Outbox for MemoryOutbox {
    fn deliver(&self, message: Outbound) {
        self.messages.lock().push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AdaptorState;

    fn report() -> Outbound {
        Outbound::Manager(StateReport::new("zw1", AdaptorState::Running))
    }

    #[test]
    fn channel_outbox_delivers() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.deliver(report());
        assert_eq!(rx.try_recv().unwrap(), report());
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        tx.deliver(report());
    }

    #[test]
    fn memory_outbox_through_arc() {
        let outbox = std::sync::Arc::new(MemoryOutbox::new());
        let shared = std::sync::Arc::clone(&outbox);
        shared.deliver(report());
        assert_eq!(outbox.take(), vec![report()]);
    }
}
