// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan-out of characteristic updates to subscribers.

use super::SubscriptionRegistry;
use crate::bus::{AppMessage, CharacteristicMessage, Outbound, Outbox};
use crate::clock::unix_seconds;
use crate::state::CharacteristicUpdate;

/// Sends `update` to every current subscriber of its characteristic.
///
/// The subscriber set is snapshotted before sending. Returns the number of
/// messages queued.
pub fn dispatch<O: Outbox + ?Sized>(
    registry: &SubscriptionRegistry,
    adaptor_id: &str,
    update: &CharacteristicUpdate,
    outbox: &O,
) -> usize {
    let recipients = registry.subscribers(update.characteristic);
    if recipients.is_empty() {
        tracing::trace!(
            characteristic = %update.characteristic,
            "No subscribers for update"
        );
        return 0;
    }

    let message = CharacteristicMessage::new(
        adaptor_id,
        update.characteristic,
        update.value.clone(),
        unix_seconds(update.timestamp),
    );

    for to in &recipients {
        outbox.deliver(Outbound::App {
            to: to.clone(),
            message: AppMessage::Characteristic(message.clone()),
        });
    }

    tracing::debug!(
        characteristic = %update.characteristic,
        value = %update.value,
        recipients = recipients.len(),
        "Dispatched characteristic update"
    );
    recipients.len()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Utc;

    use super::*;
    use crate::bus::{MemoryOutbox, SubscriberId};
    use crate::types::{Characteristic, CharacteristicValue};

    #[test]
    fn reaches_exactly_the_subscribers() {
        let mut registry = SubscriptionRegistry::new();
        for i in 0..3 {
            registry.subscribe(&SubscriberId::new(format!("volt{i}")), [Characteristic::Voltage]);
        }
        for i in 0..2 {
            registry.subscribe(&SubscriberId::new(format!("other{i}")), [Characteristic::Energy]);
        }

        let outbox = MemoryOutbox::new();
        let update = CharacteristicUpdate::new(Characteristic::Voltage, 230.0, Utc::now());
        assert_eq!(dispatch(&registry, "zw1", &update, &outbox), 3);

        let recipients: HashSet<_> = outbox
            .take()
            .into_iter()
            .map(|m| match m {
                Outbound::App {
                    to,
                    message: AppMessage::Characteristic(msg),
                } => {
                    assert_eq!(msg.characteristic, Characteristic::Voltage);
                    assert_eq!(msg.data, CharacteristicValue::Number(230.0));
                    assert_eq!(msg.id, "zw1");
                    to
                }
                other => panic!("unexpected message: {other:?}"),
            })
            .collect();

        let expected: HashSet<_> = (0..3)
            .map(|i| SubscriberId::new(format!("volt{i}")))
            .collect();
        assert_eq!(recipients, expected);
    }

    #[test]
    fn no_subscribers_sends_nothing() {
        let outbox = MemoryOutbox::new();
        let update = CharacteristicUpdate::new(Characteristic::Connected, true, Utc::now());
        assert_eq!(
            dispatch(&SubscriptionRegistry::new(), "zw1", &update, &outbox),
            0
        );
        assert!(outbox.is_empty());
    }
}
