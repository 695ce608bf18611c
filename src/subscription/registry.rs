// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of which application wants which characteristic.

use std::collections::{HashMap, HashSet};

use crate::bus::SubscriberId;
use crate::types::Characteristic;

/// Maps each characteristic to the set of applications subscribed to it.
///
/// A subscriber appears under a characteristic only if its most recent
/// request named that characteristic: [`subscribe`](Self::subscribe)
/// removes every previous membership before adding the new ones.
///
/// # Examples
///
/// ```
/// use zwave_meter_socket::bus::SubscriberId;
/// use zwave_meter_socket::subscription::SubscriptionRegistry;
/// use zwave_meter_socket::types::Characteristic;
///
/// let mut registry = SubscriptionRegistry::new();
/// let app = SubscriberId::new("app1");
///
/// registry.subscribe(&app, [Characteristic::Energy]);
/// registry.subscribe(&app, [Characteristic::Power]);
///
/// assert!(registry.is_subscribed(&app, Characteristic::Power));
/// assert!(!registry.is_subscribed(&app, Characteristic::Energy));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SubscriptionRegistry {
    members: HashMap<Characteristic, HashSet<SubscriberId>>,
}

impl SubscriptionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all of `id`'s subscriptions with `characteristics`.
    pub fn subscribe(
        &mut self,
        id: &SubscriberId,
        characteristics: impl IntoIterator<Item = Characteristic>,
    ) {
        self.unsubscribe(id);
        for characteristic in characteristics {
            self.members
                .entry(characteristic)
                .or_default()
                .insert(id.clone());
        }
    }

    /// Removes `id` from every characteristic.
    ///
    /// Returns `true` if it was subscribed to anything.
    pub fn unsubscribe(&mut self, id: &SubscriberId) -> bool {
        let mut removed = false;
        self.members.retain(|_, set| {
            removed |= set.remove(id);
            !set.is_empty()
        });
        removed
    }

    /// Returns a snapshot of the subscribers of a characteristic.
    #[must_use]
    pub fn subscribers(&self, characteristic: Characteristic) -> Vec<SubscriberId> {
        self.members
            .get(&characteristic)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns `true` if `id` is subscribed to `characteristic`.
    #[must_use]
    pub fn is_subscribed(&self, id: &SubscriberId, characteristic: Characteristic) -> bool {
        self.members
            .get(&characteristic)
            .is_some_and(|set| set.contains(id))
    }

    /// Returns the characteristics `id` is subscribed to, sorted.
    #[must_use]
    pub fn subscriptions_of(&self, id: &SubscriberId) -> Vec<Characteristic> {
        let mut out: Vec<_> = self
            .members
            .iter()
            .filter(|(_, set)| set.contains(id))
            .map(|(c, _)| *c)
            .collect();
        out.sort_unstable();
        out
    }

    /// Returns the number of subscribers of a characteristic.
    #[must_use]
    pub fn subscriber_count(&self, characteristic: Characteristic) -> usize {
        self.members.get(&characteristic).map_or(0, HashSet::len)
    }

    /// Returns `true` if nobody is subscribed to anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> SubscriberId {
        SubscriberId::new(s)
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = SubscriptionRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.subscribers(Characteristic::Power).is_empty());
    }

    #[test]
    fn resubscribe_replaces_memberships() {
        let mut registry = SubscriptionRegistry::new();
        registry.subscribe(&id("app1"), [Characteristic::Energy, Characteristic::Voltage]);
        registry.subscribe(&id("app1"), [Characteristic::Power]);

        assert_eq!(
            registry.subscriptions_of(&id("app1")),
            vec![Characteristic::Power]
        );
        assert_eq!(registry.subscriber_count(Characteristic::Energy), 0);
    }

    #[test]
    fn subscribe_is_idempotent() {
        let mut registry = SubscriptionRegistry::new();
        let services = [Characteristic::Current, Characteristic::Connected];
        registry.subscribe(&id("app1"), services);
        registry.subscribe(&id("app1"), services);

        assert_eq!(registry.subscriber_count(Characteristic::Current), 1);
        assert_eq!(registry.subscriber_count(Characteristic::Connected), 1);
    }

    #[test]
    fn duplicate_entries_in_one_request() {
        let mut registry = SubscriptionRegistry::new();
        registry.subscribe(&id("app1"), [Characteristic::Power, Characteristic::Power]);
        assert_eq!(registry.subscriber_count(Characteristic::Power), 1);
    }

    #[test]
    fn subscribers_are_independent() {
        let mut registry = SubscriptionRegistry::new();
        registry.subscribe(&id("app1"), [Characteristic::Power]);
        registry.subscribe(&id("app2"), [Characteristic::Power]);
        registry.subscribe(&id("app1"), Vec::new());

        assert_eq!(registry.subscribers(Characteristic::Power), vec![id("app2")]);
    }

    #[test]
    fn unsubscribe_reports_membership() {
        let mut registry = SubscriptionRegistry::new();
        assert!(!registry.unsubscribe(&id("app1")));

        registry.subscribe(&id("app1"), [Characteristic::Switch]);
        assert!(registry.unsubscribe(&id("app1")));
        assert!(registry.is_empty());
    }
}
