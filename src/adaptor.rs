// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The adaptor: message handlers for one Z-Wave metering socket.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::AdaptorConfig;
use crate::bus::{
    AppCommand, AppInit, AppMessage, AppRegistration, Outbound, Outbox, ServiceAnnouncement,
    ServiceOffer, StateReport,
};
use crate::clock::unix_seconds;
use crate::error::{ParseError, ValueError};
use crate::state::{CharacteristicUpdate, DeviceState};
use crate::subscription::{SubscriptionRegistry, dispatch};
use crate::telemetry::InboundTranslator;
use crate::types::{AdaptorState, Characteristic, LifecycleAction, SwitchCommand, SwitchState};
use crate::zwave::{CommandClass, RawReport, Selector, ZwaveCommand, ZwaveContent, ZwaveMessage};

/// Values queried from the device when it signals `init`, in order.
const INIT_QUERIES: [(CommandClass, Selector); 7] = [
    (CommandClass::Meter, Selector::Index(0)),
    (CommandClass::Meter, Selector::Index(2)),
    (CommandClass::Meter, Selector::Index(4)),
    (CommandClass::Meter, Selector::Index(5)),
    (CommandClass::Meter, Selector::Index(6)),
    (CommandClass::SwitchBinary, Selector::Level),
    (CommandClass::WakeUp, Selector::LastWakeup),
];

/// What a Z-Wave message did to the adaptor.
#[derive(Debug, Clone, PartialEq)]
pub enum ZwaveOutcome {
    /// The device signalled `init`; initial queries were sent and the
    /// periodic timers should be (re)started.
    DeviceInitialized,
    /// A report was accepted; carries the update it produced, if any.
    Report(Option<CharacteristicUpdate>),
    /// The message was malformed or not understood; state is unchanged.
    Ignored,
}

/// Handlers for one metering socket.
///
/// The adaptor owns the [`DeviceState`] and the [`SubscriptionRegistry`] and
/// sends everything through an [`Outbox`]. Handlers never fail: bad input is
/// logged and dropped. Methods ending in `_at` take the current time
/// explicitly; the others use the wall clock.
///
/// The adaptor itself has no timers. Something must call
/// [`poll_sensors`](Self::poll_sensors) and
/// [`check_connected`](Self::check_connected) periodically after
/// [`ZwaveOutcome::DeviceInitialized`]; [`crate::runtime`] does that.
///
/// # Examples
///
/// ```
/// use zwave_meter_socket::{Adaptor, AdaptorConfig};
/// use zwave_meter_socket::bus::{AppRegistration, MemoryOutbox};
/// use zwave_meter_socket::zwave::ZwaveMessage;
///
/// # fn main() -> zwave_meter_socket::Result<()> {
/// let mut adaptor = Adaptor::new(AdaptorConfig::new("zw1", "5"), MemoryOutbox::new())?;
///
/// adaptor.on_zwave_message(&ZwaveMessage::from_json(r#"{"content":"init"}"#)?);
/// assert_eq!(adaptor.outbox().take().len(), 7);
///
/// let req: AppRegistration = serde_json::from_str(
///     r#"{"id":"app1","service":[{"characteristic":"power","interval":0}]}"#,
/// ).map_err(zwave_meter_socket::ParseError::from)?;
/// adaptor.on_app_request(&req);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Adaptor<O> {
    config: AdaptorConfig,
    translator: InboundTranslator,
    state: DeviceState,
    registry: SubscriptionRegistry,
    outbox: O,
}

impl<O: Outbox> Adaptor<O> {
    /// Creates an adaptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: AdaptorConfig, outbox: O) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self {
            translator: InboundTranslator::from_config(&config),
            config,
            state: DeviceState::new(),
            registry: SubscriptionRegistry::new(),
            outbox,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &AdaptorConfig {
        &self.config
    }

    /// Returns the device state.
    #[must_use]
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Returns the subscription registry.
    #[must_use]
    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    /// Returns the outbox.
    #[must_use]
    pub fn outbox(&self) -> &O {
        &self.outbox
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Applies a lifecycle action and reports the resulting state to the
    /// manager.
    ///
    /// The state is reported even when the action is not allowed, so the
    /// manager always learns the current state.
    pub fn set_state(&mut self, action: LifecycleAction) -> AdaptorState {
        let current = self.state.lifecycle();
        match self.state.apply_lifecycle(action) {
            Some(next) if next != current => {
                tracing::info!(adaptor = %self.config.id, from = %current, to = %next, "Lifecycle transition");
            }
            Some(_) => {}
            None => {
                tracing::warn!(adaptor = %self.config.id, state = %current, ?action, "Lifecycle action not allowed");
            }
        }
        let state = self.state.lifecycle();
        self.outbox
            .deliver(Outbound::Manager(StateReport::new(&self.config.id, state)));
        state
    }

    /// Handles configuration from the manager.
    pub fn on_configure(&mut self) {
        tracing::debug!(adaptor = %self.config.id, "Configuration received");
        self.set_state(LifecycleAction::Start);
    }

    /// Handles a stop request from the manager.
    pub fn on_stop(&mut self) {
        self.set_state(LifecycleAction::Stop);
    }

    // =========================================================================
    // Applications
    // =========================================================================

    /// Returns the characteristics offered to applications.
    #[must_use]
    pub fn service_offers(&self) -> Vec<ServiceOffer> {
        let polled = self.config.poll_interval.as_secs();
        Characteristic::ALL
            .into_iter()
            .map(|characteristic| {
                let interval = match characteristic {
                    Characteristic::Power | Characteristic::BinarySensor | Characteristic::Switch => {
                        0
                    }
                    _ => polled,
                };
                let kind = (characteristic != Characteristic::Switch).then_some("switch");
                ServiceOffer {
                    characteristic,
                    interval,
                    kind,
                }
            })
            .collect()
    }

    /// Answers an application's init with the service announcement and moves
    /// the adaptor to running.
    pub fn on_app_init(&mut self, init: &AppInit) {
        tracing::debug!(adaptor = %self.config.id, app = %init.id, "Application init");
        let announcement =
            ServiceAnnouncement::new(&self.config.name, &self.config.id, self.service_offers());
        self.outbox.deliver(Outbound::App {
            to: init.id.clone(),
            message: AppMessage::Service(announcement),
        });
        self.set_state(LifecycleAction::Run);
    }

    /// Replaces an application's subscriptions.
    pub fn on_app_request(&mut self, request: &AppRegistration) {
        self.registry.subscribe(&request.id, request.characteristics());
        tracing::debug!(
            app = %request.id,
            subscriptions = ?self.registry.subscriptions_of(&request.id),
            "Updated application subscriptions"
        );
    }

    /// Handles an on/off command from an application.
    ///
    /// Returns `true` if a device command was sent.
    pub fn on_app_command(&mut self, command: &AppCommand) -> bool {
        match parse_switch_command(command.data.as_ref()) {
            Ok(cmd) => self.set_switch(cmd),
            Err(e) => {
                tracing::warn!(app = %command.id, error = %e, "Rejected application command");
                false
            }
        }
    }

    /// Drives the relay.
    ///
    /// Nothing is sent when the relay is already known to be in the
    /// requested position. The switch state itself only changes when the
    /// device reports back. Returns `true` if a device command was sent.
    pub fn set_switch(&mut self, command: SwitchCommand) -> bool {
        if self.state.switch_state() == SwitchState::from(command) {
            tracing::debug!(%command, "Switch already in requested state");
            return false;
        }
        tracing::debug!(%command, "Sending switch command");
        self.outbox
            .deliver(Outbound::Zwave(ZwaveCommand::switch_binary_set(
                &self.config.id,
                &self.config.address,
                command,
            )));
        true
    }

    // =========================================================================
    // Device
    // =========================================================================

    /// Handles a message from the Z-Wave transport.
    pub fn on_zwave_message(&mut self, message: &ZwaveMessage) -> ZwaveOutcome {
        self.on_zwave_message_at(message, Utc::now())
    }

    /// Handles a message from the Z-Wave transport observed at `now`.
    pub fn on_zwave_message_at(&mut self, message: &ZwaveMessage, now: DateTime<Utc>) -> ZwaveOutcome {
        match message.content {
            ZwaveContent::Init => {
                self.initialize_device();
                ZwaveOutcome::DeviceInitialized
            }
            ZwaveContent::Data => match self.handle_report(message, now) {
                Ok(update) => ZwaveOutcome::Report(update),
                Err(e) => {
                    tracing::warn!(error = %e, ?message, "Unexpected Z-Wave message");
                    ZwaveOutcome::Ignored
                }
            },
            ZwaveContent::Other => {
                tracing::debug!(?message, "Ignoring Z-Wave message");
                ZwaveOutcome::Ignored
            }
        }
    }

    fn initialize_device(&mut self) {
        tracing::info!(adaptor = %self.config.id, address = %self.config.address, "Device initialised");
        self.state.reset_reports();
        for (command_class, selector) in &INIT_QUERIES {
            self.outbox.deliver(Outbound::Zwave(ZwaveCommand::get(
                &self.config.id,
                &self.config.address,
                *command_class,
                selector,
            )));
        }
    }

    fn handle_report(
        &mut self,
        message: &ZwaveMessage,
        now: DateTime<Utc>,
    ) -> Result<Option<CharacteristicUpdate>, ParseError> {
        let report = RawReport::from_message(message, self.config.selector_shape)?;
        let translated = self.translator.translate(&report, &self.state, now)?;

        if let Some(time) = report.report_time {
            self.state.note_report(time);
        }

        let Some(translated) = translated else {
            return Ok(None);
        };
        if let Some(switch) = translated.switch_state {
            self.state.set_switch_state(switch);
        }
        self.publish(&translated.update);
        Ok(Some(translated.update))
    }

    /// Asks the device for fresh meter readings.
    pub fn poll_sensors(&self) {
        tracing::trace!(adaptor = %self.config.id, "Polling sensors");
        self.outbox.deliver(Outbound::Zwave(ZwaveCommand::meter_poll(
            &self.config.id,
            &self.config.address,
        )));
    }

    /// Re-evaluates connectivity and publishes it.
    pub fn check_connected(&mut self) -> bool {
        self.check_connected_at(Utc::now())
    }

    /// Re-evaluates connectivity at `now` and publishes it.
    ///
    /// The device counts as connected if its last report is no older than
    /// `check_alive_interval + liveness_grace`. The result is published on
    /// every call, changed or not.
    pub fn check_connected_at(&mut self, now: DateTime<Utc>) -> bool {
        let threshold = self.config.liveness_threshold().as_secs_f64();
        let connected = self
            .state
            .last_report_time()
            .is_some_and(|last| unix_seconds(now) - last <= threshold);

        if self.state.set_connected(connected) {
            tracing::info!(adaptor = %self.config.id, connected, "Device connectivity changed");
        }
        self.publish(&CharacteristicUpdate::new(
            Characteristic::Connected,
            connected,
            now,
        ));
        connected
    }

    fn publish(&mut self, update: &CharacteristicUpdate) {
        self.state.apply(update);
        dispatch(&self.registry, &self.config.id, update, &self.outbox);
    }
}

fn parse_switch_command(data: Option<&Value>) -> Result<SwitchCommand, ParseError> {
    let data = data.ok_or_else(|| ParseError::MissingField("data".to_string()))?;
    let text = data
        .as_str()
        .ok_or_else(|| ValueError::InvalidSwitchCommand(data.to_string()))?;
    Ok(text.parse()?)
}
