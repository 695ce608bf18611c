// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Async runtime for an [`Adaptor`].
//!
//! [`spawn`] moves the adaptor onto a tokio task. All inbound traffic goes
//! through one channel, so handlers run one at a time and never race on the
//! device state. The same task drives the poll and liveness timers, which
//! start when the device signals `init` and stop with the adaptor.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use zwave_meter_socket::bus::MemoryOutbox;
//! use zwave_meter_socket::{Adaptor, AdaptorConfig, runtime};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> zwave_meter_socket::Result<()> {
//!     let outbox = Arc::new(MemoryOutbox::new());
//!     let adaptor = Adaptor::new(AdaptorConfig::new("zw1", "5"), Arc::clone(&outbox))?;
//!     let (handle, task) = runtime::spawn(adaptor);
//!
//!     handle.zwave_json(r#"{"content":"init"}"#)?;
//!     handle.shutdown()?;
//!
//!     let adaptor = task.await.expect("adaptor task panicked");
//!     assert_eq!(adaptor.state().lifecycle().as_str(), "stopped");
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::adaptor::{Adaptor, ZwaveOutcome};
use crate::bus::{AppCommand, AppInit, AppRegistration, Outbox};
use crate::error::{ParseError, Result, RuntimeError};
use crate::state::DeviceState;
use crate::types::LifecycleAction;
use crate::zwave::ZwaveMessage;

/// An inbound event for a running adaptor.
#[derive(Debug, Clone)]
pub enum AdaptorEvent {
    /// Message from the Z-Wave transport.
    Zwave(ZwaveMessage),
    /// Configuration from the hub manager.
    Configure,
    /// An application started talking to the adaptor.
    AppInit(AppInit),
    /// An application (re)registered its subscriptions.
    AppRequest(AppRegistration),
    /// An application command.
    AppCommand(AppCommand),
    /// Lifecycle action from the hub manager.
    SetState(LifecycleAction),
    /// Stop the adaptor and end the task.
    Stop,
}

/// Handle to a spawned adaptor.
///
/// Cloning the handle is cheap. The adaptor task ends when it receives
/// [`AdaptorEvent::Stop`] or when every handle has been dropped.
#[derive(Debug, Clone)]
pub struct AdaptorHandle {
    tx: mpsc::UnboundedSender<AdaptorEvent>,
    state_rx: watch::Receiver<DeviceState>,
}

impl AdaptorHandle {
    /// Sends an event to the adaptor.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Stopped`] if the adaptor task has ended.
    pub fn send(&self, event: AdaptorEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| RuntimeError::Stopped)?;
        Ok(())
    }

    /// Parses a Z-Wave transport message and sends it to the adaptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a Z-Wave message or the adaptor
    /// task has ended.
    pub fn zwave_json(&self, json: &str) -> Result<()> {
        let message = ZwaveMessage::from_json(json)?;
        self.send(AdaptorEvent::Zwave(message))
    }

    /// Parses an application's subscription request and sends it to the
    /// adaptor.
    ///
    /// A request naming an unknown characteristic is rejected as a whole.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid request or the adaptor
    /// task has ended.
    pub fn app_request_json(&self, json: &str) -> Result<()> {
        let request: AppRegistration = serde_json::from_str(json).map_err(|e| {
            tracing::warn!(error = %e, "Rejected subscription request");
            ParseError::from(e)
        })?;
        self.send(AdaptorEvent::AppRequest(request))
    }

    /// Asks the adaptor to stop.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Stopped`] if the adaptor task has already
    /// ended.
    pub fn shutdown(&self) -> Result<()> {
        self.send(AdaptorEvent::Stop)
    }

    /// Returns a snapshot of the device state after the last handled event.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state_rx.borrow().clone()
    }

    /// Returns a receiver notified after every handled event.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<DeviceState> {
        self.state_rx.clone()
    }

    /// Returns `true` if the adaptor task has ended.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Spawns `adaptor` onto the current tokio runtime.
///
/// The returned task resolves to the adaptor once it has stopped.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn spawn<O: Outbox + 'static>(adaptor: Adaptor<O>) -> (AdaptorHandle, JoinHandle<Adaptor<O>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(adaptor.state().clone());
    let task = tokio::spawn(run(adaptor, rx, state_tx));
    (AdaptorHandle { tx, state_rx }, task)
}

async fn run<O: Outbox>(
    mut adaptor: Adaptor<O>,
    mut rx: mpsc::UnboundedReceiver<AdaptorEvent>,
    state_tx: watch::Sender<DeviceState>,
) -> Adaptor<O> {
    let id = adaptor.config().id.clone();
    tracing::debug!(adaptor = %id, "Starting adaptor task");

    let mut poll: Option<Interval> = None;
    let mut liveness: Option<Interval> = None;

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else {
                    tracing::debug!(adaptor = %id, "All handles dropped");
                    break;
                };
                match event {
                    AdaptorEvent::Zwave(message) => {
                        if adaptor.on_zwave_message(&message) == ZwaveOutcome::DeviceInitialized {
                            let config = adaptor.config();
                            poll = Some(timer(config.poll_initial_delay, config.poll_interval));
                            liveness = Some(timer(config.liveness_initial_delay, config.liveness_period));
                        }
                    }
                    AdaptorEvent::Configure => adaptor.on_configure(),
                    AdaptorEvent::AppInit(init) => adaptor.on_app_init(&init),
                    AdaptorEvent::AppRequest(request) => adaptor.on_app_request(&request),
                    AdaptorEvent::AppCommand(command) => {
                        adaptor.on_app_command(&command);
                    }
                    AdaptorEvent::SetState(action) => {
                        adaptor.set_state(action);
                    }
                    AdaptorEvent::Stop => {
                        adaptor.on_stop();
                        state_tx.send_replace(adaptor.state().clone());
                        break;
                    }
                }
            }
            () = tick(poll.as_mut()) => adaptor.poll_sensors(),
            () = tick(liveness.as_mut()) => {
                adaptor.check_connected();
            }
        }
        state_tx.send_replace(adaptor.state().clone());
    }

    tracing::debug!(adaptor = %id, "Adaptor task stopped");
    adaptor
}

fn timer(initial_delay: Duration, period: Duration) -> Interval {
    let mut interval = tokio::time::interval_at(Instant::now() + initial_delay, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Waits for the next tick, or forever if the timer is not armed.
async fn tick(interval: Option<&mut Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::AdaptorConfig;
    use crate::bus::{MemoryOutbox, Outbound};
    use crate::types::AdaptorState;
    use crate::zwave::ZwaveRequest;

    fn start() -> (
        AdaptorHandle,
        JoinHandle<Adaptor<Arc<MemoryOutbox>>>,
        Arc<MemoryOutbox>,
    ) {
        let outbox = Arc::new(MemoryOutbox::new());
        let adaptor = Adaptor::new(AdaptorConfig::new("zw1", "5"), Arc::clone(&outbox)).unwrap();
        let (handle, task) = spawn(adaptor);
        (handle, task, outbox)
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    fn polls(outbox: &MemoryOutbox) -> usize {
        outbox
            .take()
            .iter()
            .filter(|m| {
                matches!(m, Outbound::Zwave(cmd)
                    if cmd.request == ZwaveRequest::Post && cmd.action.as_deref() == Some("Get"))
            })
            .count()
    }

    #[tokio::test(start_paused = true)]
    async fn no_timers_before_init() {
        let (handle, _task, outbox) = start();
        tokio::time::sleep(Duration::from_secs(600)).await;
        settle().await;
        assert!(outbox.is_empty());
        handle.shutdown().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn polls_every_interval_after_init() {
        let (handle, _task, outbox) = start();
        handle.zwave_json(r#"{"content":"init"}"#).unwrap();
        settle().await;
        assert_eq!(outbox.take().len(), 7);

        tokio::time::sleep(Duration::from_secs(59)).await;
        settle().await;
        assert_eq!(polls(&outbox), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(polls(&outbox), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(polls(&outbox), 1);
        handle.shutdown().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn liveness_published_after_initial_delay() {
        let (handle, _task, outbox) = start();
        handle
            .app_request_json(r#"{"id":"app1","service":[{"characteristic":"connected"}]}"#)
            .unwrap();
        handle.zwave_json(r#"{"content":"init"}"#).unwrap();
        settle().await;
        outbox.take();

        tokio::time::sleep(Duration::from_secs(31)).await;
        settle().await;
        let sent = outbox.take();
        assert_eq!(sent.len(), 1);
        assert!(matches!(&sent[0], Outbound::App { to, .. } if to.as_str() == "app1"));
        assert!(!handle.state().connected());
        handle.shutdown().unwrap();
    }

    #[tokio::test]
    async fn stop_ends_task_and_reports_state() {
        let (handle, task, outbox) = start();
        handle.send(AdaptorEvent::Configure).unwrap();
        handle.shutdown().unwrap();

        let adaptor = task.await.unwrap();
        assert_eq!(adaptor.state().lifecycle(), AdaptorState::Stopped);
        assert_eq!(handle.state().lifecycle(), AdaptorState::Stopped);

        let states: Vec<_> = outbox
            .take()
            .into_iter()
            .filter_map(|m| match m {
                Outbound::Manager(r) => Some(r.state),
                _ => None,
            })
            .collect();
        assert_eq!(states, vec![AdaptorState::Starting, AdaptorState::Stopped]);

        assert!(matches!(
            handle.shutdown(),
            Err(crate::Error::Runtime(RuntimeError::Stopped))
        ));
    }

    #[tokio::test]
    async fn dropping_handles_ends_task() {
        let (handle, task, _outbox) = start();
        drop(handle);
        let adaptor = task.await.unwrap();
        assert_eq!(adaptor.state().lifecycle(), AdaptorState::Stopped);
    }

    #[tokio::test]
    async fn malformed_json_rejected_at_handle() {
        let (handle, _task, outbox) = start();
        assert!(matches!(
            handle.zwave_json("not json"),
            Err(crate::Error::Parse(_))
        ));
        assert!(matches!(
            handle.app_request_json(
                r#"{"id":"app1","service":[{"characteristic":"humidity"}]}"#
            ),
            Err(crate::Error::Parse(_))
        ));
        settle().await;
        assert!(outbox.is_empty());
    }
}
