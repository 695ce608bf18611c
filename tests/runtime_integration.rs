// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the spawned adaptor runtime using paused time.

use std::sync::Arc;
use std::time::Duration;

use zwave_meter_socket::bus::{AppMessage, MemoryOutbox, Outbound};
use zwave_meter_socket::types::{Characteristic, CharacteristicValue};
use zwave_meter_socket::zwave::ZwaveRequest;
use zwave_meter_socket::{Adaptor, AdaptorConfig, AdaptorEvent, AdaptorState, runtime};

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn init_then_power_report_then_timers() {
    let outbox = Arc::new(MemoryOutbox::new());
    let adaptor = Adaptor::new(AdaptorConfig::new("zw1", "5"), Arc::clone(&outbox)).unwrap();
    let (handle, task) = runtime::spawn(adaptor);

    handle.send(AdaptorEvent::Configure).unwrap();
    handle
        .app_request_json(r#"{"id":"app1","service":[{"characteristic":"power","interval":0}]}"#)
        .unwrap();
    handle.zwave_json(r#"{"content":"init"}"#).unwrap();
    settle().await;

    let gets = outbox
        .take()
        .into_iter()
        .filter(|m| matches!(m, Outbound::Zwave(c) if c.request == ZwaveRequest::Get))
        .count();
    assert_eq!(gets, 7);

    let now = chrono::Utc::now().timestamp();
    handle
        .zwave_json(&format!(
            r#"{{"content":"data","commandClass":"50","value":"2","data":{{"updateTime":{now},"val":{{"value":120,"updateTime":{now}}}}}}}"#
        ))
        .unwrap();
    settle().await;

    let sent = outbox.take();
    assert_eq!(sent.len(), 1);
    let Outbound::App {
        to,
        message: AppMessage::Characteristic(update),
    } = &sent[0]
    else {
        panic!("expected a characteristic update, got {sent:?}");
    };
    assert_eq!(to.as_str(), "app1");
    assert_eq!(update.characteristic, Characteristic::Power);
    assert_eq!(update.data, CharacteristicValue::Number(120.0));

    // liveness tick at 30 s flips connected; poll at 60 s
    tokio::time::sleep(Duration::from_secs(61)).await;
    settle().await;
    assert!(handle.state().connected());
    let polls = outbox
        .take()
        .into_iter()
        .filter(|m| matches!(m, Outbound::Zwave(c) if c.request == ZwaveRequest::Post))
        .count();
    assert_eq!(polls, 1);

    handle.shutdown().unwrap();
    let adaptor = task.await.unwrap();
    assert_eq!(adaptor.state().lifecycle(), AdaptorState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn repeated_init_restarts_timers() {
    let outbox = Arc::new(MemoryOutbox::new());
    let adaptor = Adaptor::new(AdaptorConfig::new("zw1", "5"), Arc::clone(&outbox)).unwrap();
    let (handle, _task) = runtime::spawn(adaptor);

    handle.zwave_json(r#"{"content":"init"}"#).unwrap();
    settle().await;
    tokio::time::sleep(Duration::from_secs(50)).await;
    handle.zwave_json(r#"{"content":"init"}"#).unwrap();
    settle().await;
    outbox.take();

    // the first schedule would have polled at 60 s
    tokio::time::sleep(Duration::from_secs(20)).await;
    settle().await;
    assert!(
        !outbox
            .take()
            .iter()
            .any(|m| matches!(m, Outbound::Zwave(c) if c.request == ZwaveRequest::Post))
    );

    tokio::time::sleep(Duration::from_secs(41)).await;
    settle().await;
    assert!(
        outbox
            .take()
            .iter()
            .any(|m| matches!(m, Outbound::Zwave(c) if c.request == ZwaveRequest::Post))
    );
    handle.shutdown().unwrap();
}
