#![cfg(feature = "metrics")]
//! Tests for the `meshconfig` metric counters.
//!
//! Counters are observed through `metrics_util::debugging::DebuggingRecorder`
//! installed as the thread-local recorder of a current-thread runtime.

use std::time::Duration;

use meshconfig::{
    ConfigClient,
    INBOUND_DROPPED,
    REQUEST_TIMEOUTS,
    REQUESTS_BUSY,
    REQUESTS_SENT,
    RESPONSES_MATCHED,
    Response,
    metrics::{DropReason, inc_dropped},
};
use meshconfig_testing::{
    RecordingTransport,
    counters,
    debugging_recorder_setup,
    event_channel,
    status,
};
use rstest::rstest;

const NODE: u16 = 0x0002;
const KEY: [u8; 16] = [0x11; 16];

fn key(name: &str, label: &str) -> (String, String) { (name.to_owned(), label.to_owned()) }

#[tokio::test(start_paused = true)]
async fn client_counts_requests_replies_and_timeouts() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    let _guard = metrics::set_default_local_recorder(&recorder);

    let (observer, _events) = event_channel();
    let client = ConfigClient::new(RecordingTransport::new(), observer);

    client.get_default_ttl(NODE).await.expect("send");
    client.add_app_key(NODE, 0, 0, &KEY).await.expect("send");
    assert!(client.update_app_key(NODE, 0, 0, &KEY).await.is_err());

    client.handle_access_message(NODE, &status(Response::DefaultTtlStatus, &[0x05]));
    tokio::time::sleep(client.config().timeout() + Duration::from_millis(1)).await;

    let counters = counters(&snapshotter);
    assert_eq!(counters.get(&key(REQUESTS_SENT, "DefaultTTLGet")), Some(&1));
    assert_eq!(counters.get(&key(REQUESTS_SENT, "AppKeyAdd")), Some(&1));
    assert_eq!(counters.get(&key(REQUESTS_BUSY, "AppKeyUpdate")), Some(&1));
    assert_eq!(counters.get(&key(RESPONSES_MATCHED, "DefaultTTLGet")), Some(&1));
    assert_eq!(counters.get(&key(REQUEST_TIMEOUTS, "AppKeyAdd")), Some(&1));
    assert!(!counters.contains_key(&key(REQUESTS_SENT, "AppKeyUpdate")));
}

#[tokio::test(start_paused = true)]
async fn dropped_inbound_messages_are_counted_by_reason() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    let _guard = metrics::set_default_local_recorder(&recorder);

    let (observer, _events) = event_channel();
    let client = ConfigClient::new(RecordingTransport::new(), observer);

    client.handle_access_message(NODE, &[0x7F]);
    client.handle_access_message(NODE, &status(Response::BeaconStatus, &[0x01]));
    client.get_beacon(NODE).await.expect("send");
    client.handle_access_message(NODE, &status(Response::BeaconStatus, &[0x01, 0x02]));

    let counters = counters(&snapshotter);
    assert_eq!(counters.get(&key(INBOUND_DROPPED, "opcode")), Some(&1));
    assert_eq!(counters.get(&key(INBOUND_DROPPED, "unsolicited")), Some(&1));
    assert_eq!(counters.get(&key(INBOUND_DROPPED, "malformed")), Some(&1));
}

#[rstest]
#[case(DropReason::Opcode, "opcode")]
#[case(DropReason::Unsolicited, "unsolicited")]
#[case(DropReason::Malformed, "malformed")]
fn drop_reason_label(#[case] reason: DropReason, #[case] label: &str) {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || inc_dropped(reason));
    assert_eq!(counters(&snapshotter).get(&key(INBOUND_DROPPED, label)), Some(&1));
}
