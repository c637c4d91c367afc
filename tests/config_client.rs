//! End-to-end behaviour of the configuration client against a recording
//! transport.

use std::{sync::Arc, time::Duration};

use meshconfig::{
    Command,
    CompositionData,
    ConfigClient,
    ConfigError,
    Configuration,
    Element,
    Features,
    Response,
    StatusCode,
};
use meshconfig_testing::{RecordingTransport, drain_events, event_channel, status};

const NODE: u16 = 0x0002;
const TIMEOUT: Duration = Duration::from_secs(2);
const KEY: [u8; 16] = [0x5A; 16];

const COMPOSITION: [u8; 17] = [
    0x00, 0x01, 0x00, 0x02, 0x00, 0x01, 0x00, 0x0A, 0x00, 0x01, 0x00, // header
    0x00, 0x00, 0x01, 0x00, 0x01, 0x10, // element 0
];

#[tokio::test(start_paused = true)]
async fn composition_round_trip() {
    let transport = RecordingTransport::new();
    let (observer, mut events) = event_channel();
    let client = ConfigClient::new(transport.clone(), observer);

    client.get_composition(NODE).await.expect("send");
    assert_eq!(transport.payloads(), vec![vec![0x80, 0x08, 0x00]]);

    client.handle_access_message(NODE, &status(Response::CompositionDataStatus, &COMPOSITION));

    let event = events.try_recv().expect("composition event");
    assert_eq!(event.description(), "DeviceCompositionGet");
    let Ok(Configuration::Composition(data)) = event.outcome else {
        panic!("expected composition data, got {:?}", event.outcome);
    };
    assert_eq!(
        data,
        CompositionData {
            company_id: 1,
            product_id: 2,
            version_id: 1,
            crpl: 10,
            features: Features {
                relay: true,
                ..Features::default()
            },
            elements: vec![Element {
                location: 0,
                sig_models: vec![0x1001],
                vendor_models: vec![],
            }],
        }
    );
}

#[tokio::test(start_paused = true)]
async fn one_status_clears_requests_sharing_its_opcode() {
    let transport = RecordingTransport::new();
    let (observer, mut events) = event_channel();
    let client = ConfigClient::new(transport.clone(), observer);

    client.add_app_key(NODE, 0, 1, &KEY).await.expect("add");
    let busy = client
        .update_app_key(NODE, 0, 1, &KEY)
        .await
        .expect_err("update must wait for the add");
    assert!(busy.is_retriable());

    client.handle_access_message(NODE, &status(Response::AppKeyStatus, &[0x00, 0x00, 0x10, 0x00]));

    let events = drain_events(&mut events);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].request, Command::AppKeyAdd);
    assert_eq!(
        events[0].outcome.as_ref().ok(),
        Some(&Configuration::AppKeyStatus {
            status: StatusCode::Success,
            net_idx: 0,
            app_idx: 1,
        })
    );
    assert!(client.pending().is_empty());
    client
        .update_app_key(NODE, 0, 1, &KEY)
        .await
        .expect("key released by the status");
}

#[tokio::test(start_paused = true)]
async fn silent_node_times_out_exactly_once() {
    let transport = RecordingTransport::new();
    let (observer, mut events) = event_channel();
    let client = ConfigClient::builder()
        .request_timeout(TIMEOUT)
        .build(transport, observer);

    client.get_default_ttl(NODE).await.expect("send");
    client.get_default_ttl(NODE + 1).await.expect("send");
    client.handle_access_message(NODE + 1, &status(Response::DefaultTtlStatus, &[0x07]));

    tokio::time::sleep(TIMEOUT * 3).await;

    let events = drain_events(&mut events);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].address, NODE + 1);
    assert!(events[1].is_timeout());
    assert!(matches!(
        events[1].outcome,
        Err(ConfigError::NoResponseFromNode {
            request: Command::DefaultTtlGet,
            address: NODE
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn unsolicited_and_flagged_messages() {
    let transport = RecordingTransport::new();
    let (observer, mut events) = event_channel();
    let client = ConfigClient::new(transport, observer);

    client.handle_access_message(NODE, &status(Response::RelayStatus, &[0x01, 0x00]));
    assert!(drain_events(&mut events).is_empty());

    client.get_relay(NODE).await.expect("send");
    let mut flagged = status(Response::RelayStatus, &[0x00, 0x00]);
    flagged[0] |= 0x01;
    client.handle_access_message(NODE, &flagged);

    let events = drain_events(&mut events);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].request, Command::RelayGet);
}

#[tokio::test(start_paused = true)]
async fn transport_failure_is_returned_and_not_tracked() {
    let transport = RecordingTransport::new();
    transport.set_unavailable(true);
    let (observer, mut events) = event_channel();
    let client = ConfigClient::new(transport.clone(), observer);

    let err = client.reset_node(NODE).await.expect_err("transport down");
    assert!(matches!(err, ConfigError::Transport(_)));
    assert!(client.pending().is_empty());

    tokio::time::sleep(TIMEOUT * 2).await;
    assert!(drain_events(&mut events).is_empty());
    assert!(transport.sent().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shared_client_resolves_replies_from_another_task() {
    let transport = RecordingTransport::new();
    let (observer, mut events) = event_channel();
    let client = Arc::new(ConfigClient::new(transport.clone(), observer));

    let nodes: Vec<u16> = (0x0010..0x0020).collect();
    for &node in &nodes {
        client.get_beacon(node).await.expect("send");
    }

    let receiver = Arc::clone(&client);
    let replies = nodes.clone();
    tokio::spawn(async move {
        for node in replies {
            receiver.handle_access_message(node, &status(Response::BeaconStatus, &[0x01]));
        }
    })
    .await
    .expect("receiver task");

    for _ in &nodes {
        let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
            .await
            .expect("event in time")
            .expect("channel open");
        assert_eq!(event.outcome.ok(), Some(Configuration::Beacon(true)));
    }
    assert!(client.pending().is_empty());
    assert_eq!(transport.sent().len(), nodes.len());
}
