//! Log output of the configuration client.

use std::time::Duration;

use log::Level;
use meshconfig::{ConfigClient, Response};
use meshconfig_testing::{LoggerHandle, RecordingTransport, event_channel, logger, status};
use rstest::rstest;

const NODE: u16 = 0x0003;

#[rstest]
#[tokio::test(start_paused = true)]
async fn timeout_is_logged_as_warning(mut logger: LoggerHandle) {
    logger.clear();
    let (observer, _events) = event_channel();
    let client = ConfigClient::builder()
        .request_timeout(Duration::from_millis(500))
        .build(RecordingTransport::new(), observer);

    client.get_friend(NODE).await.expect("send");
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(logger.find(Level::Warn, "no response from node"));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn transport_failure_is_logged(mut logger: LoggerHandle) {
    logger.clear();
    let transport = RecordingTransport::new();
    transport.set_unavailable(true);
    let (observer, _events) = event_channel();
    let client = ConfigClient::new(transport, observer);

    assert!(client.get_relay(NODE).await.is_err());

    assert!(logger.find(Level::Warn, "transport failed to send configuration request"));
}

#[tracing_test::traced_test]
#[tokio::test(start_paused = true)]
async fn resolved_request_is_traced() {
    let (observer, _events) = event_channel();
    let client = ConfigClient::new(RecordingTransport::new(), observer);

    client.get_default_ttl(NODE).await.expect("send");
    client.handle_access_message(NODE, &status(Response::DefaultTtlStatus, &[0x05]));

    assert!(logs_contain("configuration request resolved"));
}
