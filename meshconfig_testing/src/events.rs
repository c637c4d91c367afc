//! Channel-backed observer helpers.

use meshconfig::ConfigEvent;
use tokio::sync::mpsc;

/// Create an observer and the receiver its events arrive on.
#[must_use]
pub fn event_channel() -> (
    mpsc::UnboundedSender<ConfigEvent>,
    mpsc::UnboundedReceiver<ConfigEvent>,
) {
    mpsc::unbounded_channel()
}

/// Collect every event already delivered to `rx` without waiting.
pub fn drain_events(rx: &mut mpsc::UnboundedReceiver<ConfigEvent>) -> Vec<ConfigEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
