//! Delivery of resolved requests to the application.
//!
//! Every request that was accepted by the pending table resolves exactly
//! once: either with the decoded status message or with
//! [`ConfigError::NoResponseFromNode`]. Messages that resolve nothing never
//! reach the observer.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::{command::Command, configuration::Configuration, error::ConfigError};

/// Outcome of one configuration request.
#[derive(Debug)]
pub struct ConfigEvent {
    /// Request that was resolved; its name is the description tag.
    pub request: Command,
    /// Node the request was sent to and the reply came from.
    pub address: u16,
    /// Decoded status or the reason the request failed.
    pub outcome: Result<Configuration, ConfigError>,
}

impl ConfigEvent {
    /// Human-readable tag recorded when the request was sent.
    #[must_use]
    pub fn description(&self) -> &'static str { self.request.name() }

    /// Returns true if the node never answered.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self.outcome, Err(ConfigError::NoResponseFromNode { .. }))
    }
}

/// Receives configuration results.
///
/// Implementations are invoked from the task that resolved the request and
/// must not block.
pub trait ConfigObserver: Send + Sync + 'static {
    /// Called once per resolved request.
    fn on_config_result(&self, event: ConfigEvent);
}

impl ConfigObserver for mpsc::UnboundedSender<ConfigEvent> {
    fn on_config_result(&self, event: ConfigEvent) {
        if let Err(mpsc::error::SendError(event)) = self.send(event) {
            debug!(
                request = %event.request,
                address = event.address,
                "observer channel closed; dropping configuration result"
            );
        }
    }
}

impl<O: ConfigObserver + ?Sized> ConfigObserver for Arc<O> {
    fn on_config_result(&self, event: ConfigEvent) { (**self).on_config_result(event); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_channel_drops_event_quietly() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        tx.on_config_result(ConfigEvent {
            request: Command::RelayGet,
            address: 0x0002,
            outcome: Err(ConfigError::NoResponseFromNode {
                request: Command::RelayGet,
                address: 0x0002,
            }),
        });
    }

    #[test]
    fn shared_observer_forwards() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let shared: Arc<mpsc::UnboundedSender<ConfigEvent>> = Arc::new(tx);
        shared.on_config_result(ConfigEvent {
            request: Command::BeaconGet,
            address: 0x0003,
            outcome: Ok(Configuration::Beacon(false)),
        });
        let event = rx.try_recv().expect("forwarded");
        assert_eq!(event.description(), "BeaconGet");
        assert!(!event.is_timeout());
    }
}
