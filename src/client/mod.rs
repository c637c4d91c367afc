//! Configuration client for mesh nodes.
//!
//! [`ConfigClient`] turns the connectionless access layer into a
//! request/response API. Each request method validates its parameters,
//! registers the request with the [`PendingRequestTable`] and hands the
//! encoded message to the [`AccessTransport`]. The method returns once the
//! message is sent; the node's answer, or the lack of one, is delivered
//! later to the [`ConfigObserver`].
//!
//! Inbound access messages are fed to
//! [`ConfigClient::handle_access_message`], which matches them against the
//! outstanding requests and decodes the status parameters.

use std::sync::Arc;

use bytes::{BufMut, BytesMut};
use tracing::{debug, warn};

mod builder;
mod dispatch;
mod requests;

pub use builder::ConfigClientBuilder;

use crate::{
    command::Command,
    config::ConfigClientConfig,
    error::{ConfigError, Result},
    metrics,
    observer::{ConfigEvent, ConfigObserver},
    opcode,
    pending::{PendingRequest, PendingRequestTable},
    transport::AccessTransport,
};

/// Lowest unicast address.
pub const MIN_UNICAST_ADDRESS: u16 = 0x0001;
/// Highest unicast address.
pub const MAX_UNICAST_ADDRESS: u16 = 0x7FFF;

/// Sends configuration requests and correlates the replies.
///
/// All methods take `&self`; a client may be shared behind an [`Arc`] between
/// the task issuing requests and the task receiving access messages.
///
/// Dropping the client cancels every outstanding timer without reporting
/// the affected requests.
pub struct ConfigClient<T, O> {
    transport: T,
    observer: Arc<O>,
    pending: PendingRequestTable,
    config: ConfigClientConfig,
}

impl ConfigClient<(), ()> {
    /// Start building a client.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use meshconfig::ConfigClient;
    ///
    /// let builder = ConfigClient::builder().request_timeout(Duration::from_secs(4));
    /// assert_eq!(builder.config().timeout(), Duration::from_secs(4));
    /// ```
    #[must_use]
    pub fn builder() -> ConfigClientBuilder { ConfigClientBuilder::new() }
}

impl<T, O> ConfigClient<T, O>
where
    T: AccessTransport,
    O: ConfigObserver,
{
    /// Create a client with the default configuration.
    #[must_use]
    pub fn new(transport: T, observer: O) -> Self {
        Self::with_config(transport, observer, ConfigClientConfig::default())
    }

    /// Create a client with an explicit configuration.
    #[must_use]
    pub fn with_config(transport: T, observer: O, config: ConfigClientConfig) -> Self {
        let observer = Arc::new(observer);
        let on_timeout = Arc::clone(&observer);
        let pending = PendingRequestTable::new(config.timeout(), move |expired| {
            report_timeout(on_timeout.as_ref(), expired);
        });
        Self {
            transport,
            observer,
            pending,
            config,
        }
    }

    /// Encode and send `command` with `params`, tracking it until a reply
    /// arrives or its timer expires.
    async fn send_request(&self, command: Command, destination: u16, params: &[u8]) -> Result<()> {
        if !(MIN_UNICAST_ADDRESS..=MAX_UNICAST_ADDRESS).contains(&destination) {
            return Err(ConfigError::ParamInvalid(
                "configuration requests must target a unicast address",
            ));
        }

        let mut payload = BytesMut::with_capacity(3 + params.len());
        opcode::encode_into(command.opcode(), &mut payload)?;
        payload.put_slice(params);

        let ticket = self
            .pending
            .add(command.opcode(), destination)
            .inspect_err(|_| metrics::inc_busy(command))?;

        let net_key_index = self.config.net_key();
        match self
            .transport
            .send_access_message(destination, net_key_index, payload.freeze())
            .await
        {
            Ok(()) => {
                metrics::inc_requests(command);
                debug!(
                    request = %command,
                    address = destination,
                    net_key_index,
                    "configuration request sent"
                );
                Ok(())
            }
            Err(err) => {
                // The entry may have timed out during the send and its key been
                // reused; only this call's own entry is withdrawn.
                if let Some(ticket) = ticket {
                    self.pending.withdraw(ticket);
                }
                warn!(
                    request = %command,
                    address = destination,
                    error = %err,
                    "transport failed to send configuration request"
                );
                Err(ConfigError::Transport(err))
            }
        }
    }
}

impl<T, O> ConfigClient<T, O> {
    /// Outstanding requests.
    #[must_use]
    pub fn pending(&self) -> &PendingRequestTable { &self.pending }

    /// Configuration in effect.
    #[must_use]
    pub fn config(&self) -> &ConfigClientConfig { &self.config }

    /// Borrow the transport.
    #[must_use]
    pub fn transport(&self) -> &T { &self.transport }

    /// Borrow the observer.
    #[must_use]
    pub fn observer(&self) -> &O { &self.observer }
}

impl<T, O> Drop for ConfigClient<T, O> {
    fn drop(&mut self) { self.pending.clear(); }
}

impl<T, O> std::fmt::Debug for ConfigClient<T, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigClient")
            .field("config", &self.config)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

fn report_timeout<O: ConfigObserver>(observer: &O, expired: PendingRequest) {
    let request = expired.request();
    let address = expired.address();
    warn!(request = %request, address, "no response from node");
    metrics::inc_timeouts(request);
    observer.on_config_result(ConfigEvent {
        request,
        address,
        outcome: Err(ConfigError::NoResponseFromNode { request, address }),
    });
}
