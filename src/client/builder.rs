//! Builder for configuring a [`ConfigClient`].

use std::time::Duration;

use super::ConfigClient;
use crate::{
    config::ConfigClientConfig,
    error::Result,
    observer::ConfigObserver,
    transport::AccessTransport,
};

/// Builder for [`ConfigClient`].
///
/// # Examples
///
/// ```
/// use meshconfig::{ConfigClient, ConfigEvent, transport::{AccessTransport, TransportError}};
/// use tokio::sync::mpsc;
///
/// struct Daemon;
///
/// #[async_trait::async_trait]
/// impl AccessTransport for Daemon {
///     async fn send_access_message(
///         &self,
///         _destination: u16,
///         _net_key_index: u16,
///         _payload: bytes::Bytes,
///     ) -> Result<(), TransportError> {
///         Ok(())
///     }
/// }
///
/// let (events, _rx) = mpsc::unbounded_channel::<ConfigEvent>();
/// let client = ConfigClient::builder()
///     .net_key_index(0)
///     .expect("valid key index")
///     .build(Daemon, events);
/// assert!(client.pending().is_empty());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ConfigClientBuilder {
    config: ConfigClientConfig,
}

impl ConfigClientBuilder {
    /// Create a builder with default settings.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Replace the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: ConfigClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set how long a request may stay unanswered before the observer is
    /// told the node did not respond.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.request_timeout(timeout);
        self
    }

    /// Set the network key index used for outgoing requests.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParamInvalid`](crate::ConfigError::ParamInvalid)
    /// when `index` needs more than 12 bits.
    pub fn net_key_index(mut self, index: u16) -> Result<Self> {
        self.config = self.config.net_key_index(index)?;
        Ok(self)
    }

    /// Configuration the client will be built with.
    #[must_use]
    pub fn config(&self) -> &ConfigClientConfig { &self.config }

    /// Build the client around a transport and an observer.
    #[must_use]
    pub fn build<T, O>(self, transport: T, observer: O) -> ConfigClient<T, O>
    where
        T: AccessTransport,
        O: ConfigObserver,
    {
        ConfigClient::with_config(transport, observer, self.config)
    }
}
