//! Client configuration types.
//!
//! [`ConfigClientConfig`] holds the tunables of a
//! [`ConfigClient`](crate::ConfigClient): how long to wait for a node to
//! answer and which network key secures outgoing requests.

use std::time::Duration;

use crate::{
    configuration::check_key_index,
    error::Result,
    pending::DEFAULT_REQUEST_TIMEOUT,
};

/// Tunables for a configuration client.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use meshconfig::config::ConfigClientConfig;
///
/// let config = ConfigClientConfig::default()
///     .request_timeout(Duration::from_secs(5))
///     .net_key_index(1)
///     .expect("valid key index");
/// assert_eq!(config.timeout(), Duration::from_secs(5));
/// assert_eq!(config.net_key(), 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigClientConfig {
    request_timeout: Duration,
    net_key_index: u16,
}

impl ConfigClientConfig {
    /// The library default: a two second timeout on the primary network key.
    pub const DEFAULT: ConfigClientConfig = ConfigClientConfig {
        request_timeout: DEFAULT_REQUEST_TIMEOUT,
        net_key_index: 0,
    };

    /// Set how long a request may stay unanswered.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the network key index used for outgoing requests.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParamInvalid`](crate::ConfigError::ParamInvalid)
    /// when `index` needs more than 12 bits.
    pub fn net_key_index(mut self, index: u16) -> Result<Self> {
        self.net_key_index = check_key_index(index)?;
        Ok(self)
    }

    /// Configured request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration { self.request_timeout }

    /// Configured network key index.
    #[must_use]
    pub fn net_key(&self) -> u16 { self.net_key_index }
}

impl Default for ConfigClientConfig {
    fn default() -> Self { ConfigClientConfig::DEFAULT }
}
