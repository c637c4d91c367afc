//! Boundary to the mesh daemon that carries access messages.
//!
//! The transport only acknowledges that a message was handed over for
//! transmission. Replies arrive later and are fed back through
//! [`ConfigClient::handle_access_message`](crate::ConfigClient::handle_access_message).

use std::{io, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Failures reported by an [`AccessTransport`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The daemon refused the message.
    #[error("access message rejected: {0}")]
    Rejected(String),

    /// The daemon cannot be reached.
    #[error("mesh daemon unavailable")]
    Unavailable,

    /// I/O failure talking to the daemon.
    #[error("transport I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Sends encoded access-layer payloads to mesh nodes.
#[async_trait]
pub trait AccessTransport: Send + Sync + 'static {
    /// Hand `payload` to the mesh for delivery to `destination`, secured with
    /// the network key at `net_key_index`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the message could not be queued for
    /// transmission.
    async fn send_access_message(
        &self,
        destination: u16,
        net_key_index: u16,
        payload: Bytes,
    ) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: AccessTransport + ?Sized> AccessTransport for Arc<T> {
    async fn send_access_message(
        &self,
        destination: u16,
        net_key_index: u16,
        payload: Bytes,
    ) -> Result<(), TransportError> {
        (**self)
            .send_access_message(destination, net_key_index, payload)
            .await
    }
}
