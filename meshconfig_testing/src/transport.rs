//! In-memory [`AccessTransport`] recording outbound messages.

use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use bytes::Bytes;
use meshconfig::{AccessTransport, Response, TransportError, opcode};

/// An access message handed to the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    /// Destination node.
    pub destination: u16,
    /// Network key index the message was secured with.
    pub net_key_index: u16,
    /// Opcode followed by parameters.
    pub payload: Bytes,
}

#[derive(Default)]
struct State {
    sent: Mutex<Vec<SentMessage>>,
    unavailable: AtomicBool,
}

/// Transport that records messages instead of sending them.
///
/// Clones share the same recording.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    state: Arc<State>,
}

impl RecordingTransport {
    /// Create an empty recorder that accepts every message.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Make subsequent sends fail with [`TransportError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Messages sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentMessage> { self.lock().clone() }

    /// Payloads sent so far, as plain byte vectors.
    #[must_use]
    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.lock().iter().map(|message| message.payload.to_vec()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SentMessage>> {
        self.state.sent.lock().expect("transport recording poisoned")
    }
}

#[async_trait]
impl AccessTransport for RecordingTransport {
    async fn send_access_message(
        &self,
        destination: u16,
        net_key_index: u16,
        payload: Bytes,
    ) -> Result<(), TransportError> {
        if self.state.unavailable.load(Ordering::SeqCst) {
            return Err(TransportError::Unavailable);
        }
        self.lock().push(SentMessage {
            destination,
            net_key_index,
            payload,
        });
        Ok(())
    }
}

/// Build the access payload of a `response` carrying `params`.
///
/// # Panics
///
/// Panics if the response opcode cannot be encoded, which would be a bug in
/// the opcode table.
#[must_use]
pub fn status(response: Response, params: &[u8]) -> Vec<u8> {
    let mut payload = opcode::encode(response.opcode()).expect("status opcodes are encodable");
    payload.extend_from_slice(params);
    payload
}
