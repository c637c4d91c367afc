//! Correlation of outstanding requests with the status messages that answer
//! them.
//!
//! Mesh access messages carry no request identifier, so a reply can only be
//! matched by the status opcode it uses and the node it came from.
//! [`PendingRequestTable`] keys in-flight requests by that
//! [`CorrelationKey`] and allows at most one entry per key. Each entry owns a
//! one-shot timer. The timer is cancelled when the entry is dropped, so every
//! removal path other than expiry disarms it.
//!
//! Removal is the single arbiter between a reply and a timeout: whichever
//! path takes an entry out of the map first owns it, and the other finds
//! nothing to do.

use std::{
    sync::{
        Arc,
        Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use dashmap::{DashMap, mapref::entry::Entry};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, trace};

use crate::{
    command::{Command, Response},
    error::{ConfigError, Result},
    opcode::Opcode,
};

/// Timeout applied to requests unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Callback invoked with a request whose timer expired.
pub type ExpiryHook = Arc<dyn Fn(PendingRequest) + Send + Sync + 'static>;

/// Key under which replies are correlated: the expected status message and
/// the node it must come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CorrelationKey {
    /// Status message that resolves the request.
    pub response: Response,
    /// Unicast address of the node the request was sent to.
    pub address: u16,
}

/// Snapshot of an outstanding request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    request: Command,
    address: u16,
}

impl PendingRequest {
    /// Request that was sent. Its name is the description tag reported to
    /// observers.
    #[must_use]
    pub const fn request(&self) -> Command { self.request }

    /// Status message expected in reply.
    #[must_use]
    pub const fn response(&self) -> Response { self.request.response() }

    /// Destination of the request.
    #[must_use]
    pub const fn address(&self) -> u16 { self.address }

    /// Correlation key of this request.
    #[must_use]
    pub const fn key(&self) -> CorrelationKey {
        CorrelationKey {
            response: self.response(),
            address: self.address,
        }
    }
}

/// Receipt for one admitted request.
///
/// [`PendingRequestTable::withdraw`] uses it to remove exactly that request,
/// even if it already timed out and another request now holds its key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    key: CorrelationKey,
    id: u64,
}

impl Ticket {
    /// Correlation key the request was admitted under.
    #[must_use]
    pub const fn key(&self) -> CorrelationKey { self.key }
}

struct PendingEntry {
    id: u64,
    request: PendingRequest,
    _timer: DropGuard,
}

struct Inner {
    entries: DashMap<CorrelationKey, Vec<PendingEntry>>,
    timeout: Duration,
    next_id: AtomicU64,
    on_expired: ExpiryHook,
}

impl Inner {
    /// Remove the entry with `id` if it is still present.
    fn take(&self, key: CorrelationKey, id: u64) -> Option<PendingEntry> {
        let Entry::Occupied(mut slot) = self.entries.entry(key) else {
            return None;
        };
        let position = slot.get().iter().position(|entry| entry.id == id)?;
        let entry = slot.get_mut().swap_remove(position);
        if slot.get().is_empty() {
            slot.remove();
        }
        Some(entry)
    }

    fn expire(&self, key: CorrelationKey, id: u64) {
        // The shard lock is released before the hook runs so the hook may
        // re-enter the table.
        let Some(entry) = self.take(key, id) else {
            trace!(?key, id, "timer fired for an already resolved request");
            return;
        };
        let request = entry.request;
        drop(entry);
        debug!(
            request = %request.request(),
            address = request.address(),
            "request timed out"
        );
        (self.on_expired)(request);
    }
}

/// Table of in-flight configuration requests.
///
/// Cloning yields another handle to the same table. Timers run as Tokio
/// tasks, so [`PendingRequestTable::add`] must be called from within a Tokio
/// runtime.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use meshconfig::{command::Command, pending::PendingRequestTable};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let table = PendingRequestTable::new(Duration::from_secs(2), |expired| {
///     println!("{} timed out", expired.request());
/// });
/// table
///     .add(Command::AppKeyAdd.opcode(), 0x0002)
///     .expect("no request outstanding");
/// assert!(table.add(Command::AppKeyUpdate.opcode(), 0x0002).is_err());
/// # }
/// ```
#[derive(Clone)]
pub struct PendingRequestTable {
    inner: Arc<Inner>,
}

impl PendingRequestTable {
    /// Create an empty table whose timers fire after `timeout`.
    ///
    /// `on_expired` runs once for every request that times out, after the
    /// request has been removed from the table.
    #[must_use]
    pub fn new(
        timeout: Duration,
        on_expired: impl Fn(PendingRequest) + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: DashMap::new(),
                timeout,
                next_id: AtomicU64::new(1),
                on_expired: Arc::new(on_expired),
            }),
        }
    }

    /// Timeout applied to new entries.
    #[must_use]
    pub fn timeout(&self) -> Duration { self.inner.timeout }

    /// Record a request to `destination` and arm its timer.
    ///
    /// Returns a [`Ticket`] for the new entry. Opcodes that expect no reply
    /// are accepted without creating an entry and yield no ticket.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Busy`] when a request awaiting the same status
    /// message from `destination` is already outstanding. The table is left
    /// unchanged and the caller must not transmit.
    pub fn add(&self, request: Opcode, destination: u16) -> Result<Option<Ticket>> {
        let Some(command) = Command::from_opcode(request) else {
            trace!(%request, destination, "opcode expects no reply; nothing to track");
            return Ok(None);
        };
        let pending = PendingRequest {
            request: command,
            address: destination,
        };

        match self.inner.entries.entry(pending.key()) {
            Entry::Occupied(_) => {
                debug!(
                    request = %command,
                    address = destination,
                    "refusing request: reply to an earlier request still awaited"
                );
                Err(ConfigError::Busy {
                    request: command,
                    address: destination,
                })
            }
            Entry::Vacant(slot) => {
                let entry = self.arm(pending);
                let ticket = Ticket {
                    key: pending.key(),
                    id: entry.id,
                };
                slot.insert(vec![entry]);
                Ok(Some(ticket))
            }
        }
    }

    /// Returns true if `request` to `destination` would be refused as busy.
    #[must_use]
    pub fn exists(&self, request: Opcode, destination: u16) -> bool {
        Command::from_opcode(request).is_some_and(|command| {
            self.inner.entries.contains_key(&CorrelationKey {
                response: command.response(),
                address: destination,
            })
        })
    }

    /// Find the request a status message with `response` from `source`
    /// would resolve.
    #[must_use]
    pub fn lookup(&self, response: Opcode, source: u16) -> Option<PendingRequest> {
        let key = CorrelationKey {
            response: Response::from_opcode(response)?,
            address: source,
        };
        self.inner
            .entries
            .get(&key)
            .and_then(|entries| entries.first().map(|entry| entry.request))
    }

    /// Remove every request resolved by `response` from `source` and cancel
    /// their timers.
    ///
    /// Returns the removed requests; removing an absent key returns nothing.
    pub fn remove(&self, response: Opcode, source: u16) -> Vec<PendingRequest> {
        let Some(response) = Response::from_opcode(response) else {
            return Vec::new();
        };
        let key = CorrelationKey {
            response,
            address: source,
        };
        self.inner
            .entries
            .remove(&key)
            .map(|(_, entries)| entries.into_iter().map(|entry| entry.request).collect())
            .unwrap_or_default()
    }

    /// Remove the request admitted with `ticket` and cancel its timer.
    ///
    /// Returns `None` when that request was already resolved or timed out;
    /// a newer request under the same key is left alone.
    pub fn withdraw(&self, ticket: Ticket) -> Option<PendingRequest> {
        self.inner
            .take(ticket.key, ticket.id)
            .map(|entry| entry.request)
    }

    /// Drop every outstanding request without reporting it, cancelling all
    /// timers.
    pub fn clear(&self) { self.inner.entries.clear(); }

    /// Number of outstanding requests.
    #[must_use]
    pub fn len(&self) -> usize { self.inner.entries.iter().map(|slot| slot.len()).sum() }

    /// Returns true when no request is outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.inner.entries.is_empty() }

    fn arm(&self, request: PendingRequest) -> PendingEntry {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let table: Weak<Inner> = Arc::downgrade(&self.inner);
        let timeout = self.inner.timeout;
        let key = request.key();

        tokio::spawn(async move {
            tokio::select! {
                () = cancelled.cancelled() => {}
                () = tokio::time::sleep(timeout) => {
                    if let Some(table) = table.upgrade() {
                        table.expire(key, id);
                    }
                }
            }
        });

        PendingEntry {
            id,
            request,
            _timer: token.drop_guard(),
        }
    }
}

impl std::fmt::Debug for PendingRequestTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRequestTable")
            .field("timeout", &self.inner.timeout)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
