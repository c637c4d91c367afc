//! Metric helpers for `meshconfig`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! the helpers compile to nothing.

#[cfg(feature = "metrics")]
use metrics::counter;

use crate::command::Command;

/// Name of the counter tracking requests handed to the transport.
pub const REQUESTS_SENT: &str = "meshconfig_requests_sent_total";
/// Name of the counter tracking requests refused as busy.
pub const REQUESTS_BUSY: &str = "meshconfig_requests_busy_total";
/// Name of the counter tracking status messages matched to a request.
pub const RESPONSES_MATCHED: &str = "meshconfig_responses_matched_total";
/// Name of the counter tracking requests that timed out.
pub const REQUEST_TIMEOUTS: &str = "meshconfig_request_timeouts_total";
/// Name of the counter tracking inbound messages that were dropped.
pub const INBOUND_DROPPED: &str = "meshconfig_inbound_dropped_total";

/// Why an inbound message was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// The opcode could not be decoded.
    Opcode,
    /// No request was waiting for the message.
    Unsolicited,
    /// The parameters did not match the expected layout.
    Malformed,
}

impl DropReason {
    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    fn as_str(self) -> &'static str {
        match self {
            DropReason::Opcode => "opcode",
            DropReason::Unsolicited => "unsolicited",
            DropReason::Malformed => "malformed",
        }
    }
}

/// Record a request handed to the transport.
pub fn inc_requests(command: Command) {
    #[cfg(feature = "metrics")]
    counter!(REQUESTS_SENT, "command" => command.name()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = command;
}

/// Record a request refused because a reply is already awaited.
pub fn inc_busy(command: Command) {
    #[cfg(feature = "metrics")]
    counter!(REQUESTS_BUSY, "command" => command.name()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = command;
}

/// Record a status message that resolved a request.
pub fn inc_matched(command: Command) {
    #[cfg(feature = "metrics")]
    counter!(RESPONSES_MATCHED, "command" => command.name()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = command;
}

/// Record a request that timed out.
pub fn inc_timeouts(command: Command) {
    #[cfg(feature = "metrics")]
    counter!(REQUEST_TIMEOUTS, "command" => command.name()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = command;
}

/// Record a dropped inbound message.
pub fn inc_dropped(reason: DropReason) {
    #[cfg(feature = "metrics")]
    counter!(INBOUND_DROPPED, "reason" => reason.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = reason;
}
