//! Utilities for exercising a [`ConfigClient`](meshconfig::ConfigClient)
//! without a mesh daemon.
//!
//! [`RecordingTransport`] captures every access message the client sends,
//! and [`status`] builds the access payloads a node would answer with.
//!
//! ```rust
//! use meshconfig::{ConfigClient, Response};
//! use meshconfig_testing::{RecordingTransport, event_channel, status};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let transport = RecordingTransport::new();
//! let (observer, mut events) = event_channel();
//! let client = ConfigClient::new(transport.clone(), observer);
//!
//! client.get_default_ttl(0x0002).await.expect("send");
//! client.handle_access_message(0x0002, &status(Response::DefaultTtlStatus, &[0x05]));
//! assert!(events.try_recv().is_ok());
//! # }
//! ```

pub mod events;
pub mod logging;
pub mod metrics;
pub mod transport;

pub use events::{drain_events, event_channel};
pub use logging::{LoggerHandle, logger};
pub use metrics::{counters, debugging_recorder_setup};
pub use transport::{RecordingTransport, SentMessage, status};
