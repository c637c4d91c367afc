//! Serialised access to a global [`logtest::Logger`].
//!
//! The client logs through `tracing`, which forwards to `log` so records
//! reach the captured logger even when no subscriber is installed.

use std::sync::{Mutex, MutexGuard, OnceLock};

use logtest::Logger;
use rstest::fixture;

/// Exclusive handle to the process-wide captured logger.
///
/// Tests hold the handle for their whole body so records from concurrently
/// running tests do not interleave.
pub struct LoggerHandle {
    guard: MutexGuard<'static, Logger>,
}

impl LoggerHandle {
    /// Acquire the logger, starting it on first use.
    ///
    /// # Panics
    ///
    /// Panics if a previous holder panicked while holding the handle.
    #[must_use]
    pub fn new() -> Self {
        static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

        let logger = LOGGER.get_or_init(|| Mutex::new(Logger::start()));
        let guard = logger.lock().expect("logger poisoned");

        Self { guard }
    }

    /// Discard records left over from earlier tests.
    pub fn clear(&mut self) { while self.guard.pop().is_some() {} }

    /// Pop records until one at `level` contains `needle`.
    pub fn find(&mut self, level: log::Level, needle: &str) -> bool {
        while let Some(record) = self.guard.pop() {
            if record.level() == level && record.args().contains(needle) {
                return true;
            }
        }
        false
    }
}

impl Default for LoggerHandle {
    fn default() -> Self { Self::new() }
}

impl std::ops::Deref for LoggerHandle {
    type Target = Logger;

    fn deref(&self) -> &Self::Target { &self.guard }
}

impl std::ops::DerefMut for LoggerHandle {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.guard }
}

#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
#[fixture]
pub fn logger() -> LoggerHandle { LoggerHandle::new() }
