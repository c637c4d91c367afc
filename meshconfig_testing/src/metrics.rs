//! Recorder setup for metric assertions.

use std::collections::HashMap;

use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};

/// Create a debugging recorder and its snapshotter.
#[must_use]
pub fn debugging_recorder_setup() -> (Snapshotter, DebuggingRecorder) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    (snapshotter, recorder)
}

/// Snapshot every counter, keyed by metric name and the value of its first
/// label.
#[must_use]
pub fn counters(snapshotter: &Snapshotter) -> HashMap<(String, String), u64> {
    snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(key, _, _, value)| {
            let DebugValue::Counter(count) = value else {
                return None;
            };
            let label = key
                .key()
                .labels()
                .next()
                .map(|l| l.value().to_owned())
                .unwrap_or_default();
            Some(((key.key().name().to_owned(), label), count))
        })
        .collect()
}
