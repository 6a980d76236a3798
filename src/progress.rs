//! One-way progress notifications out of an ingestion run.
//!
//! The core never reads anything back from a sink, so every implementation
//! (including doing nothing at all) yields the same resolved graph.

use tracing::{info, warn};

pub trait ProgressSink {
    /// Milestones: start, per-phase summaries, elapsed time.
    fn progress(&mut self, message: &str);

    /// Recoverable anomalies: skipped nodes, missing parents, cycles.
    fn warning(&mut self, message: &str) {
        self.progress(message);
    }
}

/// The default sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn progress(&mut self, _message: &str) {}
}

/// Append-only message log, for callers that want to show the loading log to a
/// person after (or while) the run completes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogCollector {
    pub logs: Vec<String>,
}

impl LogCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.logs.clear();
    }
}

impl ProgressSink for LogCollector {
    fn progress(&mut self, message: &str) {
        self.logs.push(message.to_string());
    }

    fn warning(&mut self, message: &str) {
        self.logs.push(format!("Warning: {}", message));
    }
}

/// Forwards to `tracing` so the messages end up wherever `init_logging` sent
/// them.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn progress(&mut self, message: &str) {
        info!("{}", message);
    }

    fn warning(&mut self, message: &str) {
        warn!("{}", message);
    }
}
