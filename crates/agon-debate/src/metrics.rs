//! Session counters

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one controller
#[derive(Debug, Default)]
pub struct SessionMetrics {
    /// Sessions that passed validation and began running
    pub sessions_started: AtomicU64,
    /// Sessions that ran every planned round
    pub sessions_concluded: AtomicU64,
    /// Sessions halted by a provider failure or an interrupted `start`
    pub sessions_errored: AtomicU64,
    /// Sessions stopped by the cancel handle
    pub sessions_cancelled: AtomicU64,
    /// Agent turns appended to a transcript
    pub turns_completed: AtomicU64,
    /// Provider calls that failed
    pub provider_failures: AtomicU64,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_started(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_concluded(&self) {
        self.sessions_concluded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cancelled(&self) {
        self.sessions_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_turn(&self) {
        self.turns_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// A session abandoned mid-run by its caller
    pub fn record_interrupted(&self) {
        self.sessions_errored.fetch_add(1, Ordering::Relaxed);
    }

    /// A failed provider call ends its session
    pub fn record_provider_failure(&self) {
        self.provider_failures.fetch_add(1, Ordering::Relaxed);
        self.sessions_errored.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sessions_started: self.sessions_started.load(Ordering::Relaxed),
            sessions_concluded: self.sessions_concluded.load(Ordering::Relaxed),
            sessions_errored: self.sessions_errored.load(Ordering::Relaxed),
            sessions_cancelled: self.sessions_cancelled.load(Ordering::Relaxed),
            turns_completed: self.turns_completed.load(Ordering::Relaxed),
            provider_failures: self.provider_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`SessionMetrics`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub sessions_started: u64,
    pub sessions_concluded: u64,
    pub sessions_errored: u64,
    pub sessions_cancelled: u64,
    pub turns_completed: u64,
    pub provider_failures: u64,
}

impl MetricsSnapshot {
    /// Share of provider calls that failed
    pub fn failure_rate(&self) -> f64 {
        let calls = self.turns_completed + self.provider_failures;
        if calls == 0 {
            0.0
        } else {
            self.provider_failures as f64 / calls as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = SessionMetrics::new();
        metrics.record_started();
        metrics.record_turn();
        metrics.record_turn();
        metrics.record_turn();
        metrics.record_provider_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.sessions_started, 1);
        assert_eq!(snapshot.sessions_errored, 1);
        assert_eq!(snapshot.turns_completed, 3);
        assert!((snapshot.failure_rate() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_empty_failure_rate() {
        assert_eq!(MetricsSnapshot::default().failure_rate(), 0.0);
    }
}
