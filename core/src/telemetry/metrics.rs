use std::sync::Mutex;

/// Counters for feature queries.
pub struct MetricsRecorder {
    inner: Mutex<QueryMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryMetrics {
    pub issued: usize,
    pub applied: usize,
    pub stale: usize,
    pub failed: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueryMetrics::default()),
        }
    }

    pub fn record_issued(&self) {
        self.update(|metrics| metrics.issued += 1);
    }

    pub fn record_applied(&self) {
        self.update(|metrics| metrics.applied += 1);
    }

    pub fn record_stale(&self) {
        self.update(|metrics| metrics.stale += 1);
    }

    pub fn record_failed(&self) {
        self.update(|metrics| metrics.failed += 1);
    }

    pub fn snapshot(&self) -> QueryMetrics {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }

    fn update(&self, apply: impl FnOnce(&mut QueryMetrics)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
