use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters shared by the workers of one pool.
#[derive(Debug, Default)]
pub struct PoolMetrics {
    started: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    active: AtomicUsize,
    peak_active: AtomicUsize,
}

/// Point-in-time copy of [`PoolMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub started: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub active: usize,
    pub peak_active: usize,
}

impl PoolMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_start(&self) {
        self.started.fetch_add(1, Ordering::Relaxed);
        let now = self.active.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak_active.fetch_max(now, Ordering::AcqRel);
    }

    pub fn record_finish(&self, failed: bool) {
        self.active.fetch_sub(1, Ordering::AcqRel);
        if failed {
            self.failed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            started: self.started.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            active: self.active.load(Ordering::Acquire),
            peak_active: self.peak_active.load(Ordering::Acquire),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_survives_finish() {
        let m = PoolMetrics::new();
        m.record_start();
        m.record_start();
        m.record_finish(false);
        m.record_start();
        m.record_finish(true);
        m.record_finish(false);

        let snap = m.snapshot();
        assert_eq!(snap.started, 3);
        assert_eq!(snap.succeeded, 2);
        assert_eq!(snap.failed, 1);
        assert_eq!(snap.active, 0);
        assert_eq!(snap.peak_active, 2);
    }
}
