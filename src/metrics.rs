use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe push/pop/retry counters for a [`crate::BoundedMpmcQueue`].
///
/// Collected only when [`crate::Config::enable_metrics`] is set; otherwise
/// the queue skips the (relaxed, but non-zero) atomic increments entirely.
#[derive(Debug, Default)]
pub struct Metrics {
    items_pushed: AtomicU64,
    items_popped: AtomicU64,
    admission_retries: AtomicU64,
    commit_spins: AtomicU64,
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn add_pushed(&self, n: u64) {
        self.items_pushed.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_popped(&self, n: u64) {
        self.items_popped.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_admission_retry(&self) {
        self.admission_retries.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_commit_spin(&self) {
        self.commit_spins.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes an immutable snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            items_pushed: self.items_pushed.load(Ordering::Relaxed),
            items_popped: self.items_popped.load(Ordering::Relaxed),
            admission_retries: self.admission_retries.load(Ordering::Relaxed),
            commit_spins: self.commit_spins.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`Metrics`]'s counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub items_pushed: u64,
    pub items_popped: u64,
    pub admission_retries: u64,
    pub commit_spins: u64,
}
