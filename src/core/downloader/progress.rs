use std::sync::atomic::{AtomicU64, Ordering};

/// Counter shared between the sync worker and whatever renders progress.
///
/// The worker only ever calls [`SyncProgress::advance`]; the UI side polls
/// [`SyncProgress::snapshot`] on its own schedule.
#[derive(Debug, Default)]
pub struct SyncProgress {
    downloaded: AtomicU64,
    total: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub downloaded: u64,
    pub total: u64,
}

impl ProgressSnapshot {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.downloaded as f64 / self.total as f64) * 100.0
    }
}

impl std::fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}% ({}/{})",
            self.percent() as u64,
            self.downloaded,
            self.total
        )
    }
}

impl SyncProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_total(&self, total: u64) {
        self.total.store(total, Ordering::Relaxed);
    }

    pub fn advance(&self) {
        self.downloaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.downloaded.store(0, Ordering::Relaxed);
        self.total.store(0, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            downloaded: self.downloaded.load(Ordering::Relaxed),
            total: self.total.load(Ordering::Relaxed),
        }
    }
}
