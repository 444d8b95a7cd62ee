use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub read_requests: u64,
    pub write_requests: u64,
    pub script_requests: u64,
}

impl StoreStats {
    pub fn total_requests(&self) -> u64 {
        self.read_requests + self.write_requests + self.script_requests
    }
}

#[derive(Debug, Default)]
pub(super) struct StatsCounter {
    reads: AtomicU64,
    writes: AtomicU64,
    scripts: AtomicU64,
}

impl StatsCounter {
    pub fn add_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_script(&self) {
        self.scripts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StoreStats {
        StoreStats {
            read_requests: self.reads.load(Ordering::Relaxed),
            write_requests: self.writes.load(Ordering::Relaxed),
            script_requests: self.scripts.load(Ordering::Relaxed),
        }
    }
}
