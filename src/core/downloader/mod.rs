pub mod client;
pub mod progress;

pub use client::{sha1_hex, BatchStats, DownloadEntry, Downloader, SyncOutcome};
pub use progress::{ProgressSnapshot, SyncProgress};
