// ─── Terminal Progress ───
// Runs a sync in a background task and renders its shared counters.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::core::downloader::{ProgressSnapshot, SyncProgress};
use crate::core::error::{LauncherError, LauncherResult};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Spawn `task` and poll `progress` until it finishes.
pub async fn track<F, T>(progress: Arc<SyncProgress>, task: F) -> LauncherResult<T>
where
    F: Future<Output = LauncherResult<T>> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::spawn(task);

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    while !handle.is_finished() {
        render(&bar, progress.snapshot());
        ticker.tick().await;
    }

    let result = handle
        .await
        .map_err(|e| LauncherError::Other(format!("Task join error: {}", e)))?;

    render(&bar, progress.snapshot());
    if result.is_ok() {
        bar.finish();
    } else {
        bar.abandon();
    }
    result
}

fn render(bar: &ProgressBar, snapshot: ProgressSnapshot) {
    bar.set_length(snapshot.total);
    bar.set_position(snapshot.downloaded.min(snapshot.total));
    // `<percent>% (<downloaded>/<total>)`
    bar.set_message(snapshot.to_string());
}
