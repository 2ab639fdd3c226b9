use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use uuid::Uuid;

use super::progress::SyncProgress;
use crate::core::error::{LauncherError, LauncherResult};

/// A single file to mirror locally, with optional SHA-1 for validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadEntry {
    pub url: String,
    pub dest: PathBuf,
    pub sha1: Option<String>,
}

impl DownloadEntry {
    pub fn new(url: impl Into<String>, dest: impl Into<PathBuf>, sha1: Option<String>) -> Self {
        Self {
            url: url.into(),
            dest: dest.into(),
            sha1,
        }
    }
}

/// What `sync_file` did for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Downloaded,
    Skipped,
}

/// Per-batch tally of downloaded and already-present files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub downloaded: usize,
    pub skipped: usize,
}

impl BatchStats {
    pub fn record(&mut self, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Downloaded => self.downloaded += 1,
            SyncOutcome::Skipped => self.skipped += 1,
        }
    }

    pub fn merge(&mut self, other: BatchStats) {
        self.downloaded += other.downloaded;
        self.skipped += other.skipped;
    }
}

/// Streaming, SHA-1 validated downloader that reports to a shared progress counter.
///
/// Cloning is cheap; clones share the HTTP pool and the progress counter.
#[derive(Clone)]
pub struct Downloader {
    client: Client,
    /// Maximum number of parallel downloads inside one batch.
    concurrency: usize,
    progress: Arc<SyncProgress>,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            concurrency: 8,
            progress: Arc::new(SyncProgress::new()),
        }
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn with_progress(mut self, progress: Arc<SyncProgress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn progress(&self) -> &Arc<SyncProgress> {
        &self.progress
    }

    // ── Metadata fetches ────────────────────────────────

    /// GET `url` and return the body as text, failing on non-2xx.
    pub async fn fetch_text(&self, url: &str) -> LauncherResult<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> LauncherResult<T> {
        let raw = self.fetch_text(url).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    // ── Single file download ────────────────────────────

    /// Stream `url` into `dest`, optionally validating SHA-1.
    ///
    /// Bytes land in a uniquely named `<dest>.<uuid>.part` first and are
    /// renamed into place only once the body is complete and the digest
    /// matches, so `dest` existing always means a finished file. Two
    /// downloads racing for the same `dest` never share a part file.
    /// Returns the number of bytes written.
    pub async fn download_file(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: Option<&str>,
    ) -> LauncherResult<u64> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(LauncherError::io(parent))?;
        }

        let part_path = part_path(dest);
        let result = self.stream_to(url, dest, &part_path, sha1_expected).await;
        if result.is_err() {
            let _ = tokio::fs::remove_file(&part_path).await;
        }
        let written = result?;

        if let Err(e) = tokio::fs::rename(&part_path, dest).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            if !dest.exists() {
                return Err(LauncherError::io(dest)(e));
            }
            debug!("{:?} was completed by a concurrent download", dest);
        }

        debug!("Downloaded: {} -> {:?} ({} bytes)", url, dest, written);
        Ok(written)
    }

    async fn stream_to(
        &self,
        url: &str,
        dest: &Path,
        part_path: &Path,
        sha1_expected: Option<&str>,
    ) -> LauncherResult<u64> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut hasher = Sha1::new();
        let mut written = 0_u64;
        {
            let mut file = tokio::fs::File::create(part_path)
                .await
                .map_err(LauncherError::io(part_path))?;

            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                hasher.update(&chunk);
                file.write_all(&chunk)
                    .await
                    .map_err(LauncherError::io(part_path))?;
                written += chunk.len() as u64;
            }

            file.flush().await.map_err(LauncherError::io(part_path))?;
            // handle dropped here, before the rename
        }

        if let Some(expected) = sha1_expected {
            let actual = hex::encode(hasher.finalize());
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(LauncherError::Sha1Mismatch {
                    path: dest.to_path_buf(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        Ok(written)
    }

    // ── Idempotent sync ─────────────────────────────────

    /// Download `entry` unless its destination already exists.
    /// Does not touch the progress counter.
    pub async fn ensure_file(&self, entry: &DownloadEntry) -> LauncherResult<SyncOutcome> {
        if entry.dest.exists() {
            return Ok(SyncOutcome::Skipped);
        }
        self.download_file(&entry.url, &entry.dest, entry.sha1.as_deref())
            .await?;
        Ok(SyncOutcome::Downloaded)
    }

    /// Like [`Downloader::ensure_file`], then consumes one progress unit.
    pub async fn sync_file(&self, entry: &DownloadEntry) -> LauncherResult<SyncOutcome> {
        let outcome = self.ensure_file(entry).await?;
        self.progress.advance();
        Ok(outcome)
    }

    /// Sync many files with up to `concurrency` requests in flight.
    ///
    /// The first failure aborts the batch: in-flight downloads are dropped
    /// and the error is returned as-is.
    pub async fn sync_batch(&self, entries: Vec<DownloadEntry>) -> LauncherResult<BatchStats> {
        self.sync_groups(entries.into_iter().map(|e| vec![e]).collect())
            .await
    }

    /// Same as [`Downloader::sync_batch`], but every group of files shares a
    /// single progress unit (a library jar and its natives, for instance).
    ///
    /// Only the first entry for a given `dest` is fetched. Later entries for
    /// the same path count as skipped but still advance their unit.
    pub async fn sync_groups(&self, groups: Vec<Vec<DownloadEntry>>) -> LauncherResult<BatchStats> {
        info!(
            "Syncing batch: {} units, concurrency={}",
            groups.len(),
            self.concurrency
        );

        let mut claimed = HashSet::new();
        let groups: Vec<Vec<(DownloadEntry, bool)>> = groups
            .into_iter()
            .map(|group| {
                group
                    .into_iter()
                    .map(|entry| {
                        let owner = claimed.insert(entry.dest.clone());
                        (entry, owner)
                    })
                    .collect()
            })
            .collect();

        let mut results = stream::iter(groups)
            .map(|group| async move {
                let mut stats = BatchStats::default();
                for (entry, owner) in &group {
                    if *owner {
                        stats.record(self.ensure_file(entry).await?);
                    } else {
                        debug!("Duplicate destination {:?}, already queued", entry.dest);
                        stats.record(SyncOutcome::Skipped);
                    }
                }
                self.progress.advance();
                LauncherResult::Ok(stats)
            })
            .buffer_unordered(self.concurrency);

        let mut stats = BatchStats::default();
        while let Some(result) = results.next().await {
            stats.merge(result?);
        }

        Ok(stats)
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.part", Uuid::new_v4()));
    dest.with_file_name(name)
}

/// Hex SHA-1 of a byte slice, as published in Mojang metadata.
pub fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
