use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::core::downloader::{DownloadEntry, Downloader, SyncOutcome};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::version::AssetIndexInfo;

/// Top-level asset index JSON structure.
#[derive(Debug, Deserialize)]
pub struct AssetIndex {
    pub objects: HashMap<String, AssetObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetObject {
    pub hash: String,
    pub size: u64,
}

impl AssetIndex {
    /// Make sure `assets/indexes/<id>.json` exists, then parse it from disk.
    ///
    /// The index file is only fetched when missing. It consumes one progress
    /// unit either way.
    pub async fn ensure(
        downloader: &Downloader,
        info: &AssetIndexInfo,
        assets_dir: &Path,
    ) -> LauncherResult<(Self, SyncOutcome)> {
        let index_path = assets_dir
            .join("indexes")
            .join(format!("{}.json", info.id));

        let outcome = downloader
            .sync_file(&DownloadEntry::new(
                &info.url,
                &index_path,
                info.sha1.clone(),
            ))
            .await?;

        let raw = tokio::fs::read_to_string(&index_path)
            .await
            .map_err(LauncherError::io(&index_path))?;
        let index: AssetIndex = serde_json::from_str(&raw)?;

        info!(
            "Asset index {} lists {} objects",
            info.id,
            index.objects.len()
        );
        Ok((index, outcome))
    }

    /// One download entry per object, laid out as `objects/<xx>/<hash>`.
    ///
    /// Names that share a hash yield entries with the same `dest`; the
    /// downloader fetches such a file once and counts the rest as skipped.
    pub fn object_entries(&self, resources_url: &str, objects_dir: &Path) -> Vec<DownloadEntry> {
        let base = resources_url.trim_end_matches('/');
        self.objects
            .values()
            .filter_map(|obj| {
                let Some(prefix) = obj.hash.get(..2) else {
                    debug!("Ignoring asset with malformed hash {:?}", obj.hash);
                    return None;
                };
                Some(DownloadEntry::new(
                    format!("{}/{}/{}", base, prefix, obj.hash),
                    objects_dir.join(prefix).join(&obj.hash),
                    Some(obj.hash.clone()),
                ))
            })
            .collect()
    }
}
