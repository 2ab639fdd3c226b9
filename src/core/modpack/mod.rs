use std::path::Path;

use tracing::info;

use crate::core::archive;
use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};

/// Server mod pack: a zip of jars unpacked into `mods/`.
pub struct ModPack;

impl ModPack {
    /// Download the pack to `zip_path`, unpack it into `mods_dir` and delete
    /// the zip. Existing mods with the same name are overwritten.
    pub async fn install(
        downloader: &Downloader,
        url: &str,
        zip_path: &Path,
        mods_dir: &Path,
    ) -> LauncherResult<()> {
        info!("Downloading mods from {}", url);
        let bytes = downloader.download_file(url, zip_path, None).await?;
        info!("Mods downloaded ({} bytes)", bytes);

        tokio::fs::create_dir_all(mods_dir)
            .await
            .map_err(LauncherError::io(mods_dir))?;

        let archive_path = zip_path.to_path_buf();
        let dest = mods_dir.to_path_buf();
        let extracted = tokio::task::spawn_blocking(move || {
            archive::extract_zip_file(&archive_path, &dest)
        })
        .await
        .map_err(|e| LauncherError::Other(format!("Task join error: {}", e)))?;

        // the zip goes away whether or not extraction worked
        tokio::fs::remove_file(zip_path)
            .await
            .map_err(LauncherError::io(zip_path))?;
        extracted?;

        info!("Mods extracted into {:?}", mods_dir);
        Ok(())
    }
}
