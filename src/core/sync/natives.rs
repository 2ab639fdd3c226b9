use std::path::{Path, PathBuf};

use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{LauncherError, LauncherResult};

/// Unpack every native jar into `natives_dir`, unless that dir already exists.
///
/// Entries are flattened to their file name. `META-INF/` content and
/// directory entries are skipped. Jars are unpacked into a sibling staging
/// dir that is renamed into place only after every jar succeeded, so a
/// failed run leaves nothing that a later run would mistake for finished
/// natives. Returns whether extraction ran.
pub async fn extract_natives_once(natives_dir: &Path, jars: Vec<PathBuf>) -> LauncherResult<bool> {
    if natives_dir.exists() {
        debug!("Natives already present at {:?}", natives_dir);
        return Ok(false);
    }

    let staging = staging_dir(natives_dir);
    tokio::fs::create_dir_all(&staging)
        .await
        .map_err(LauncherError::io(&staging))?;

    let dest_dir = staging.clone();
    let count = jars.len();
    let extracted = tokio::task::spawn_blocking(move || -> LauncherResult<()> {
        for jar in &jars {
            extract_native_jar(jar, &dest_dir)?;
        }
        Ok(())
    })
    .await
    .map_err(|e| LauncherError::Other(format!("Task join error: {}", e)))
    .and_then(|r| r);

    if let Err(e) = extracted {
        let _ = tokio::fs::remove_dir_all(&staging).await;
        return Err(e);
    }

    if let Err(e) = tokio::fs::rename(&staging, natives_dir).await {
        let _ = tokio::fs::remove_dir_all(&staging).await;
        if !natives_dir.exists() {
            return Err(LauncherError::io(natives_dir)(e));
        }
    }

    info!("Extracted {} native jars into {:?}", count, natives_dir);
    Ok(true)
}

fn staging_dir(natives_dir: &Path) -> PathBuf {
    let mut name = natives_dir
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.tmp", Uuid::new_v4()));
    natives_dir.with_file_name(name)
}

fn extract_native_jar(jar: &Path, dest_dir: &Path) -> LauncherResult<()> {
    let file = std::fs::File::open(jar).map_err(LauncherError::io(jar))?;
    let mut archive = zip::ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() || entry.name().starts_with("META-INF") {
            continue;
        }

        let Some(file_name) = entry
            .enclosed_name()
            .and_then(|p| p.file_name().map(|n| n.to_os_string()))
        else {
            continue;
        };

        let dest = dest_dir.join(&file_name);
        if dest.exists() {
            debug!("Native {:?} from {:?} replaces an earlier copy", file_name, jar);
        }
        let mut out = std::fs::File::create(&dest).map_err(LauncherError::io(&dest))?;
        std::io::copy(&mut entry, &mut out).map_err(LauncherError::io(&dest))?;
        debug!("Extracted native: {:?}", file_name);
    }

    Ok(())
}
