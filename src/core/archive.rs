// ─── Archives ───
// Zip and tar.gz extraction shared by JDK provisioning and the mod pack.

use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;

use crate::core::error::{LauncherError, LauncherResult};

/// Unpack every entry under `dest`, keeping its relative path.
///
/// Existing files are overwritten. An entry that would land outside `dest`
/// fails the whole extraction.
pub fn extract_zip_file(zip_path: &Path, dest: &Path) -> LauncherResult<()> {
    let zip_file = std::fs::File::open(zip_path).map_err(LauncherError::io(zip_path))?;
    let mut archive = zip::ZipArchive::new(zip_file)?;

    for index in 0..archive.len() {
        let mut zipped = archive.by_index(index)?;
        let Some(rel_path) = zipped.enclosed_name() else {
            return Err(LauncherError::Other(format!(
                "Invalid zip entry path: {}",
                zipped.name()
            )));
        };

        let out_path = dest.join(rel_path);
        if zipped.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(LauncherError::io(&out_path))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(LauncherError::io(parent))?;
        }
        let mut out = std::fs::File::create(&out_path).map_err(LauncherError::io(&out_path))?;
        std::io::copy(&mut zipped, &mut out).map_err(LauncherError::io(&out_path))?;
    }

    Ok(())
}

pub fn extract_tar_gz_file(tar_gz_path: &Path, dest: &Path) -> LauncherResult<()> {
    let tar_gz = std::fs::File::open(tar_gz_path).map_err(LauncherError::io(tar_gz_path))?;
    let mut archive = Archive::new(GzDecoder::new(tar_gz));
    archive.set_preserve_permissions(true);
    // unpack refuses entries that escape `dest`
    archive.unpack(dest).map_err(LauncherError::io(dest))
}
