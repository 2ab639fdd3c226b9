use std::path::{Path, PathBuf};

use crate::core::error::{LauncherError, LauncherResult};

/// Files and folders rooted at the launcher's base directory.
#[derive(Debug, Clone)]
pub struct LauncherPaths {
    base_dir: PathBuf,
}

impl LauncherPaths {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Game directory used by the vanilla flow.
    pub fn vanilla_dir(&self) -> GameDirs {
        GameDirs::new(self.base_dir.join("minecraft"))
    }

    /// Game directory used by the Forge flow.
    pub fn forge_dir(&self) -> GameDirs {
        GameDirs::new(self.base_dir.join("minecraft_forge"))
    }

    /// Username cache.
    pub fn user_config_path(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.base_dir.join("launcher_settings.json")
    }

    pub fn forge_installer_path(&self, forge_version: &str) -> PathBuf {
        self.base_dir
            .join(format!("forge-installer-{}.jar", forge_version))
    }

    /// Scratch `.minecraft` the Forge installer runs against.
    pub fn forge_staging_dir(&self) -> PathBuf {
        self.base_dir.join("temp_minecraft")
    }

    pub fn mods_zip_path(&self) -> PathBuf {
        self.base_dir.join("mods.zip")
    }
}

/// Layout of one game directory (a `.minecraft` equivalent):
/// - `versions/<id>/<id>.json` + `<id>.jar`
/// - `versions/<id>/natives/`
/// - `libraries/`  : Maven layout
/// - `assets/`     : `indexes/` + `objects/<xx>/<hash>`
/// - `mods/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDirs {
    root: PathBuf,
}

impl GameDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join("versions")
    }

    pub fn version_dir(&self, id: &str) -> PathBuf {
        self.versions_dir().join(id)
    }

    pub fn version_json(&self, id: &str) -> PathBuf {
        self.version_dir(id).join(format!("{}.json", id))
    }

    pub fn version_jar(&self, id: &str) -> PathBuf {
        self.version_dir(id).join(format!("{}.jar", id))
    }

    pub fn natives_dir(&self, id: &str) -> PathBuf {
        self.version_dir(id).join("natives")
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.root.join("libraries")
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub fn mods_dir(&self) -> PathBuf {
        self.root.join("mods")
    }

    /// Create the root, `versions/` and `mods/` folders.
    pub async fn ensure(&self) -> LauncherResult<()> {
        for dir in [self.root.clone(), self.versions_dir(), self.mods_dir()] {
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(LauncherError::io(&dir))?;
        }
        Ok(())
    }

    /// A version counts as installed once its client jar is on disk.
    pub fn is_installed(&self, id: &str) -> bool {
        self.version_jar(id).exists()
    }
}
