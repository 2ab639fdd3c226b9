use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::maven::MavenArtifact;

const APP_DIR_NAME: &str = "laccom-launcher";

/// Remote services the launcher depends on.
///
/// Kept configurable so a mirror (or a test server) can stand in for them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Endpoints {
    pub version_manifest: String,
    pub resources: String,
    pub forge_maven: String,
    pub jdk_download_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            version_manifest: "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json"
                .into(),
            resources: "https://resources.download.minecraft.net".into(),
            forge_maven: "https://maven.minecraftforge.net".into(),
            jdk_download_base: "https://download.oracle.com/java/21/latest".into(),
        }
    }
}

/// Launcher settings, read from `launcher_settings.json` when present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LauncherSettings {
    pub minecraft_version: String,
    /// Forge Maven version, `<minecraft>-<forge>` (e.g. `1.20.4-49.2.0`).
    pub forge_version: String,
    /// Heap cap handed to the JVM as `-Xmx<max_memory>`.
    pub max_memory: String,
    pub mods_zip_url: String,
    pub jdk_dir: PathBuf,
    pub concurrency: usize,
    pub endpoints: Endpoints,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            minecraft_version: "1.20.4".into(),
            forge_version: "1.20.4-49.2.0".into(),
            max_memory: "2G".into(),
            mods_zip_url: "https://lac.laccom.org/mods.zip".into(),
            jdk_dir: default_jdk_dir(),
            concurrency: 8,
            endpoints: Endpoints::default(),
        }
    }
}

impl LauncherSettings {
    /// Load settings from disk. A missing file yields the defaults.
    pub fn load(path: &Path) -> LauncherResult<Self> {
        if !path.exists() {
            debug!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(LauncherError::io(path))?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, path: &Path) -> LauncherResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(LauncherError::io(path))
    }

    /// Forge build number, the part after the first `-` (`49.2.0`).
    pub fn forge_loader_version(&self) -> &str {
        self.forge_version
            .split_once('-')
            .map(|(_, loader)| loader)
            .unwrap_or(&self.forge_version)
    }

    /// Directory name the Forge installer creates under `versions/`.
    pub fn forge_version_id(&self) -> String {
        format!(
            "{}-forge-{}",
            self.minecraft_version,
            self.forge_loader_version()
        )
    }

    pub fn forge_installer_url(&self) -> String {
        MavenArtifact::forge_installer(&self.forge_version).url(&self.endpoints.forge_maven)
    }
}

fn default_jdk_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        PathBuf::from("C:\\jdk-21")
    } else {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
            .join("jdk-21")
    }
}
