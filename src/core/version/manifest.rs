// ─── Version Manifest ───
// Handles fetching and parsing the Mojang version manifest v2.

use serde::Deserialize;
use tracing::info;

use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};

/// Top-level Mojang version manifest.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionEntry>,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
}

impl VersionManifest {
    pub async fn fetch(downloader: &Downloader, url: &str) -> LauncherResult<Self> {
        info!("Fetching Minecraft version manifest...");
        let manifest: VersionManifest = downloader.fetch_json(url).await?;
        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Find a specific version entry by ID (e.g. "1.20.4").
    pub fn find_version(&self, id: &str) -> LauncherResult<&VersionEntry> {
        self.versions
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| LauncherError::VersionNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_manifest_and_find_entry() {
        let json = r#"{
            "latest": { "release": "1.20.4", "snapshot": "24w01a" },
            "versions": [
                {
                    "id": "24w01a",
                    "type": "snapshot",
                    "url": "https://example.com/24w01a.json",
                    "time": "2024-01-03T12:00:00+00:00",
                    "releaseTime": "2024-01-03T12:00:00+00:00"
                },
                {
                    "id": "1.20.4",
                    "type": "release",
                    "url": "https://example.com/1.20.4.json",
                    "sha1": "abc123"
                }
            ]
        }"#;
        let manifest: VersionManifest = serde_json::from_str(json).unwrap();
        let entry = manifest.find_version("1.20.4").unwrap();
        assert_eq!(entry.version_type, "release");
        assert_eq!(entry.url, "https://example.com/1.20.4.json");
        assert_eq!(entry.sha1.as_deref(), Some("abc123"));

        assert!(matches!(
            manifest.find_version("0.0.1"),
            Err(LauncherError::VersionNotFound(id)) if id == "0.0.1"
        ));
    }
}
