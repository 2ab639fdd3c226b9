// ─── Mirror Sync ───
// Single-pass reconciliation of a game dir against Mojang metadata:
// version JSON, client jar, libraries, natives and asset objects.

use std::path::PathBuf;

use tracing::{info, warn};

use super::natives::extract_natives_once;
use crate::core::assets::AssetIndex;
use crate::core::downloader::{BatchStats, DownloadEntry, Downloader};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::state::{Endpoints, GameDirs};
use crate::core::version::{library_file, LibraryEntry, VersionJson, VersionManifest};

/// What one sync pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub version_id: String,
    pub downloaded: usize,
    pub skipped: usize,
    /// Progress units for the whole pass: objects + index + client jar + libraries.
    pub total: u64,
    pub natives_dir: PathBuf,
    pub natives_extracted: bool,
}

pub struct MirrorSync<'a> {
    downloader: &'a Downloader,
    endpoints: &'a Endpoints,
}

impl<'a> MirrorSync<'a> {
    pub fn new(downloader: &'a Downloader, endpoints: &'a Endpoints) -> Self {
        Self {
            downloader,
            endpoints,
        }
    }

    pub async fn run(&self, dirs: &GameDirs, version_id: &str) -> LauncherResult<SyncReport> {
        let progress = self.downloader.progress();
        progress.reset();

        // 1. Version metadata
        let manifest =
            VersionManifest::fetch(self.downloader, &self.endpoints.version_manifest).await?;
        let entry = manifest.find_version(version_id)?;
        info!("Syncing Minecraft {} ({})", entry.id, entry.version_type);

        let (version, raw_json) = VersionJson::fetch(self.downloader, &entry.url).await?;
        dirs.ensure().await?;
        VersionJson::save_to(&raw_json, dirs, version_id).await?;

        // 2. Asset index
        let asset_info = version.asset_index.as_ref().ok_or_else(|| {
            LauncherError::Other(format!("Version {} has no assetIndex", version_id))
        })?;
        let assets_dir = dirs.assets_dir();
        let (index, index_outcome) =
            AssetIndex::ensure(self.downloader, asset_info, &assets_dir).await?;
        let mut stats = BatchStats::default();
        stats.record(index_outcome);

        // 3. Totals
        let libraries: Vec<&LibraryEntry> = version.allowed_libraries().collect();
        let total = index.objects.len() as u64 + 2 + libraries.len() as u64;
        progress.set_total(total);

        // 4. Client jar
        let client = version.client_download().ok_or_else(|| {
            LauncherError::Other(format!("Version {} has no client download", version_id))
        })?;
        stats.record(
            self.downloader
                .sync_file(&DownloadEntry::new(
                    &client.url,
                    dirs.version_jar(version_id),
                    Some(client.sha1.clone()),
                ))
                .await?,
        );

        // 5. Libraries, one unit each
        let libs_dir = dirs.libraries_dir();
        let mut native_jars = Vec::new();
        let mut groups = Vec::with_capacity(libraries.len());
        for lib in &libraries {
            let mut group = Vec::new();

            if let Some(artifact) = lib.artifact_download() {
                if let Some(dest) = library_file(&libs_dir, lib) {
                    if artifact.url.is_empty() {
                        warn!("Library {} has no download URL", lib.name);
                    } else {
                        group.push(DownloadEntry::new(
                            &artifact.url,
                            &dest,
                            artifact.sha1.clone(),
                        ));
                    }
                    if lib.is_native_artifact() {
                        native_jars.push(dest);
                    }
                }
            }

            if let Some(native) = lib.native_download() {
                if let Some(path) = native.path.as_deref() {
                    let dest = libs_dir.join(path);
                    group.push(DownloadEntry::new(&native.url, &dest, native.sha1.clone()));
                    native_jars.push(dest);
                }
            }

            groups.push(group);
        }
        stats.merge(self.downloader.sync_groups(groups).await?);

        // 6. Natives
        let natives_dir = dirs.natives_dir(version_id);
        let natives_extracted = extract_natives_once(&natives_dir, native_jars).await?;

        // 7. Asset objects
        let objects =
            index.object_entries(&self.endpoints.resources, &assets_dir.join("objects"));
        stats.merge(self.downloader.sync_batch(objects).await?);

        info!(
            "Sync of {} complete: {} downloaded, {} already present",
            version_id, stats.downloaded, stats.skipped
        );

        Ok(SyncReport {
            version_id: version_id.to_string(),
            downloaded: stats.downloaded,
            skipped: stats.skipped,
            total,
            natives_dir,
            natives_extracted,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use super::*;
    use crate::core::downloader::{sha1_hex, SyncProgress};
    use crate::core::version::current_os_name;

    fn native_jar_bytes(entry: &str, body: &[u8]) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::SimpleFileOptions::default();
            zip.start_file("META-INF/MANIFEST.MF", options).unwrap();
            zip.write_all(b"Manifest-Version: 1.0").unwrap();
            zip.start_file(entry, options).unwrap();
            zip.write_all(body).unwrap();
            zip.finish().unwrap();
        }
        cursor.into_inner()
    }

    fn host_native_classifier() -> String {
        let suffix = if cfg!(target_arch = "aarch64") {
            "-arm64"
        } else if cfg!(target_arch = "x86") {
            "-x86"
        } else {
            ""
        };
        format!("natives-{}{}", current_os_name(), suffix)
    }

    fn foreign_native_classifier() -> String {
        let suffix = if cfg!(target_arch = "aarch64") {
            "-x86"
        } else {
            "-arm64"
        };
        format!("natives-{}{}", current_os_name(), suffix)
    }

    const NATIVES_PATH: &str = "org/lwjgl/lwjgl/3.3.3/lwjgl-natives.jar";

    struct Fixture {
        _server: mockito::ServerGuard,
        endpoints: Endpoints,
        mocks: Vec<mockito::Mock>,
        asset_hash: String,
    }

    async fn fixture() -> Fixture {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();
        let client_jar = b"client".to_vec();
        let lib_jar = b"gson".to_vec();
        let natives_jar = native_jar_bytes("liblwjgl.so", b"native");
        let foreign_jar = native_jar_bytes("linux/other/org/lwjgl/liblwjgl.so", b"foreign");
        let asset_hash = sha1_hex(b"icon");
        // two names, one content-addressed object
        let asset_index = format!(
            r#"{{"objects":{{
                "icons/icon_16x16.png":{{"hash":"{asset_hash}","size":4}},
                "minecraft/icons/icon_16x16.png":{{"hash":"{asset_hash}","size":4}}
            }}}}"#
        );

        let version_json = serde_json::json!({
            "id": "1.20.4",
            "type": "release",
            "mainClass": "net.minecraft.client.main.Main",
            "assetIndex": {
                "id": "12",
                "url": format!("{url}/indexes/12.json"),
                "sha1": sha1_hex(asset_index.as_bytes())
            },
            "downloads": {
                "client": { "url": format!("{url}/client.jar"), "sha1": sha1_hex(&client_jar) }
            },
            "libraries": [
                {
                    "name": "com.google.code.gson:gson:2.10.1",
                    "downloads": { "artifact": {
                        "path": "com/google/code/gson/gson/2.10.1/gson-2.10.1.jar",
                        "url": format!("{url}/libs/gson.jar"),
                        "sha1": sha1_hex(&lib_jar)
                    }}
                },
                {
                    "name": format!("org.lwjgl:lwjgl:3.3.3:{}", host_native_classifier()),
                    "downloads": { "artifact": {
                        "path": NATIVES_PATH,
                        "url": format!("{url}/libs/lwjgl-natives.jar"),
                        "sha1": sha1_hex(&natives_jar)
                    }},
                    "rules": [{ "action": "allow", "os": { "name": current_os_name() } }]
                },
                {
                    "name": format!("org.lwjgl:lwjgl:3.3.3:{}", foreign_native_classifier()),
                    "downloads": { "artifact": {
                        "path": "org/lwjgl/lwjgl/3.3.3/lwjgl-natives-foreign.jar",
                        "url": format!("{url}/libs/lwjgl-natives-foreign.jar"),
                        "sha1": sha1_hex(&foreign_jar)
                    }},
                    "rules": [{ "action": "allow", "os": { "name": current_os_name() } }]
                },
                {
                    "name": "com.example:never:1.0",
                    "downloads": { "artifact": {
                        "path": "com/example/never.jar",
                        "url": format!("{url}/libs/never.jar")
                    }},
                    "rules": [{ "action": "disallow" }]
                }
            ]
        });
        let manifest = serde_json::json!({
            "versions": [{ "id": "1.20.4", "type": "release", "url": format!("{url}/v/1.20.4.json") }]
        });

        let mut mocks = Vec::new();
        for (path, body) in [
            ("/manifest.json", manifest.to_string().into_bytes()),
            ("/v/1.20.4.json", version_json.to_string().into_bytes()),
        ] {
            mocks.push(
                server
                    .mock("GET", path)
                    .with_status(200)
                    .with_body(body)
                    .expect_at_least(1)
                    .create_async()
                    .await,
            );
        }
        // binary files must be fetched exactly once across both runs
        for (path, body) in [
            ("/indexes/12.json".to_string(), asset_index.into_bytes()),
            ("/client.jar".to_string(), client_jar),
            ("/libs/gson.jar".to_string(), lib_jar),
            ("/libs/lwjgl-natives.jar".to_string(), natives_jar),
            ("/libs/lwjgl-natives-foreign.jar".to_string(), foreign_jar),
            (
                format!("/resources/{}/{}", &asset_hash[..2], asset_hash),
                b"icon".to_vec(),
            ),
        ] {
            mocks.push(
                server
                    .mock("GET", path.as_str())
                    .with_status(200)
                    .with_body(body)
                    .expect(1)
                    .create_async()
                    .await,
            );
        }
        mocks.push(
            server
                .mock("GET", "/libs/never.jar")
                .expect(0)
                .create_async()
                .await,
        );

        let endpoints = Endpoints {
            version_manifest: format!("{url}/manifest.json"),
            resources: format!("{url}/resources"),
            ..Endpoints::default()
        };
        Fixture {
            _server: server,
            endpoints,
            mocks,
            asset_hash,
        }
    }

    #[tokio::test]
    async fn first_run_mirrors_everything_and_rerun_is_a_no_op() {
        let fx = fixture().await;
        let tmp = tempfile::tempdir().unwrap();
        let dirs = GameDirs::new(tmp.path().join("minecraft"));
        let progress = Arc::new(SyncProgress::new());
        let downloader =
            Downloader::new(reqwest::Client::new()).with_progress(Arc::clone(&progress));
        let sync = MirrorSync::new(&downloader, &fx.endpoints);

        let report = sync.run(&dirs, "1.20.4").await.unwrap();
        // 2 objects + index + client + 3 allowed libraries
        assert_eq!(report.total, 7);
        // the second object shares the first one's file
        assert_eq!(report.downloaded, 6);
        assert_eq!(report.skipped, 1);
        assert!(report.natives_extracted);
        assert_eq!(progress.snapshot().downloaded, 7);
        assert_eq!(progress.snapshot().percent(), 100.0);

        assert!(dirs.version_json("1.20.4").exists());
        assert!(dirs.is_installed("1.20.4"));
        assert!(dirs
            .libraries_dir()
            .join("com/google/code/gson/gson/2.10.1/gson-2.10.1.jar")
            .exists());
        assert!(!dirs.libraries_dir().join("com/example/never.jar").exists());
        assert!(dirs
            .assets_dir()
            .join("objects")
            .join(&fx.asset_hash[..2])
            .join(&fx.asset_hash)
            .exists());
        // the other-arch jar is mirrored but never extracted
        assert!(dirs
            .libraries_dir()
            .join("org/lwjgl/lwjgl/3.3.3/lwjgl-natives-foreign.jar")
            .exists());
        assert_eq!(
            std::fs::read(report.natives_dir.join("liblwjgl.so")).unwrap(),
            b"native"
        );
        assert_eq!(std::fs::read_dir(&report.natives_dir).unwrap().count(), 1);

        let rerun = sync.run(&dirs, "1.20.4").await.unwrap();
        assert_eq!(rerun.downloaded, 0);
        assert_eq!(rerun.skipped, 7);
        assert!(!rerun.natives_extracted);
        assert_eq!(progress.snapshot().downloaded, 7);

        for mock in &fx.mocks {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn unknown_version_fails_before_touching_disk() {
        let fx = fixture().await;
        let tmp = tempfile::tempdir().unwrap();
        let dirs = GameDirs::new(tmp.path().join("minecraft"));
        let downloader = Downloader::new(reqwest::Client::new());

        let err = MirrorSync::new(&downloader, &fx.endpoints)
            .run(&dirs, "0.0.0")
            .await
            .unwrap_err();
        assert!(matches!(err, LauncherError::VersionNotFound(id) if id == "0.0.0"));
        assert!(!dirs.root().exists());
    }

    #[tokio::test]
    async fn broken_native_jar_fails_the_sync_and_a_rerun_extracts() {
        let fx = fixture().await;
        let tmp = tempfile::tempdir().unwrap();
        let dirs = GameDirs::new(tmp.path().join("minecraft"));
        let downloader = Downloader::new(reqwest::Client::new());
        let sync = MirrorSync::new(&downloader, &fx.endpoints);

        // a leftover jar that is present but unreadable
        let stale = dirs.libraries_dir().join(NATIVES_PATH);
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, b"truncated").unwrap();

        let err = sync.run(&dirs, "1.20.4").await.unwrap_err();
        assert!(matches!(err, LauncherError::Zip(_)));
        assert!(!dirs.natives_dir("1.20.4").exists());

        std::fs::remove_file(&stale).unwrap();
        let report = sync.run(&dirs, "1.20.4").await.unwrap();
        assert!(report.natives_extracted);
        assert_eq!(
            std::fs::read(report.natives_dir.join("liblwjgl.so")).unwrap(),
            b"native"
        );

        for mock in &fx.mocks {
            mock.assert_async().await;
        }
    }
}
