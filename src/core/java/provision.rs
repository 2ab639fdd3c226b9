// ─── JDK Provisioning ───
// Locates a JDK 21 under the configured jdk dir and installs the Oracle
// archive there when the user agrees.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::runtime::{
    check_java_version, ensure_java_executable, find_java_executable, java_candidates, probe,
    REQUIRED_JAVA_MAJOR,
};
use crate::core::archive;
use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    TarGz,
}

impl ArchiveKind {
    fn extension(self) -> &'static str {
        match self {
            ArchiveKind::Zip => "zip",
            ArchiveKind::TarGz => "tar.gz",
        }
    }
}

/// Where to fetch JDK 21 for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JdkArchive {
    pub url: String,
    pub kind: ArchiveKind,
}

impl JdkArchive {
    pub fn for_platform(base_url: &str, os: &str, arch: &str) -> LauncherResult<Self> {
        let arch = match arch {
            "x86_64" => "x64",
            "aarch64" => "aarch64",
            other => {
                return Err(LauncherError::Other(format!(
                    "No JDK 21 build published for architecture {other}"
                )))
            }
        };
        let (os, kind) = match (os, arch) {
            ("windows", "x64") => ("windows", ArchiveKind::Zip),
            ("linux", _) => ("linux", ArchiveKind::TarGz),
            ("macos", _) => ("macos", ArchiveKind::TarGz),
            _ => {
                return Err(LauncherError::Other(format!(
                    "No JDK 21 build published for {os}-{arch}"
                )))
            }
        };

        Ok(Self {
            url: format!(
                "{}/jdk-21_{}-{}_bin.{}",
                base_url.trim_end_matches('/'),
                os,
                arch,
                kind.extension()
            ),
            kind,
        })
    }

    pub fn for_current_platform(base_url: &str) -> LauncherResult<Self> {
        Self::for_platform(base_url, std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Download into `jdk_dir` and return the java binary it provides.
    ///
    /// A `jdk-21*` dir that appeared with this install wins over any that
    /// were already there.
    #[instrument(skip(downloader))]
    pub async fn install(
        &self,
        downloader: &Downloader,
        jdk_dir: &Path,
    ) -> LauncherResult<PathBuf> {
        tokio::fs::create_dir_all(jdk_dir)
            .await
            .map_err(LauncherError::io(jdk_dir))?;

        let existing: HashSet<PathBuf> = java_candidates(jdk_dir).into_iter().collect();
        let staging = std::env::temp_dir().join(format!(
            "laccom-jdk-{}.{}",
            Uuid::new_v4(),
            self.kind.extension()
        ));

        info!("Downloading JDK 21 from {}", self.url);
        let result = self.download_and_extract(downloader, &staging, jdk_dir).await;
        let _ = tokio::fs::remove_file(&staging).await;
        result?;

        let java = java_candidates(jdk_dir)
            .into_iter()
            .find(|java| !existing.contains(java))
            .or_else(|| find_java_executable(jdk_dir))
            .ok_or(LauncherError::JavaNotFound(REQUIRED_JAVA_MAJOR))?;
        ensure_java_executable(&java)?;
        Ok(java)
    }

    async fn download_and_extract(
        &self,
        downloader: &Downloader,
        staging: &Path,
        jdk_dir: &Path,
    ) -> LauncherResult<()> {
        downloader.download_file(&self.url, staging, None).await?;

        match downloader.fetch_text(&format!("{}.sha256", self.url)).await {
            Ok(published) => verify_sha256(staging, &published)?,
            Err(err) => warn!(
                "No SHA-256 published for {} ({}), skipping check",
                self.url, err
            ),
        }

        info!("Extracting JDK 21 into {:?}", jdk_dir);
        let archive = staging.to_path_buf();
        let dest = jdk_dir.to_path_buf();
        let kind = self.kind;
        tokio::task::spawn_blocking(move || match kind {
            ArchiveKind::Zip => archive::extract_zip_file(&archive, &dest),
            ArchiveKind::TarGz => archive::extract_tar_gz_file(&archive, &dest),
        })
        .await
        .map_err(|e| LauncherError::Other(format!("Task join error: {e}")))?
    }
}

/// Return a JDK 21 java binary, installing one if needed.
///
/// Every `jdk-21*` install under `jdk_dir` is tried in name order.
/// `consent` is only consulted when none of them reports Java 21. Refusing
/// yields `JavaNotFound(21)`.
pub async fn ensure_jdk(
    downloader: &Downloader,
    jdk_dir: &Path,
    jdk_download_base: &str,
    consent: impl FnOnce() -> bool,
) -> LauncherResult<PathBuf> {
    for java in java_candidates(jdk_dir) {
        if check_java_version(&java) {
            info!("Using JDK 21 at {:?}", java);
            return Ok(java);
        }
        match probe::probe_java(&java) {
            Some(found) => warn!(
                "{:?} is Java {} ({}), not a Java 21 runtime",
                java, found.major, found.version
            ),
            None => warn!("{:?} did not answer -version", java),
        }
    }

    if !consent() {
        return Err(LauncherError::JavaNotFound(REQUIRED_JAVA_MAJOR));
    }

    let archive = JdkArchive::for_current_platform(jdk_download_base)?;
    let java = archive.install(downloader, jdk_dir).await?;
    if !check_java_version(&java) {
        return Err(LauncherError::JavaExecution(format!(
            "{} does not report version 21 after install",
            java.display()
        )));
    }

    info!("JDK 21 installed at {:?}", java);
    Ok(java)
}

fn verify_sha256(path: &Path, published: &str) -> LauncherResult<()> {
    // the .sha256 file may carry "<hash>  <filename>"
    let expected = published.split_whitespace().next().unwrap_or("").to_string();
    let actual = sha256_file(path)?;
    if actual.eq_ignore_ascii_case(&expected) {
        return Ok(());
    }
    Err(LauncherError::Sha256Mismatch {
        path: path.to_path_buf(),
        expected,
        actual,
    })
}

fn sha256_file(path: &Path) -> LauncherResult<String> {
    let mut file = std::fs::File::open(path).map_err(LauncherError::io(path))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(LauncherError::io(path))?;
    Ok(hex::encode(hasher.finalize()))
}
