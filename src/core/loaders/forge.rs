use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use super::context::InstallContext;
use super::installer::{LoaderInstallResult, LoaderInstaller};
use crate::core::error::{LauncherError, LauncherResult};

/// Installs Forge by running the official installer against a scratch
/// `.minecraft` and copying the result into the Forge game dir.
pub struct ForgeInstaller;

/// The installer refuses to run without a `launcher_profiles.json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LauncherProfiles {
    profiles: std::collections::BTreeMap<String, LauncherProfile>,
    selected_profile: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LauncherProfile {
    name: String,
    last_version_id: String,
}

#[async_trait::async_trait]
impl LoaderInstaller for ForgeInstaller {
    async fn install(&self, ctx: InstallContext<'_>) -> LauncherResult<LoaderInstallResult> {
        let settings = ctx.settings;
        let forge_id = settings.forge_version_id();
        info!(
            "Installing Forge {} for MC {}",
            settings.forge_version, settings.minecraft_version
        );

        // 1. Installer jar, fetched once
        let installer_path = ctx.paths.forge_installer_path(&settings.forge_version);
        if installer_path.exists() {
            info!("Forge installer already downloaded");
        } else {
            ctx.downloader
                .download_file(&settings.forge_installer_url(), &installer_path, None)
                .await?;
        }

        // 2. Already installed?
        let dest_version_dir = ctx.dirs.version_dir(&forge_id);
        if dest_version_dir.exists() {
            info!("Forge {} already installed, skipping installer", forge_id);
            return Ok(LoaderInstallResult {
                version_id: forge_id,
                sync: None,
                already_installed: true,
            });
        }

        let java = ctx.java.ok_or_else(|| {
            LauncherError::Loader("A Java runtime is required to run the Forge installer".into())
        })?;

        // 3. Scratch .minecraft, removed whether or not the installer succeeds
        let staging = ctx.paths.forge_staging_dir();
        if staging.exists() {
            debug!("Removing leftover {:?}", staging);
            tokio::fs::remove_dir_all(&staging)
                .await
                .map_err(LauncherError::io(&staging))?;
        }
        tokio::fs::create_dir_all(&staging)
            .await
            .map_err(LauncherError::io(&staging))?;

        let result = install_into_staging(
            java,
            &installer_path,
            &staging,
            &settings.minecraft_version,
            &forge_id,
            &dest_version_dir,
            &ctx.dirs.libraries_dir(),
        )
        .await;

        // 6. Cleanup
        let cleanup = tokio::fs::remove_dir_all(&staging).await;
        result?;
        cleanup.map_err(LauncherError::io(&staging))?;

        info!("Forge {} installed into {:?}", forge_id, ctx.dirs.root());
        Ok(LoaderInstallResult {
            version_id: forge_id,
            sync: None,
            already_installed: false,
        })
    }
}

async fn install_into_staging(
    java: &Path,
    installer_path: &Path,
    staging: &Path,
    minecraft_version: &str,
    forge_id: &str,
    dest_version_dir: &Path,
    libraries_dir: &Path,
) -> LauncherResult<()> {
    write_fake_launcher_profile(staging, minecraft_version)?;

    // 4. Installer
    run_installer(java, installer_path, staging).await?;

    // 5. Copy results
    let staged_version_dir = staging.join("versions").join(forge_id);
    if !staged_version_dir.is_dir() {
        return Err(LauncherError::Loader(format!(
            "Forge installer did not produce versions/{}",
            forge_id
        )));
    }
    if dest_version_dir.exists() {
        std::fs::remove_dir_all(dest_version_dir).map_err(LauncherError::io(dest_version_dir))?;
    }
    copy_dir_recursive(&staged_version_dir, dest_version_dir)?;

    let staged_libs = staging.join("libraries");
    if staged_libs.is_dir() {
        copy_dir_recursive(&staged_libs, libraries_dir)?;
    }
    Ok(())
}

fn write_fake_launcher_profile(
    staging: &Path,
    minecraft_version: &str,
) -> LauncherResult<PathBuf> {
    let profiles = LauncherProfiles {
        profiles: [(
            "default".to_string(),
            LauncherProfile {
                name: "default".into(),
                last_version_id: minecraft_version.to_string(),
            },
        )]
        .into_iter()
        .collect(),
        selected_profile: "default".into(),
    };

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    profiles.serialize(&mut serializer)?;

    let path = staging.join("launcher_profiles.json");
    std::fs::write(&path, buf).map_err(LauncherError::io(&path))?;
    debug!("Wrote {:?}", path);
    Ok(path)
}

async fn run_installer(java: &Path, installer: &Path, staging: &Path) -> LauncherResult<()> {
    info!("Running Forge installer (silent)...");

    let mut command = std::process::Command::new(java);
    command
        .arg("-jar")
        .arg(installer)
        .arg("--installClient")
        .arg(staging)
        .current_dir(staging);

    let output = tokio::task::spawn_blocking(move || command.output())
        .await
        .map_err(|e| LauncherError::Other(format!("Task join error: {}", e)))?
        .map_err(|e| LauncherError::JavaExecution(e.to_string()))?;

    if !output.status.success() {
        return Err(LauncherError::Loader(format!(
            "Forge installer failed (code {:?})\nSTDOUT:\n{}\nSTDERR:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    Ok(())
}

/// Copy `source` into `destination`, overwriting files that already exist.
fn copy_dir_recursive(source: &Path, destination: &Path) -> LauncherResult<()> {
    std::fs::create_dir_all(destination).map_err(LauncherError::io(destination))?;

    for entry in std::fs::read_dir(source).map_err(LauncherError::io(source))? {
        let entry = entry.map_err(LauncherError::io(source))?;
        let src_path = entry.path();
        let dst_path = destination.join(entry.file_name());
        let file_type = entry.file_type().map_err(LauncherError::io(&src_path))?;

        if file_type.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else if file_type.is_file() {
            std::fs::copy(&src_path, &dst_path).map_err(LauncherError::io(&dst_path))?;
        }
    }

    Ok(())
}
