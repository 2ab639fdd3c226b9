use async_trait::async_trait;
use tracing::info;

use crate::core::error::LauncherResult;
use crate::core::sync::MirrorSync;

use super::context::InstallContext;
use super::installer::{LoaderInstallResult, LoaderInstaller};

/// Vanilla "installer": mirrors the Mojang version into the game dir.
pub struct VanillaInstaller;

#[async_trait]
impl LoaderInstaller for VanillaInstaller {
    async fn install(&self, ctx: InstallContext<'_>) -> LauncherResult<LoaderInstallResult> {
        let version_id = ctx.settings.minecraft_version.as_str();
        info!("Installing Vanilla {} into {:?}", version_id, ctx.dirs.root());

        let report = MirrorSync::new(ctx.downloader, &ctx.settings.endpoints)
            .run(ctx.dirs, version_id)
            .await?;

        Ok(LoaderInstallResult {
            version_id: version_id.to_string(),
            sync: Some(report),
            already_installed: false,
        })
    }
}
