use async_trait::async_trait;

use crate::core::error::LauncherResult;
use crate::core::sync::SyncReport;

use super::{context::InstallContext, forge::ForgeInstaller, vanilla::VanillaInstaller};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderKind {
    Vanilla,
    Forge,
}

/// Result of one installer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderInstallResult {
    /// Directory name under `versions/` to launch.
    pub version_id: String,
    /// Set when the installer mirrored Mojang files.
    pub sync: Option<SyncReport>,
    /// True when the version was already installed and nothing ran.
    pub already_installed: bool,
}

#[async_trait]
pub trait LoaderInstaller: Send + Sync {
    async fn install(&self, ctx: InstallContext<'_>) -> LauncherResult<LoaderInstallResult>;
}

/// Static dispatch over the supported loaders.
pub enum Installer {
    Vanilla(VanillaInstaller),
    Forge(ForgeInstaller),
}

impl Installer {
    pub fn new(kind: LoaderKind) -> Self {
        match kind {
            LoaderKind::Vanilla => Self::Vanilla(VanillaInstaller),
            LoaderKind::Forge => Self::Forge(ForgeInstaller),
        }
    }

    pub async fn install(&self, ctx: InstallContext<'_>) -> LauncherResult<LoaderInstallResult> {
        match self {
            Installer::Vanilla(i) => i.install(ctx).await,
            Installer::Forge(i) => i.install(ctx).await,
        }
    }
}
