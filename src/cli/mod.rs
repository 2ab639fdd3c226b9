// ─── Command Line ───
// `laccom-launcher` subcommands: JDK provisioning, vanilla install/launch and
// the automated Forge flow.

mod progress;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;

use crate::core::auth::OfflineAccount;
use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::build_http_client;
use crate::core::java::ensure_jdk;
use crate::core::launch::{launch, LaunchSpec};
use crate::core::loaders::{InstallContext, Installer, LoaderInstallResult, LoaderKind};
use crate::core::modpack::ModPack;
use crate::core::state::{resolve_username, GameDirs, LauncherPaths, LauncherSettings};

/// Laccom Minecraft launcher (vanilla and Forge, offline mode)
#[derive(Debug, Parser)]
#[command(name = "laccom-launcher")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folder holding game dirs, caches and config (defaults to the current directory)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Settings file (defaults to <base-dir>/launcher_settings.json)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Parallel downloads per batch
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Folder scanned for and receiving the JDK 21 install
    #[arg(long, global = true)]
    pub jdk_dir: Option<PathBuf>,

    /// Install the JDK without asking
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download vanilla Minecraft into <base-dir>/minecraft
    Install,

    /// Launch the installed vanilla version
    Launch {
        /// Offline username (saved for next time)
        #[arg(short, long)]
        username: Option<String>,

        /// Return once the game has started
        #[arg(long)]
        detach: bool,
    },

    /// Install vanilla if needed, then launch it
    Play {
        /// Offline username (saved for next time)
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Install Forge and the server mod pack, then launch
    Forge {
        /// Offline username (saved for next time)
        #[arg(short, long)]
        username: Option<String>,

        /// Keep the current mods instead of downloading the pack
        #[arg(long)]
        skip_mods: bool,

        /// Return once the game has started
        #[arg(long)]
        detach: bool,
    },

    /// Make sure JDK 21 is available and print its path
    Java,
}

/// Resolved per-run state shared by every command.
struct Session {
    paths: LauncherPaths,
    settings: LauncherSettings,
    downloader: Downloader,
    assume_yes: bool,
}

impl Cli {
    pub async fn execute(self) -> LauncherResult<()> {
        let session = Session::open(&self)?;

        match self.command {
            Command::Install => {
                session.java().await?;
                session.install_vanilla().await?;
                Ok(())
            }
            Command::Launch { username, detach } => {
                let dirs = session.paths.vanilla_dir();
                let version_id = session.settings.minecraft_version.clone();
                if !dirs.is_installed(&version_id) {
                    return Err(LauncherError::NotInstalled(version_id));
                }
                let java = session.java().await?;
                let username = session.username(username.as_deref())?;
                session
                    .launch(&dirs, &version_id, &username, &java, detach)
                    .await
            }
            Command::Play { username } => {
                let dirs = session.paths.vanilla_dir();
                let version_id = session.settings.minecraft_version.clone();
                let java = session.java().await?;
                if dirs.is_installed(&version_id) {
                    info!("Minecraft {} already installed", version_id);
                } else {
                    session.install_vanilla().await?;
                }
                let username = session.username(username.as_deref())?;
                session
                    .launch(&dirs, &version_id, &username, &java, false)
                    .await
            }
            Command::Forge {
                username,
                skip_mods,
                detach,
            } => session.forge(username.as_deref(), skip_mods, detach).await,
            Command::Java => {
                let java = session.java().await?;
                println!("{}", java.display());
                Ok(())
            }
        }
    }
}

impl Session {
    fn open(cli: &Cli) -> LauncherResult<Self> {
        let base_dir = match &cli.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(LauncherError::io("."))?,
        };
        let paths = LauncherPaths::new(base_dir);
        std::fs::create_dir_all(paths.base_dir()).map_err(LauncherError::io(paths.base_dir()))?;

        let settings_path = cli
            .settings
            .clone()
            .unwrap_or_else(|| paths.settings_path());
        let mut settings = LauncherSettings::load(&settings_path)?;
        if let Some(concurrency) = cli.concurrency {
            settings.concurrency = concurrency;
        }
        if let Some(jdk_dir) = &cli.jdk_dir {
            settings.jdk_dir = jdk_dir.clone();
        }

        let downloader =
            Downloader::new(build_http_client()?).with_concurrency(settings.concurrency);

        Ok(Self {
            paths,
            settings,
            downloader,
            assume_yes: cli.yes,
        })
    }

    async fn java(&self) -> LauncherResult<PathBuf> {
        let assume_yes = self.assume_yes;
        ensure_jdk(
            &self.downloader,
            &self.settings.jdk_dir,
            &self.settings.endpoints.jdk_download_base,
            || assume_yes || ask_jdk_consent(io::stdin().lock(), io::stderr()),
        )
        .await
    }

    fn username(&self, override_name: Option<&str>) -> LauncherResult<String> {
        resolve_username(
            &self.paths.user_config_path(),
            override_name,
            io::stdin().lock(),
            io::stderr(),
        )
    }

    async fn install_vanilla(&self) -> LauncherResult<LoaderInstallResult> {
        let dirs = self.paths.vanilla_dir();
        self.sync_base(dirs).await
    }

    /// Mirror the base version into `dirs` behind a progress bar.
    async fn sync_base(&self, dirs: GameDirs) -> LauncherResult<LoaderInstallResult> {
        let settings = self.settings.clone();
        let paths = self.paths.clone();
        let downloader = self.downloader.clone();

        let result = progress::track(self.downloader.progress().clone(), async move {
            let ctx = InstallContext {
                settings: &settings,
                paths: &paths,
                dirs: &dirs,
                downloader: &downloader,
                java: None,
            };
            Installer::new(LoaderKind::Vanilla).install(ctx).await
        })
        .await?;

        if let Some(report) = &result.sync {
            info!(
                "Minecraft {} ready: {} downloaded, {} already present",
                report.version_id, report.downloaded, report.skipped
            );
        }
        Ok(result)
    }

    async fn forge(
        &self,
        username: Option<&str>,
        skip_mods: bool,
        detach: bool,
    ) -> LauncherResult<()> {
        let username = self.username(username)?;

        let dirs = self.paths.forge_dir();
        dirs.ensure().await?;

        let java = self.java().await?;
        self.sync_base(dirs.clone()).await?;

        let forge = Installer::new(LoaderKind::Forge)
            .install(InstallContext {
                settings: &self.settings,
                paths: &self.paths,
                dirs: &dirs,
                downloader: &self.downloader,
                java: Some(&java),
            })
            .await?;

        if skip_mods {
            info!("Skipping mod pack download");
        } else {
            ModPack::install(
                &self.downloader,
                &self.settings.mods_zip_url,
                &self.paths.mods_zip_path(),
                &dirs.mods_dir(),
            )
            .await?;
        }

        self.launch(&dirs, &forge.version_id, &username, &java, detach)
            .await
    }

    async fn launch(
        &self,
        dirs: &GameDirs,
        version_id: &str,
        username: &str,
        java: &Path,
        detach: bool,
    ) -> LauncherResult<()> {
        let account = OfflineAccount::new(username);
        let spec = LaunchSpec::build(dirs, version_id, &account, java, &self.settings.max_memory)?;

        if let Some(pid) = launch(&spec, detach).await? {
            println!("Minecraft started (PID {pid})");
        }
        Ok(())
    }
}

/// Ask on the terminal whether JDK 21 may be downloaded. Only `y`/`yes` agree.
fn ask_jdk_consent<R: BufRead, W: Write>(mut input: R, mut output: W) -> bool {
    let _ = write!(
        output,
        "Java 21 is required. Download and install it automatically? [y/N] "
    );
    let _ = output.flush();

    let mut line = String::new();
    if input.read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
