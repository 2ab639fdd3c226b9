use std::path::Path;

use crate::core::downloader::Downloader;
use crate::core::state::{GameDirs, LauncherPaths, LauncherSettings};

/// Everything an installer needs for one run.
pub struct InstallContext<'a> {
    pub settings: &'a LauncherSettings,
    pub paths: &'a LauncherPaths,
    /// Game directory the loader installs into.
    pub dirs: &'a GameDirs,
    pub downloader: &'a Downloader,
    /// JDK used to run installer jars.
    pub java: Option<&'a Path>,
}
