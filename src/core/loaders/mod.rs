pub mod context;
pub mod forge;
pub mod installer;
pub mod vanilla;

pub use context::InstallContext;
pub use installer::{Installer, LoaderInstallResult, LoaderInstaller, LoaderKind};
