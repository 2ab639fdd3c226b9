pub mod paths;
pub mod settings;
pub mod user_config;

pub use paths::{GameDirs, LauncherPaths};
pub use settings::{Endpoints, LauncherSettings};
pub use user_config::{resolve_username, UserConfig};
