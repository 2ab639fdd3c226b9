pub mod provision;
pub mod runtime;

pub use provision::{ensure_jdk, ArchiveKind, JdkArchive};
pub use runtime::{check_java_version, find_java_executable, JavaInstallation};
