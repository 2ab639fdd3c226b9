use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, instrument};

use crate::core::error::{LauncherError, LauncherResult};

/// Only JDK directories with this prefix are considered.
pub const JDK_DIR_PREFIX: &str = "jdk-21";
pub const REQUIRED_JAVA_MAJOR: u32 = 21;

/// A Java binary that answered `-version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaInstallation {
    pub path: PathBuf,
    pub version: String,
    pub major: u32,
}

pub fn java_exe() -> &'static str {
    if cfg!(windows) {
        "java.exe"
    } else {
        "java"
    }
}

/// `bin/java` of a JDK root, or the macOS bundle layout when that is what exists.
pub fn locate_java_binary(jdk_root: &Path) -> Option<PathBuf> {
    let primary = jdk_root.join("bin").join(java_exe());
    if primary.is_file() {
        return Some(primary);
    }

    let mac_layout = jdk_root
        .join("Contents")
        .join("Home")
        .join("bin")
        .join(java_exe());
    mac_layout.is_file().then_some(mac_layout)
}

/// Java binaries of every `jdk-21*` directory under `base_dir`, in name order.
pub fn java_candidates(base_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(base_dir) else {
        return Vec::new();
    };

    let mut roots: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(JDK_DIR_PREFIX))
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    // read_dir order is platform dependent
    roots.sort();

    roots.iter().filter_map(|root| locate_java_binary(root)).collect()
}

/// First `jdk-21*` directory under `base_dir` that carries a java binary.
pub fn find_java_executable(base_dir: &Path) -> Option<PathBuf> {
    java_candidates(base_dir).into_iter().next()
}

/// True iff `java -version` reports a 21.x runtime.
#[instrument]
pub fn check_java_version(java: &Path) -> bool {
    match version_output(java) {
        Some(output) => output.contains("version \"21"),
        None => false,
    }
}

/// Make the java binary executable after extraction.
pub fn ensure_java_executable(java: &Path) -> LauncherResult<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(java)
            .map_err(LauncherError::io(java))?
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(java, perms).map_err(LauncherError::io(java))?;
    }
    #[cfg(not(unix))]
    let _ = java;
    Ok(())
}

fn version_output(java: &Path) -> Option<String> {
    let output = Command::new(java).arg("-version").output().ok()?;
    // java prints its banner on stderr
    Some(format!(
        "{}{}",
        String::from_utf8_lossy(&output.stderr),
        String::from_utf8_lossy(&output.stdout)
    ))
}

pub mod probe {
    use super::*;

    #[instrument]
    pub fn probe_java(path: &Path) -> Option<JavaInstallation> {
        let output = version_output(path)?;
        debug!(
            "Probing {:?}: {}",
            path,
            output.lines().next().unwrap_or("")
        );

        let version = parse_version_string(&output)?;
        let major = parse_major_version(&version);
        Some(JavaInstallation {
            path: path.to_path_buf(),
            version,
            major,
        })
    }

    /// The first double-quoted token, as in `openjdk version "21.0.2" 2024-01-16`.
    pub fn parse_version_string(output: &str) -> Option<String> {
        output.lines().find_map(|line| {
            let start = line.find('"')?;
            let end = line[start + 1..].find('"')?;
            Some(line[start + 1..start + 1 + end].to_string())
        })
    }
}

/// `21.0.2` -> 21, legacy `1.8.0_392` -> 8.
pub fn parse_major_version(version: &str) -> u32 {
    let first_part = version.split(['.', '-', '+']).next().unwrap_or("0");
    let major: u32 = first_part.parse().unwrap_or(0);

    if major == 1 {
        version
            .split('.')
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or(major)
    } else {
        major
    }
}
