// ─── Classpath Builder ───
// Constructs the classpath string for launching Minecraft from a resolved
// version JSON.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::state::GameDirs;
use crate::core::version::{library_file, ResolvedVersion};

/// Allowed libraries found on disk, then the client jar, deduplicated.
pub fn build_classpath(
    dirs: &GameDirs,
    resolved: &ResolvedVersion,
    client_jar: &Path,
) -> LauncherResult<String> {
    let libs_dir = dirs.libraries_dir();
    let mut entries: Vec<String> = Vec::new();

    for lib in resolved.json.allowed_libraries() {
        let Some(path) = library_file(&libs_dir, lib) else {
            continue;
        };
        if path.is_file() {
            entries.push(safe_path_str(&path));
        } else {
            debug!("Library not on disk, leaving it off the classpath: {}", lib.name);
        }
    }

    if client_jar.is_file() {
        entries.push(safe_path_str(client_jar));
    }

    dedup_preserving_order(&mut entries);

    if entries.is_empty() {
        return Err(LauncherError::NotInstalled(resolved.id().to_string()));
    }

    info!("Classpath has {} entries", entries.len());
    Ok(entries.join(get_classpath_separator()))
}

/// Client jar the game runs from.
///
/// An inherited version without its own jar gets a copy of the root version's
/// jar, so loaders that filter the classpath by `<version_name>.jar` find it.
pub fn ensure_client_jar(dirs: &GameDirs, resolved: &ResolvedVersion) -> LauncherResult<PathBuf> {
    if let Some(jar_id) = resolved.json.jar.as_deref() {
        return Ok(dirs.version_jar(jar_id));
    }

    let own_jar = dirs.version_jar(resolved.id());
    if own_jar.exists() || resolved.chain.len() == 1 {
        return Ok(own_jar);
    }

    let root_jar = dirs.version_jar(resolved.root_id());
    if !root_jar.exists() {
        return Err(LauncherError::NotInstalled(resolved.root_id().to_string()));
    }
    std::fs::copy(&root_jar, &own_jar).map_err(LauncherError::io(&own_jar))?;
    info!("Copied {:?} to {:?}", root_jar, own_jar);
    Ok(own_jar)
}

/// Platform-specific Java classpath separator.
pub fn get_classpath_separator() -> &'static str {
    if cfg!(target_os = "windows") {
        ";"
    } else {
        ":"
    }
}

fn dedup_preserving_order(entries: &mut Vec<String>) {
    let mut seen = HashSet::new();
    entries.retain(|entry| {
        let key = if cfg!(target_os = "windows") {
            entry.to_lowercase()
        } else {
            entry.clone()
        };
        seen.insert(key)
    });
}

/// Convert path to string, stripping the `\\?\` prefix canonicalize adds on Windows.
pub fn safe_path_str(path: &Path) -> String {
    let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let text = resolved.to_string_lossy().to_string();

    #[cfg(target_os = "windows")]
    {
        // java reports ClassNotFoundException for extended-length classpath entries
        if let Some(stripped) = text.strip_prefix(r"\\?\") {
            return stripped.to_string();
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::version::resolve_version_with_inheritance;

    fn write(path: &Path, body: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }

    fn install_fixture(dirs: &GameDirs) {
        write(
            &dirs.version_json("1.20.4"),
            &serde_json::json!({
                "id": "1.20.4",
                "mainClass": "net.minecraft.client.main.Main",
                "libraries": [
                    { "name": "com.google.code.gson:gson:2.10.1",
                      "downloads": { "artifact": { "path": "com/google/code/gson/gson/2.10.1/gson-2.10.1.jar", "url": "http://x" } } },
                    { "name": "com.example:missing:1.0",
                      "downloads": { "artifact": { "path": "com/example/missing-1.0.jar", "url": "http://x" } } },
                    { "name": "com.example:blocked:1.0",
                      "rules": [{ "action": "disallow" }] }
                ]
            })
            .to_string(),
        );
        write(&dirs.version_jar("1.20.4"), "client");
        write(
            &dirs
                .libraries_dir()
                .join("com/google/code/gson/gson/2.10.1/gson-2.10.1.jar"),
            "gson",
        );
        write(
            &dirs.libraries_dir().join("com/example/blocked/1.0/blocked-1.0.jar"),
            "blocked",
        );
    }

    #[test]
    fn build_classpath_keeps_present_allowed_libraries_then_client_jar() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = GameDirs::new(tmp.path());
        install_fixture(&dirs);

        let resolved = resolve_version_with_inheritance(&dirs, "1.20.4").unwrap();
        let client = ensure_client_jar(&dirs, &resolved).unwrap();
        let classpath = build_classpath(&dirs, &resolved, &client).unwrap();
        let entries: Vec<&str> = classpath.split(get_classpath_separator()).collect();

        assert_eq!(
            entries,
            vec![
                safe_path_str(
                    &dirs
                        .libraries_dir()
                        .join("com/google/code/gson/gson/2.10.1/gson-2.10.1.jar")
                ),
                safe_path_str(&dirs.version_jar("1.20.4")),
            ]
        );
    }

    #[test]
    fn inherited_version_gets_copy_of_root_jar_and_child_libraries_first() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = GameDirs::new(tmp.path());
        install_fixture(&dirs);
        write(
            &dirs.version_json("1.20.4-forge-49.2.0"),
            &serde_json::json!({
                "id": "1.20.4-forge-49.2.0",
                "inheritsFrom": "1.20.4",
                "mainClass": "cpw.mods.bootstraplauncher.BootstrapLauncher",
                "libraries": [
                    { "name": "cpw.mods:bootstraplauncher:1.1.2" },
                    { "name": "com.google.code.gson:gson:2.10.1" }
                ]
            })
            .to_string(),
        );
        write(
            &dirs
                .libraries_dir()
                .join("cpw/mods/bootstraplauncher/1.1.2/bootstraplauncher-1.1.2.jar"),
            "bootstrap",
        );

        let resolved = resolve_version_with_inheritance(&dirs, "1.20.4-forge-49.2.0").unwrap();
        let client = ensure_client_jar(&dirs, &resolved).unwrap();
        assert_eq!(client, dirs.version_jar("1.20.4-forge-49.2.0"));
        assert_eq!(std::fs::read_to_string(&client).unwrap(), "client");

        let classpath = build_classpath(&dirs, &resolved, &client).unwrap();
        let entries: Vec<&str> = classpath.split(get_classpath_separator()).collect();
        assert_eq!(entries.len(), 3);
        assert!(entries[0].ends_with("bootstraplauncher-1.1.2.jar"));
        assert!(entries[1].ends_with("gson-2.10.1.jar"));
        assert!(entries[2].ends_with("1.20.4-forge-49.2.0.jar"));
    }

    #[test]
    fn empty_classpath_means_not_installed() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = GameDirs::new(tmp.path());
        write(
            &dirs.version_json("bare"),
            r#"{ "mainClass": "Main", "libraries": [] }"#,
        );
        let resolved = resolve_version_with_inheritance(&dirs, "bare").unwrap();

        let err = build_classpath(&dirs, &resolved, &dirs.version_jar("bare")).unwrap_err();
        assert!(matches!(err, LauncherError::NotInstalled(id) if id == "bare"));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut entries = vec!["a.jar".to_string(), "b.jar".into(), "a.jar".into()];
        dedup_preserving_order(&mut entries);
        assert_eq!(entries, vec!["a.jar", "b.jar"]);
    }
}
