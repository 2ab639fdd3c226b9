// ─── Version File ───
// Parses a Mojang version JSON, evaluates OS rules for libraries and
// arguments, and resolves `inheritsFrom` chains written by loader installers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::maven::MavenArtifact;
use crate::core::state::GameDirs;

/// Inheritance chains deeper than this are treated as cycles.
const MAX_INHERITANCE_DEPTH: usize = 8;

/// A fully parsed Mojang version JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionJson {
    #[serde(default)]
    pub id: Option<String>,
    pub main_class: String,
    #[serde(default)]
    pub inherits_from: Option<String>,
    /// Version whose client jar this one runs on.
    #[serde(default)]
    pub jar: Option<String>,
    /// Legacy asset index name, used when `assetIndex` is missing.
    #[serde(default)]
    pub assets: Option<String>,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    #[serde(default)]
    pub downloads: Option<VersionDownloads>,
    #[serde(default)]
    pub asset_index: Option<AssetIndexInfo>,
    #[serde(default)]
    pub arguments: Option<Arguments>,
    /// Legacy `minecraftArguments` field (pre-1.13).
    #[serde(default)]
    pub minecraft_arguments: Option<String>,
    #[serde(default)]
    pub java_version: Option<JavaVersionInfo>,
    #[serde(default, rename = "type")]
    pub version_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaVersionInfo {
    pub major_version: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionDownloads {
    pub client: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadArtifact {
    pub sha1: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetIndexInfo {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub game: Vec<serde_json::Value>,
    #[serde(default)]
    pub jvm: Vec<serde_json::Value>,
}

// ─── Library Entry with Rules ───

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryEntry {
    pub name: String,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
    #[serde(default)]
    pub rules: Option<Vec<LibraryRule>>,
    /// Legacy per-OS classifier map, e.g. `{"windows": "natives-windows-${arch}"}`.
    #[serde(default)]
    pub natives: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<LibDownloadArtifact>,
    #[serde(default)]
    pub classifiers: Option<HashMap<String, LibDownloadArtifact>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibDownloadArtifact {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    /// Empty for artifacts the Forge installer generates locally.
    #[serde(default)]
    pub url: String,
}

// ─── OS Rule Evaluation ───

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryRule {
    pub action: RuleAction,
    #[serde(default)]
    pub os: Option<OsRule>,
    /// Launcher feature flags (`is_demo_user`, `has_custom_resolution`, ...).
    #[serde(default)]
    pub features: Option<HashMap<String, bool>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsRule {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
}

impl LibraryRule {
    /// Whether this rule applies on the running platform.
    ///
    /// No launcher feature is ever enabled, so a rule gated on a feature
    /// being `true` never applies.
    fn applies(&self) -> bool {
        if let Some(features) = &self.features {
            if features.values().any(|enabled| *enabled) {
                return false;
            }
        }

        match &self.os {
            None => true,
            Some(os) => {
                let name_ok = os.name.as_deref().map_or(true, |n| n == current_os_name());
                let arch_ok = os.arch.as_deref().map_or(true, arch_matches_current);
                name_ok && arch_ok
            }
        }
    }
}

/// Mojang rules: start disallowed, the last applicable rule wins.
pub fn rules_allow(rules: &[LibraryRule]) -> bool {
    let mut allowed = false;
    for rule in rules {
        if rule.applies() {
            allowed = rule.action == RuleAction::Allow;
        }
    }
    allowed
}

impl LibraryEntry {
    /// Evaluate whether this library should be included for the current OS.
    /// No rules means always allowed.
    pub fn is_allowed_for_current_os(&self) -> bool {
        match &self.rules {
            Some(rules) => rules_allow(rules),
            None => true,
        }
    }

    /// Classifier key of this library's native bundle for the current OS.
    ///
    /// Uses the legacy `natives` map when present, otherwise looks for a
    /// `natives-<os>` entry in the classifier downloads.
    pub fn native_classifier_for_current_os(&self) -> Option<String> {
        if let Some(natives) = &self.natives {
            let arch = if cfg!(target_pointer_width = "64") {
                "64"
            } else {
                "32"
            };
            return natives
                .get(current_os_name())
                .map(|s| s.replace("${arch}", arch));
        }

        let fallback = format!("natives-{}", current_os_name());
        self.downloads
            .as_ref()?
            .classifiers
            .as_ref()?
            .contains_key(&fallback)
            .then_some(fallback)
    }

    /// Download entry of the current-OS native classifier, if any.
    pub fn native_download(&self) -> Option<&LibDownloadArtifact> {
        let classifier = self.native_classifier_for_current_os()?;
        self.downloads
            .as_ref()?
            .classifiers
            .as_ref()?
            .get(&classifier)
    }

    pub fn artifact_download(&self) -> Option<&LibDownloadArtifact> {
        self.downloads.as_ref()?.artifact.as_ref()
    }

    /// Path of the main artifact relative to `libraries/`.
    ///
    /// Falls back to the Maven layout derived from `name` for entries without
    /// a `downloads` block (common in loader-generated JSON).
    pub fn artifact_path(&self) -> Option<PathBuf> {
        if let Some(path) = self.artifact_download().and_then(|a| a.path.as_deref()) {
            return Some(PathBuf::from(path));
        }
        if self.downloads.is_some() && self.artifact_download().is_none() {
            // classifier-only entry (pre-1.19 natives)
            return None;
        }
        MavenArtifact::parse(&self.name)
            .ok()
            .map(|artifact| artifact.local_path())
    }

    /// True when the main artifact itself is a native bundle for this OS
    /// (`org.lwjgl:lwjgl:3.3.3:natives-windows`).
    pub fn is_native_artifact(&self) -> bool {
        MavenArtifact::parse(&self.name)
            .ok()
            .and_then(|a| a.classifier)
            .is_some_and(|c| native_classifier_matches_current_os(&c))
    }
}

/// Get the Mojang OS name for the current platform.
pub fn current_os_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "macos") {
        "osx"
    } else {
        "linux"
    }
}

/// Match a `natives-<os>[-<arch>]` classifier against the host.
///
/// LWJGL publishes macOS natives as `natives-macos`, Mojang metadata says
/// `osx`. A classifier without an arch suffix is the x86_64 build.
fn native_classifier_matches_current_os(classifier: &str) -> bool {
    let Some(platform) = classifier.strip_prefix("natives-") else {
        return false;
    };
    let (os, arch) = platform.split_once('-').unwrap_or((platform, "x86_64"));
    let os_ok = match current_os_name() {
        "osx" => os == "osx" || os == "macos",
        current => os == current,
    };
    os_ok && arch_matches_current(arch)
}

fn arch_matches_current(arch: &str) -> bool {
    match arch {
        "x86" => cfg!(target_arch = "x86"),
        "x86_64" | "amd64" => cfg!(target_arch = "x86_64"),
        "arm64" | "aarch64" => cfg!(target_arch = "aarch64"),
        _ => false,
    }
}

impl VersionJson {
    /// Fetch and parse a version JSON, keeping the raw text for saving.
    pub async fn fetch(downloader: &Downloader, url: &str) -> LauncherResult<(Self, String)> {
        let raw = downloader.fetch_text(url).await?;
        let version_json: VersionJson = serde_json::from_str(&raw)?;
        Ok((version_json, raw))
    }

    /// Save the raw version JSON as `versions/<id>/<id>.json`.
    pub async fn save_to(raw_json: &str, dirs: &GameDirs, version_id: &str) -> LauncherResult<()> {
        let path = dirs.version_json(version_id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(LauncherError::io(parent))?;
        }
        tokio::fs::write(&path, raw_json)
            .await
            .map_err(LauncherError::io(&path))
    }

    pub fn client_download(&self) -> Option<&DownloadArtifact> {
        self.downloads.as_ref()?.client.as_ref()
    }

    /// Libraries that pass OS rules, in declaration order.
    pub fn allowed_libraries(&self) -> impl Iterator<Item = &LibraryEntry> {
        self.libraries.iter().filter(|lib| {
            let allowed = lib.is_allowed_for_current_os();
            if !allowed {
                debug!("Skipping library (OS rule): {}", lib.name);
            }
            allowed
        })
    }

    /// Get the required Java major version from the version JSON.
    pub fn required_java_major(&self) -> u32 {
        self.java_version
            .as_ref()
            .map(|j| j.major_version)
            .unwrap_or(17)
    }

    /// Game arguments after rule filtering (placeholders left intact).
    pub fn game_args(&self) -> Vec<String> {
        match &self.arguments {
            Some(args) if !args.game.is_empty() => {
                args.game.iter().flat_map(extract_argument_values).collect()
            }
            _ => match &self.minecraft_arguments {
                Some(s) => s.split_whitespace().map(|s| s.to_string()).collect(),
                None => vec![],
            },
        }
    }

    /// JVM arguments after rule filtering (placeholders left intact).
    pub fn jvm_args(&self) -> Vec<String> {
        match &self.arguments {
            Some(args) => args.jvm.iter().flat_map(extract_argument_values).collect(),
            None => vec![],
        }
    }

    /// Merge a child version JSON onto its parent.
    ///
    /// Scalars from the child win. Top-level arrays (`libraries`) are
    /// concatenated child first; arrays nested in objects (`arguments.game`,
    /// `arguments.jvm`) are concatenated parent first.
    pub fn merge_with_parent_json(
        current_json: &serde_json::Value,
        parent_json: &serde_json::Value,
    ) -> serde_json::Value {
        let mut merged = parent_json.clone();

        let Some(obj) = current_json.as_object() else {
            return merged;
        };

        for (key, value) in obj {
            match (value, merged.get_mut(key)) {
                (serde_json::Value::Array(child), Some(serde_json::Value::Array(parent))) => {
                    let mut combined = child.clone();
                    combined.append(parent);
                    *parent = combined;
                }
                (serde_json::Value::Object(child), Some(serde_json::Value::Object(parent))) => {
                    for (inner_key, inner_value) in child {
                        match (inner_value, parent.get_mut(inner_key)) {
                            (
                                serde_json::Value::Array(child_list),
                                Some(serde_json::Value::Array(parent_list)),
                            ) => parent_list.extend(child_list.iter().cloned()),
                            _ => {
                                parent.insert(inner_key.clone(), inner_value.clone());
                            }
                        }
                    }
                }
                _ => {
                    merged[key] = value.clone();
                }
            }
        }

        merged
    }
}

/// A version JSON with its `inheritsFrom` chain folded in.
#[derive(Debug, Clone)]
pub struct ResolvedVersion {
    pub json: VersionJson,
    /// Requested id first, root ancestor last.
    pub chain: Vec<String>,
}

impl ResolvedVersion {
    pub fn id(&self) -> &str {
        &self.chain[0]
    }

    /// The vanilla version at the bottom of the chain.
    pub fn root_id(&self) -> &str {
        &self.chain[self.chain.len() - 1]
    }
}

/// Load `versions/<id>/<id>.json` and fold every `inheritsFrom` parent into it.
pub fn resolve_version_with_inheritance(
    dirs: &GameDirs,
    version_id: &str,
) -> LauncherResult<ResolvedVersion> {
    let mut current_json = read_version_value(dirs, version_id)?;
    let mut chain = vec![version_id.to_string()];

    loop {
        let Some(parent_id) = current_json
            .get("inheritsFrom")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
        else {
            break;
        };

        if chain.len() > MAX_INHERITANCE_DEPTH || chain.contains(&parent_id) {
            return Err(LauncherError::Other(format!(
                "Version inheritance too deep or cyclic: {} -> {}",
                chain.join(" -> "),
                parent_id
            )));
        }

        let parent_json = read_version_value(dirs, &parent_id)?;
        current_json = VersionJson::merge_with_parent_json(&current_json, &parent_json);
        // the parent's own inheritsFrom (if any) must drive the next step
        match parent_json.get("inheritsFrom") {
            Some(next) => current_json["inheritsFrom"] = next.clone(),
            None => {
                if let Some(obj) = current_json.as_object_mut() {
                    obj.remove("inheritsFrom");
                }
            }
        }
        chain.push(parent_id);
    }

    let json = serde_json::from_value(current_json)?;
    Ok(ResolvedVersion { json, chain })
}

fn read_version_value(dirs: &GameDirs, version_id: &str) -> LauncherResult<serde_json::Value> {
    let path = dirs.version_json(version_id);
    if !path.exists() {
        return Err(LauncherError::NotInstalled(version_id.to_string()));
    }
    let raw = std::fs::read_to_string(&path).map_err(LauncherError::io(&path))?;
    Ok(serde_json::from_str(&raw)?)
}

fn extract_argument_values(value: &serde_json::Value) -> Vec<String> {
    if let Some(arg) = value.as_str() {
        return vec![arg.to_string()];
    }

    let Some(obj) = value.as_object() else {
        return vec![];
    };

    if let Some(rules) = obj.get("rules") {
        let parsed: Vec<LibraryRule> = match serde_json::from_value(rules.clone()) {
            Ok(parsed) => parsed,
            Err(_) => return vec![],
        };
        if !rules_allow(&parsed) {
            return vec![];
        }
    }

    match obj.get("value") {
        Some(serde_json::Value::String(s)) => vec![s.clone()],
        Some(serde_json::Value::Array(arr)) => arr
            .iter()
            .filter_map(|v| v.as_str().map(ToString::to_string))
            .collect(),
        _ => vec![],
    }
}

/// Used by callers that need the on-disk location of a library jar.
pub fn library_file(libs_dir: &Path, lib: &LibraryEntry) -> Option<PathBuf> {
    lib.artifact_path().map(|rel| libs_dir.join(rel))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(action: RuleAction, os: Option<&str>) -> LibraryRule {
        LibraryRule {
            action,
            os: os.map(|name| OsRule {
                name: Some(name.to_string()),
                arch: None,
            }),
            features: None,
        }
    }

    fn lib(name: &str, rules: Option<Vec<LibraryRule>>) -> LibraryEntry {
        LibraryEntry {
            name: name.into(),
            downloads: None,
            rules,
            natives: None,
        }
    }

    #[test]
    fn no_rules_means_allowed() {
        assert!(lib("test:lib:1.0", None).is_allowed_for_current_os());
    }

    #[test]
    fn allow_only_current_os() {
        let entry = lib(
            "test:lib:1.0",
            Some(vec![rule(RuleAction::Allow, Some(current_os_name()))]),
        );
        assert!(entry.is_allowed_for_current_os());

        let other = if current_os_name() == "linux" {
            "windows"
        } else {
            "linux"
        };
        let foreign = lib(
            "test:lib:1.0",
            Some(vec![rule(RuleAction::Allow, Some(other))]),
        );
        assert!(!foreign.is_allowed_for_current_os());
    }

    #[test]
    fn disallow_current_os() {
        let entry = lib(
            "test:lib:1.0",
            Some(vec![
                rule(RuleAction::Allow, None),
                rule(RuleAction::Disallow, Some(current_os_name())),
            ]),
        );
        assert!(!entry.is_allowed_for_current_os());
    }

    #[test]
    fn foreign_arch_rule_does_not_apply() {
        let foreign_arch = if cfg!(target_arch = "x86") { "arm64" } else { "x86" };
        let entry = LibraryEntry {
            rules: Some(vec![LibraryRule {
                action: RuleAction::Allow,
                os: Some(OsRule {
                    name: Some(current_os_name().to_string()),
                    arch: Some(foreign_arch.to_string()),
                }),
                features: None,
            }]),
            ..lib("org.lwjgl:lwjgl:3.3.3:natives-windows-x86", None)
        };
        assert!(!entry.is_allowed_for_current_os());
    }

    #[test]
    fn argument_rules_apply_to_current_os_and_skip_features() {
        let parsed: VersionJson = serde_json::from_value(serde_json::json!({
            "id": "test",
            "mainClass": "net.minecraft.client.main.Main",
            "arguments": {
                "game": [
                    "--username",
                    "${auth_player_name}",
                    {
                        "rules": [{"action": "allow", "os": {"name": current_os_name()}}],
                        "value": ["--os-specific"]
                    },
                    {
                        "rules": [{"action": "allow", "features": {"is_demo_user": true}}],
                        "value": "--demo"
                    },
                    {
                        "rules": [{"action": "allow", "features": {"has_custom_resolution": true}}],
                        "value": ["--width", "${resolution_width}"]
                    }
                ]
            }
        }))
        .unwrap();

        assert_eq!(
            parsed.game_args(),
            vec!["--username", "${auth_player_name}", "--os-specific"]
        );
    }

    #[test]
    fn legacy_minecraft_arguments_are_split() {
        let parsed: VersionJson = serde_json::from_value(serde_json::json!({
            "mainClass": "net.minecraft.client.main.Main",
            "minecraftArguments": "--username ${auth_player_name}  --version ${version_name}"
        }))
        .unwrap();
        assert_eq!(
            parsed.game_args(),
            vec!["--username", "${auth_player_name}", "--version", "${version_name}"]
        );
        assert!(parsed.jvm_args().is_empty());
        assert_eq!(parsed.required_java_major(), 17);
    }

    #[test]
    fn legacy_natives_map_resolves_classifier() {
        let parsed: LibraryEntry = serde_json::from_value(serde_json::json!({
            "name": "org.lwjgl.lwjgl:lwjgl-platform:2.9.4",
            "natives": {
                "linux": "natives-linux",
                "osx": "natives-osx",
                "windows": "natives-windows-${arch}"
            },
            "downloads": {
                "classifiers": {
                    "natives-linux": { "path": "l.jar", "sha1": "a", "url": "http://x/l.jar" },
                    "natives-osx": { "path": "o.jar", "sha1": "b", "url": "http://x/o.jar" },
                    "natives-windows-64": { "path": "w.jar", "sha1": "c", "url": "http://x/w.jar" }
                }
            }
        }))
        .unwrap();

        let native = parsed.native_download().unwrap();
        let expected = match current_os_name() {
            "windows" if cfg!(target_pointer_width = "64") => "w.jar",
            "osx" => "o.jar",
            "linux" => "l.jar",
            _ => return,
        };
        assert_eq!(native.path.as_deref(), Some(expected));
        // classifier-only entries have no main artifact to put on the classpath
        assert_eq!(parsed.artifact_path(), None);
    }

    #[test]
    fn classifier_fallback_uses_natives_os_key() {
        let key = format!("natives-{}", current_os_name());
        let parsed: LibraryEntry = serde_json::from_value(serde_json::json!({
            "name": "com.mojang:text2speech:1.0",
            "downloads": {
                "artifact": { "path": "com/mojang/text2speech.jar", "sha1": "a", "url": "http://x/t.jar" },
                "classifiers": { key.clone(): { "path": "n.jar", "sha1": "b", "url": "http://x/n.jar" } }
            }
        }))
        .unwrap();

        assert_eq!(parsed.native_classifier_for_current_os(), Some(key));
        assert_eq!(
            parsed.artifact_path(),
            Some(PathBuf::from("com/mojang/text2speech.jar"))
        );
    }

    #[test]
    fn artifact_path_falls_back_to_maven_layout() {
        let entry = lib("net.minecraftforge:forge:1.20.4-49.2.0:client", None);
        assert_eq!(
            entry.artifact_path(),
            Some(PathBuf::from(
                "net/minecraftforge/forge/1.20.4-49.2.0/forge-1.20.4-49.2.0-client.jar"
            ))
        );
        assert!(!entry.is_native_artifact());

        let native = format!("org.lwjgl:lwjgl:3.3.3:{}", host_native_classifier());
        assert!(lib(&native, None).is_native_artifact());
        let foreign = if current_os_name() == "linux" {
            "org.lwjgl:lwjgl:3.3.3:natives-windows"
        } else {
            "org.lwjgl:lwjgl:3.3.3:natives-linux"
        };
        assert!(!lib(foreign, None).is_native_artifact());
    }

    fn host_native_classifier() -> String {
        let suffix = if cfg!(target_arch = "aarch64") {
            "-arm64"
        } else if cfg!(target_arch = "x86") {
            "-x86"
        } else {
            ""
        };
        format!("natives-{}{}", current_os_name(), suffix)
    }

    #[test]
    fn native_artifacts_for_other_architectures_are_not_native() {
        let os = current_os_name();
        let host = host_native_classifier();
        let mut foreign: Vec<String> = ["", "-arm64", "-aarch64", "-x86"]
            .iter()
            .map(|suffix| format!("natives-{os}{suffix}"))
            .filter(|classifier| {
                let host_aliases = [host.clone(), host.replace("-arm64", "-aarch64")];
                !host_aliases.contains(classifier)
            })
            .collect();
        foreign.push(format!("natives-{os}-riscv64"));

        assert!(lib(&format!("org.lwjgl:lwjgl:3.3.2:{host}"), None).is_native_artifact());
        for classifier in foreign {
            let name = format!("org.lwjgl:lwjgl:3.3.2:{classifier}");
            assert!(!lib(&name, None).is_native_artifact(), "{name}");
        }
        if os == "osx" && cfg!(target_arch = "aarch64") {
            assert!(lib("org.lwjgl:lwjgl:3.3.2:natives-macos-arm64", None).is_native_artifact());
        }
    }

    #[test]
    fn merge_with_parent_json_overrides_scalars_and_concatenates_lists() {
        let parent = serde_json::json!({
            "id": "1.20.4",
            "mainClass": "parent.Main",
            "libraries": [{"name": "a:b:1.0"}],
            "arguments": { "game": ["--parent"], "jvm": ["-Dparent"] }
        });
        let current = serde_json::json!({
            "id": "1.20.4-forge-49.2.0",
            "inheritsFrom": "1.20.4",
            "mainClass": "child.Main",
            "libraries": [{"name": "c:d:2.0"}],
            "arguments": { "game": ["--child"] }
        });

        let merged = VersionJson::merge_with_parent_json(&current, &parent);

        assert_eq!(merged["mainClass"], "child.Main");
        assert_eq!(merged["id"], "1.20.4-forge-49.2.0");
        assert_eq!(merged["libraries"][0]["name"], "c:d:2.0");
        assert_eq!(merged["libraries"][1]["name"], "a:b:1.0");
        assert_eq!(merged["arguments"]["game"], serde_json::json!(["--parent", "--child"]));
        assert_eq!(merged["arguments"]["jvm"], serde_json::json!(["-Dparent"]));
    }

    fn write_version(dirs: &GameDirs, id: &str, value: serde_json::Value) {
        let path = dirs.version_json(id);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, value.to_string()).unwrap();
    }

    #[test]
    fn resolve_version_follows_inherits_from_chain() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = GameDirs::new(tmp.path());
        write_version(
            &dirs,
            "1.20.4",
            serde_json::json!({
                "id": "1.20.4",
                "mainClass": "net.minecraft.client.main.Main",
                "assetIndex": { "id": "12", "url": "http://x/12.json" },
                "libraries": [{"name": "com.mojang:brigadier:1.2.9"}]
            }),
        );
        write_version(
            &dirs,
            "1.20.4-forge-49.2.0",
            serde_json::json!({
                "id": "1.20.4-forge-49.2.0",
                "inheritsFrom": "1.20.4",
                "mainClass": "cpw.mods.bootstraplauncher.BootstrapLauncher",
                "libraries": [{"name": "cpw.mods:bootstraplauncher:1.1.2"}]
            }),
        );

        let resolved = resolve_version_with_inheritance(&dirs, "1.20.4-forge-49.2.0").unwrap();
        assert_eq!(resolved.chain, vec!["1.20.4-forge-49.2.0", "1.20.4"]);
        assert_eq!(resolved.id(), "1.20.4-forge-49.2.0");
        assert_eq!(resolved.root_id(), "1.20.4");
        assert_eq!(
            resolved.json.main_class,
            "cpw.mods.bootstraplauncher.BootstrapLauncher"
        );
        assert_eq!(resolved.json.asset_index.as_ref().unwrap().id, "12");
        assert_eq!(resolved.json.libraries.len(), 2);
        assert!(resolved.json.inherits_from.is_none());
    }

    #[test]
    fn resolve_version_rejects_cycles_and_missing_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = GameDirs::new(tmp.path());
        write_version(
            &dirs,
            "a",
            serde_json::json!({ "mainClass": "A", "inheritsFrom": "b" }),
        );
        write_version(
            &dirs,
            "b",
            serde_json::json!({ "mainClass": "B", "inheritsFrom": "a" }),
        );
        assert!(matches!(
            resolve_version_with_inheritance(&dirs, "a"),
            Err(LauncherError::Other(_))
        ));

        write_version(
            &dirs,
            "orphan",
            serde_json::json!({ "mainClass": "O", "inheritsFrom": "gone" }),
        );
        assert!(matches!(
            resolve_version_with_inheritance(&dirs, "orphan"),
            Err(LauncherError::NotInstalled(id)) if id == "gone"
        ));
    }
}
