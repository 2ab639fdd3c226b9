// ─── Launch Task ───
// Builds the java command line for a version and spawns the game process.

use std::io::BufRead;
use std::io::BufReader as StdBufReader;
use std::path::{Path, PathBuf};
use std::process::Stdio;

#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;

use tracing::{debug, info, warn};

use crate::core::auth::OfflineAccount;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::java::runtime::REQUIRED_JAVA_MAJOR;
use crate::core::state::GameDirs;
use crate::core::version::{resolve_version_with_inheritance, ResolvedVersion};

use super::classpath::{build_classpath, ensure_client_jar, get_classpath_separator, safe_path_str};

const LAUNCHER_NAME: &str = env!("CARGO_PKG_NAME");
const LAUNCHER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything needed to spawn one game process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub version_id: String,
    pub java: PathBuf,
    pub jvm_args: Vec<String>,
    pub main_class: String,
    pub game_args: Vec<String>,
    pub game_dir: PathBuf,
    pub natives_dir: PathBuf,
}

/// Values substituted into `${...}` game argument placeholders.
struct GameArgContext<'a> {
    account: &'a OfflineAccount,
    version_name: &'a str,
    version_type: &'a str,
    game_dir: &'a Path,
    assets_dir: &'a Path,
    asset_index: &'a str,
}

impl LaunchSpec {
    /// Resolve `version_id` from `dirs` into a ready-to-run command.
    pub fn build(
        dirs: &GameDirs,
        version_id: &str,
        account: &OfflineAccount,
        java: &Path,
        max_memory: &str,
    ) -> LauncherResult<Self> {
        let resolved = resolve_version_with_inheritance(dirs, version_id)?;
        let wanted_java = resolved.json.required_java_major();
        if wanted_java > REQUIRED_JAVA_MAJOR {
            warn!(
                "{} asks for Java {}, launching with {:?} anyway",
                version_id, wanted_java, java
            );
        }
        let client_jar = ensure_client_jar(dirs, &resolved)?;
        let classpath = build_classpath(dirs, &resolved, &client_jar)?;
        let natives_dir = natives_dir_for(dirs, &resolved);
        let game_dir = dirs.root().to_path_buf();

        // ── JVM Arguments ──
        let mut jvm_args = vec![format!("-Xmx{}", max_memory)];
        jvm_args.extend(sanitize_jvm_args(
            &resolved.json.jvm_args(),
            &natives_dir,
            &dirs.libraries_dir(),
            &classpath,
            &game_dir,
            version_id,
        ));
        if !jvm_args
            .iter()
            .any(|arg| arg.starts_with("-Djava.library.path="))
        {
            jvm_args.push(format!(
                "-Djava.library.path={}",
                safe_path_str(&natives_dir)
            ));
        }
        jvm_args.push("-cp".into());
        jvm_args.push(classpath);

        // ── Game Arguments ──
        let assets_dir = dirs.assets_dir();
        let asset_index = asset_index_name(&resolved);
        let ctx = GameArgContext {
            account,
            version_name: version_id,
            version_type: resolved.json.version_type.as_deref().unwrap_or("release"),
            game_dir: &game_dir,
            assets_dir: &assets_dir,
            asset_index: &asset_index,
        };
        let raw_game_args = resolved.json.game_args();
        let game_args = if raw_game_args.is_empty() {
            offline_game_args(&ctx)
        } else {
            sanitize_game_args(&raw_game_args, &ctx)
        };

        Ok(Self {
            version_id: version_id.to_string(),
            java: java.to_path_buf(),
            jvm_args,
            main_class: resolved.json.main_class.clone(),
            game_args,
            game_dir,
            natives_dir,
        })
    }

    fn command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.java);
        cmd.args(&self.jvm_args)
            .arg(&self.main_class)
            .args(&self.game_args)
            .current_dir(&self.game_dir);
        configure_native_library_env(&mut cmd, &self.natives_dir);
        cmd
    }
}

/// Spawn the game.
///
/// Detached launches return the child pid right away. Otherwise the game's
/// output is forwarded to the log and this waits for it to exit; a non-zero
/// exit is an error.
pub async fn launch(spec: &LaunchSpec, detach: bool) -> LauncherResult<Option<u32>> {
    let mut cmd = spec.command();

    info!("Launching {} with Java: {:?}", spec.version_id, spec.java);
    debug!("Command (copy/paste): {}", format_command_for_logs(&cmd));

    if detach {
        configure_detached_spawn(&mut cmd);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let child = cmd
            .spawn()
            .map_err(|e| LauncherError::JavaExecution(e.to_string()))?;
        let pid = child.id();
        info!("Minecraft running detached (PID {})", pid);
        return Ok(Some(pid));
    }

    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    let mut child = cmd
        .spawn()
        .map_err(|e| LauncherError::JavaExecution(e.to_string()))?;
    info!("Minecraft running (PID {})", child.id());

    let mut readers = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        readers.push(tokio::task::spawn_blocking(move || {
            for line in StdBufReader::new(stdout).lines().map_while(Result::ok) {
                info!("[mc][stdout] {}", line);
            }
        }));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(tokio::task::spawn_blocking(move || {
            for line in StdBufReader::new(stderr).lines().map_while(Result::ok) {
                warn!("[mc][stderr] {}", line);
            }
        }));
    }

    let status = tokio::task::spawn_blocking(move || child.wait())
        .await
        .map_err(|e| LauncherError::Other(format!("Task join error: {}", e)))?
        .map_err(|e| LauncherError::JavaExecution(e.to_string()))?;
    for reader in readers {
        let _ = reader.await;
    }

    if !status.success() {
        return Err(LauncherError::JavaExecution(format!(
            "Minecraft exited with {}",
            status
        )));
    }

    info!("Minecraft exited normally");
    Ok(None)
}

/// Own natives dir, else the one the root version was synced with.
fn natives_dir_for(dirs: &GameDirs, resolved: &ResolvedVersion) -> PathBuf {
    let own = dirs.natives_dir(resolved.id());
    if own.is_dir() {
        return own;
    }
    dirs.natives_dir(resolved.root_id())
}

fn asset_index_name(resolved: &ResolvedVersion) -> String {
    resolved
        .json
        .asset_index
        .as_ref()
        .map(|index| index.id.clone())
        .or_else(|| resolved.json.assets.clone())
        .unwrap_or_else(|| "legacy".to_string())
}

fn sanitize_jvm_args(
    raw_args: &[String],
    natives_dir: &Path,
    libraries_dir: &Path,
    classpath: &str,
    game_dir: &Path,
    version_name: &str,
) -> Vec<String> {
    let mut sanitized = Vec::new();
    let natives = safe_path_str(natives_dir);
    let library_dir = safe_path_str(libraries_dir);
    let game_dir = safe_path_str(game_dir);

    let mut i = 0;
    while i < raw_args.len() {
        let arg = &raw_args[i];

        // the classpath is appended last, so any pair from the JSON goes
        if arg == "-cp" || arg == "-classpath" || arg == "--class-path" {
            i += 2;
            continue;
        }

        let resolved = arg
            .replace("${natives_directory}", &natives)
            .replace("${library_directory}", &library_dir)
            .replace("${classpath}", classpath)
            .replace("${classpath_separator}", get_classpath_separator())
            .replace("${game_directory}", &game_dir)
            .replace("${version_name}", version_name)
            .replace("${launcher_name}", LAUNCHER_NAME)
            .replace("${launcher_version}", LAUNCHER_VERSION);

        if resolved.contains("${") {
            drop_dangling_option(&mut sanitized);
            i += 1;
            continue;
        }

        sanitized.push(resolved);
        i += 1;
    }

    sanitized
}

fn sanitize_game_args(raw_args: &[String], ctx: &GameArgContext<'_>) -> Vec<String> {
    let mut sanitized = Vec::new();
    let game_dir = safe_path_str(ctx.game_dir);
    let assets_dir = safe_path_str(ctx.assets_dir);

    for arg in raw_args {
        let resolved = arg
            .replace("${auth_player_name}", &ctx.account.username)
            .replace("${version_name}", ctx.version_name)
            .replace("${game_directory}", &game_dir)
            .replace("${assets_root}", &assets_dir)
            .replace("${game_assets}", &assets_dir)
            .replace("${assets_index_name}", ctx.asset_index)
            .replace("${auth_uuid}", &ctx.account.uuid)
            .replace("${auth_access_token}", &ctx.account.access_token)
            .replace("${auth_session}", &ctx.account.access_token)
            .replace("${auth_xuid}", &ctx.account.xuid)
            .replace("${clientid}", "0")
            .replace("${user_properties}", "{}")
            .replace("${user_type}", &ctx.account.user_type)
            .replace("${version_type}", ctx.version_type);

        // unresolved placeholders take their option with them
        if resolved.contains("${") {
            drop_dangling_option(&mut sanitized);
            continue;
        }

        sanitized.push(resolved);
    }

    sanitized
}

/// Fixed argument list for version JSONs that carry no game arguments.
fn offline_game_args(ctx: &GameArgContext<'_>) -> Vec<String> {
    vec![
        "--username".into(),
        ctx.account.username.clone(),
        "--version".into(),
        ctx.version_name.to_string(),
        "--gameDir".into(),
        safe_path_str(ctx.game_dir),
        "--assetsDir".into(),
        safe_path_str(ctx.assets_dir),
        "--assetIndex".into(),
        ctx.asset_index.to_string(),
        "--uuid".into(),
        ctx.account.uuid.clone(),
        "--accessToken".into(),
        ctx.account.access_token.clone(),
    ]
}

fn drop_dangling_option(args: &mut Vec<String>) {
    if args.last().is_some_and(|last| last.starts_with('-')) {
        let _ = args.pop();
    }
}

fn configure_native_library_env(cmd: &mut std::process::Command, natives_dir: &Path) {
    let native_path = safe_path_str(natives_dir);

    if cfg!(target_os = "windows") {
        let merged = append_env_path("PATH", &native_path);
        cmd.env("PATH", merged);
    } else if cfg!(target_os = "linux") {
        let merged = append_env_path("LD_LIBRARY_PATH", &native_path);
        cmd.env("LD_LIBRARY_PATH", merged);
    } else if cfg!(target_os = "macos") {
        let merged = append_env_path("DYLD_LIBRARY_PATH", &native_path);
        cmd.env("DYLD_LIBRARY_PATH", merged);
    }
}

#[allow(unused_variables)]
fn configure_detached_spawn(cmd: &mut std::process::Command) {
    #[cfg(target_os = "windows")]
    {
        const DETACHED_PROCESS: u32 = 0x00000008;
        cmd.creation_flags(DETACHED_PROCESS);
    }
}

fn append_env_path(var_name: &str, value: &str) -> String {
    let separator = if cfg!(target_os = "windows") {
        ";"
    } else {
        ":"
    };
    match std::env::var(var_name) {
        Ok(existing) if !existing.trim().is_empty() => {
            format!("{}{}{}", value, separator, existing)
        }
        _ => value.to_string(),
    }
}

fn format_command_for_logs(cmd: &std::process::Command) -> String {
    let program = shell_escape(&cmd.get_program().to_string_lossy());
    let args = cmd
        .get_args()
        .map(|arg| shell_escape(&arg.to_string_lossy()))
        .collect::<Vec<_>>()
        .join(" ");

    if args.is_empty() {
        program
    } else {
        format!("{} {}", program, args)
    }
}

fn shell_escape(raw: &str) -> String {
    if raw.is_empty() {
        return "\"\"".to_string();
    }

    if raw.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '\\' | '=')
    }) {
        return raw.to_string();
    }

    format!("\"{}\"", raw.replace('"', "\\\""))
}
