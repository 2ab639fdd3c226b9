// ─── User Config ───
// `config.json` username cache shared by every launch flow.

use std::io::{BufRead, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::error::{LauncherError, LauncherResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub username: String,
}

impl UserConfig {
    /// Cached username, if the file exists, parses, and holds a non-blank name.
    pub fn load(path: &Path) -> Option<String> {
        let raw = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str::<UserConfig>(&raw) {
            Ok(config) if !config.username.trim().is_empty() => Some(config.username),
            Ok(_) => None,
            Err(e) => {
                debug!("Ignoring unreadable {:?}: {}", path, e);
                None
            }
        }
    }

    /// Persist the username with a 4-space indent.
    pub fn save(path: &Path, username: &str) -> LauncherResult<()> {
        let config = UserConfig {
            username: username.to_string(),
        };

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        config.serialize(&mut ser)?;

        std::fs::write(path, buf).map_err(LauncherError::io(path))
    }
}

/// Pick the username for this session.
///
/// Priority: a non-blank `override_name`, then the cache, then an interactive
/// prompt repeated until a non-blank answer. Overrides and prompted names are
/// written back to the cache.
pub fn resolve_username<R: BufRead, W: Write>(
    path: &Path,
    override_name: Option<&str>,
    mut input: R,
    mut output: W,
) -> LauncherResult<String> {
    if let Some(name) = override_name.map(str::trim).filter(|n| !n.is_empty()) {
        UserConfig::save(path, name)?;
        return Ok(name.to_string());
    }

    if let Some(cached) = UserConfig::load(path) {
        info!("Username loaded from {:?}: {}", path, cached);
        return Ok(cached);
    }

    let username = loop {
        write!(output, "Minecraft username (offline mode): ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(LauncherError::Other(
                "No username provided (input closed)".into(),
            ));
        }

        let trimmed = line.trim();
        if !trimmed.is_empty() {
            break trimmed.to_string();
        }
    };

    UserConfig::save(path, &username)?;
    info!("Username '{}' saved to {:?}", username, path);
    Ok(username)
}
