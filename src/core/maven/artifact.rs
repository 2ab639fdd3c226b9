use std::fmt;
use std::path::PathBuf;

use crate::core::error::{LauncherError, LauncherResult};

/// A parsed Maven coordinate as found in library `name` fields.
///
/// Accepted shapes:
///   `group:artifact:version`
///   `group:artifact:version:classifier`
///   either of the above with an `@extension` suffix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MavenArtifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
    /// Defaults to `"jar"`.
    pub extension: String,
}

impl MavenArtifact {
    pub fn parse(coord: &str) -> LauncherResult<Self> {
        let (coord_part, extension) = match coord.rsplit_once('@') {
            Some((head, ext)) => (head, ext),
            None => (coord, "jar"),
        };

        let mut parts = coord_part.split(':');
        let (Some(group), Some(artifact), Some(version)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(LauncherError::InvalidMavenCoordinate(coord.to_string()));
        };
        let classifier = parts.next().map(str::to_string);
        if parts.next().is_some() || [group, artifact, version].iter().any(|p| p.is_empty()) {
            return Err(LauncherError::InvalidMavenCoordinate(coord.to_string()));
        }

        Ok(Self {
            group_id: group.to_string(),
            artifact_id: artifact.to_string(),
            version: version.to_string(),
            classifier,
            extension: extension.to_string(),
        })
    }

    /// The Forge installer jar for a `<minecraft>-<forge>` version string.
    pub fn forge_installer(forge_version: &str) -> Self {
        Self {
            group_id: "net.minecraftforge".into(),
            artifact_id: "forge".into(),
            version: forge_version.to_string(),
            classifier: Some("installer".into()),
            extension: "jar".into(),
        }
    }

    /// `artifactId-version[-classifier].extension`
    pub fn filename(&self) -> String {
        match &self.classifier {
            Some(c) => format!(
                "{}-{}-{}.{}",
                self.artifact_id, self.version, c, self.extension
            ),
            None => format!("{}-{}.{}", self.artifact_id, self.version, self.extension),
        }
    }

    fn segments(&self) -> Vec<String> {
        let mut segments: Vec<String> = self.group_id.split('.').map(str::to_string).collect();
        segments.push(self.artifact_id.clone());
        segments.push(self.version.clone());
        segments.push(self.filename());
        segments
    }

    /// `<repo>/<group/path>/<artifact>/<version>/<filename>`
    pub fn url(&self, repo_base: &str) -> String {
        format!(
            "{}/{}",
            repo_base.trim_end_matches('/'),
            self.segments().join("/")
        )
    }

    /// Location relative to a `libraries/` directory.
    pub fn local_path(&self) -> PathBuf {
        self.segments().iter().collect()
    }
}

impl fmt::Display for MavenArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)?;
        if let Some(c) = &self.classifier {
            write!(f, ":{c}")?;
        }
        if self.extension != "jar" {
            write!(f, "@{}", self.extension)?;
        }
        Ok(())
    }
}
