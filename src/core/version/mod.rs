pub mod manifest;
pub mod version_file;

pub use manifest::{VersionEntry, VersionManifest};
pub use version_file::{
    current_os_name, library_file, resolve_version_with_inheritance, AssetIndexInfo,
    LibDownloadArtifact, LibraryEntry, ResolvedVersion, VersionJson,
};
