// ─── Laccom Launcher Core ───
// Backend for an offline Minecraft launcher (vanilla and Forge).
//
// Architecture:
//   core/
//     state/      : Settings, on-disk layout, username cache
//     version/    : Mojang manifest + version JSON + OS rules + inheritance
//     maven/      : Artifact coordinates
//     downloader/ : Streaming downloads with SHA-1 validation + progress
//     assets/     : Asset index + object downloads
//     sync/       : Manifest-to-disk reconciliation, natives extraction
//     java/       : JDK 21 detection and provisioning
//     loaders/    : Vanilla and Forge installers
//     modpack/    : Server mod pack install
//     auth/       : Offline account
//     launch/     : Classpath builder + process spawner

pub mod archive;
pub mod assets;
pub mod auth;
pub mod downloader;
pub mod error;
pub mod http;
pub mod java;
pub mod launch;
pub mod loaders;
pub mod maven;
pub mod modpack;
pub mod state;
pub mod sync;
pub mod version;
