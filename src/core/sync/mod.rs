mod mirror;
mod natives;

pub use mirror::{MirrorSync, SyncReport};
pub use natives::extract_natives_once;
