use serde::{Deserialize, Serialize};

pub const OFFLINE_UUID: &str = "00000000-0000-0000-0000-000000000000";
pub const OFFLINE_ACCESS_TOKEN: &str = "0";
const FALLBACK_USERNAME: &str = "Player";

/// Credentials handed to the game in offline mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OfflineAccount {
    pub username: String,
    pub uuid: String,
    pub access_token: String,
    pub xuid: String,
    pub user_type: String,
}

impl Default for OfflineAccount {
    fn default() -> Self {
        Self::new(FALLBACK_USERNAME)
    }
}

impl OfflineAccount {
    pub fn new(username: &str) -> Self {
        let username = match username.trim() {
            "" => FALLBACK_USERNAME,
            trimmed => trimmed,
        };
        Self {
            username: username.to_string(),
            uuid: OFFLINE_UUID.into(),
            access_token: OFFLINE_ACCESS_TOKEN.into(),
            xuid: "0".into(),
            user_type: "legacy".into(),
        }
    }
}
