use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;

const APP_USER_AGENT: &str = concat!("laccom-launcher/", env!("CARGO_PKG_VERSION"));

/// Shared client for every remote service the launcher talks to.
///
/// Compression is disabled so streamed bytes are exactly what the SHA-1
/// published by Mojang was computed over.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .build()
}
