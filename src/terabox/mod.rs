//! Terabox share API

pub mod download;
pub mod parser;
pub mod share;
pub mod types;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, USER_AGENT},
    Client, StatusCode, Url,
};
use std::time::Duration;

use crate::config::{Config, TeraboxConfig};
use crate::error::ResolveError;
use crate::resolver::{ShareListing, ShareProvider, ShareSession};

pub use parser::{
    extract_share_id, is_supported_url, validate_and_extract, validate_share_url,
    SUPPORTED_DOMAINS,
};

/// HTTP adapter for the first-party Terabox web API, authenticated by a session cookie.
pub struct TeraboxClient {
    client: Client,
    base_url: String,
    http_timeout: Duration,
    link_timeout: Duration,
}

impl TeraboxClient {
    /// Fails with `Configuration` when the cookie is missing or unusable as a header,
    /// or when `base_url` does not parse. Error text never includes the cookie.
    pub fn new(config: &TeraboxConfig) -> Result<Self, ResolveError> {
        let cookie = config.cookie.trim();
        if cookie.is_empty() {
            return Err(ResolveError::Configuration(
                "Terabox cookie not configured, set TERABOX_COOKIE or [terabox] cookie".into(),
            ));
        }

        let base_url = config.base_url.trim_end_matches('/').to_string();
        base_url
            .parse::<Url>()
            .map_err(|e| ResolveError::Configuration(format!("invalid base_url: {}", e)))?;

        // static header, no cookie store: upstream Set-Cookie must never replace the credential
        let mut cookie_value = HeaderValue::from_str(cookie).map_err(|_| {
            ResolveError::Configuration("Terabox cookie contains invalid header characters".into())
        })?;
        cookie_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, cookie_value);
        headers.insert(USER_AGENT, HeaderValue::from_static(Config::browser_ua()));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ResolveError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            http_timeout: config.http_timeout(),
            link_timeout: config.link_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn share_page(&self, surl: &str) -> String {
        format!("{}/s/{}", self.base_url, surl)
    }
}

#[async_trait]
impl ShareProvider for TeraboxClient {
    async fn list_share(
        &self,
        share_id: &str,
        password: &str,
    ) -> Result<ShareListing, ResolveError> {
        share::get_share_info(self, share_id, password).await
    }

    async fn download_link(
        &self,
        session: &ShareSession,
        fs_id: u64,
    ) -> Result<Option<String>, ResolveError> {
        download::get_download_link(self, session, fs_id).await
    }
}

/// Maps transport failures onto the error taxonomy.
fn request_error(err: reqwest::Error) -> ResolveError {
    if err.is_timeout() {
        return ResolveError::UpstreamTimeout;
    }
    match err.status() {
        Some(status) => check_status(status)
            .err()
            .unwrap_or_else(|| ResolveError::Unknown(err.to_string())),
        None => ResolveError::Unknown(err.to_string()),
    }
}

fn check_status(status: StatusCode) -> Result<(), ResolveError> {
    match status {
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            Err(ResolveError::UpstreamUnavailable(status.as_u16()))
        }
        StatusCode::NOT_FOUND => Err(ResolveError::ShareNotFound(
            "upstream returned HTTP 404".to_string(),
        )),
        s if !s.is_success() => Err(ResolveError::Unknown(format!("upstream returned HTTP {}", s))),
        _ => Ok(()),
    }
}

/// Log-friendly prefix of a response body.
fn preview(text: &str) -> &str {
    match text.char_indices().nth(200) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
