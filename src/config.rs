//! Configuration loading

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub terabox: TeraboxConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct TeraboxConfig {
    /// Raw `Cookie` header of a logged-in browser session
    #[serde(default = "default_cookie")]
    pub cookie: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout of the share listing call
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// Timeout of each download link call
    #[serde(default = "default_link_timeout_secs")]
    pub link_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    #[serde(default = "default_link_delay_ms")]
    pub link_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Attach raw error text to failed responses
    #[serde(default = "default_diagnostics")]
    pub diagnostics: bool,
}

fn default_cookie() -> String {
    std::env::var("TERABOX_COOKIE").unwrap_or_default()
}

fn default_base_url() -> String {
    "https://www.terabox.com".to_string()
}

fn default_http_timeout_secs() -> u64 {
    15
}

fn default_link_timeout_secs() -> u64 {
    10
}

fn default_max_files() -> usize {
    std::env::var("MAX_FILES")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10)
}

fn default_link_delay_ms() -> u64 {
    std::env::var("LINK_DELAY_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(2000)
}

fn default_port() -> u16 {
    5200
}

fn default_diagnostics() -> bool {
    std::env::var("APP_ENV")
        .map(|v| v.eq_ignore_ascii_case("development"))
        .unwrap_or(false)
}

impl Default for TeraboxConfig {
    fn default() -> Self {
        Self {
            cookie: default_cookie(),
            base_url: default_base_url(),
            http_timeout_secs: default_http_timeout_secs(),
            link_timeout_secs: default_link_timeout_secs(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            link_delay_ms: default_link_delay_ms(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            diagnostics: default_diagnostics(),
        }
    }
}

// the cookie is a live session credential, keep it out of logs
impl fmt::Debug for TeraboxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeraboxConfig")
            .field("cookie", &format_args!("<{} bytes>", self.cookie.len()))
            .field("base_url", &self.base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("link_timeout_secs", &self.link_timeout_secs)
            .finish()
    }
}

impl TeraboxConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn link_timeout(&self) -> Duration {
        Duration::from_secs(self.link_timeout_secs)
    }
}

impl ResolverConfig {
    pub fn link_delay(&self) -> Duration {
        Duration::from_millis(self.link_delay_ms)
    }
}

impl Config {
    /// Reads `path` when it exists, otherwise falls back to defaults and environment variables.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn browser_ua() -> &'static str {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
    }
}
