//! Shared application state

use anyhow::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::resolver::{ResolvePolicy, Resolver, ShareProvider};
use crate::terabox::TeraboxClient;

pub struct AppState {
    pub config: Config,
    pub resolver: Resolver,
}

impl AppState {
    /// Builds the Terabox adapter. Fails when the session cookie is missing
    /// or the resolver settings are unusable.
    pub fn new(config: Config) -> Result<Self> {
        let provider = TeraboxClient::new(&config.terabox)?;
        Self::with_provider(config, Arc::new(provider))
    }

    pub fn with_provider(config: Config, provider: Arc<dyn ShareProvider>) -> Result<Self> {
        let policy = ResolvePolicy::try_from(&config.resolver)?;
        Ok(Self {
            resolver: Resolver::new(provider, policy),
            config,
        })
    }
}
