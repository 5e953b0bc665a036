//! Terabox share link resolver

pub mod config;
pub mod error;
pub mod resolver;
pub mod state;
pub mod terabox;
pub mod web;

pub use config::Config;
pub use error::ResolveError;
pub use resolver::{Resolver, ShareProvider, ShareResult};
pub use state::AppState;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
