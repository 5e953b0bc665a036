//! Web server entry point

use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use terabox_direct_link::{config::Config, web, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "terabox_direct_link=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Terabox direct link web server starting...");

    // CONFIG_PATH env or first argument
    let config_path = std::env::var("CONFIG_PATH")
        .ok()
        .or_else(|| std::env::args().nth(1))
        .unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load(&config_path)?;
    if std::path::Path::new(&config_path).exists() {
        tracing::info!("✅ Config loaded from {}", config_path);
    } else {
        tracing::info!("✅ Config loaded from environment");
    }

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.web.port);

    if config.web.diagnostics {
        tracing::warn!("⚠️ Diagnostics mode: error details are returned to clients");
    }

    // refuses to start without a session cookie
    let state = Arc::new(AppState::new(config)?);
    tracing::info!("✅ HTTP client ready");

    let app = web::create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("🌐 Listening on http://{}", addr);
    tracing::info!("💚 Health check: http://localhost:{}/health", port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
