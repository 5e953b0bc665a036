use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use terabox_direct_link::{config::Config, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // logs go to stderr so stdout stays pipeable JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "terabox_direct_link=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // terabox-direct-link <share_url> [password] [config_path]
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        return Err(anyhow!(
            "usage: {} <share_url> [password] [config_path]",
            args.first()
                .map(|s| s.as_str())
                .unwrap_or("terabox-direct-link")
        ));
    }

    let share_url = args[1].clone();
    let password = args.get(2).cloned().unwrap_or_default();
    let config_path = std::env::var("CONFIG_PATH")
        .ok()
        .or_else(|| args.get(3).cloned())
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path)?;
    if std::path::Path::new(&config_path).exists() {
        tracing::info!("✅ Config loaded from {}", config_path);
    } else {
        tracing::info!("✅ Config loaded from environment");
    }

    let state = AppState::new(config)?;

    let result = state.resolver.resolve_url(&share_url, &password).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
