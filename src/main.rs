use anyhow::{Context, Result};
use querystring::config::settings::Settings;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "querystring=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let settings = Settings::from_args()?;
    let app = querystring::create_router(&settings)?;

    let listener = tokio::net::TcpListener::bind(&settings.bind)
        .await
        .with_context(|| format!("Could not bind to {}", settings.bind))?;
    tracing::info!(bind = %settings.bind, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
