mod certificates;
mod config;
mod error;
mod fonts;
mod routes;
mod state;
mod storage;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "certgen=info,tower_http=info".into()),
        )
        .init();

    let config = config::Config::from_env()?;
    let config = Arc::new(config);

    crate::storage::ensure_dirs(&config.work_dir)?;
    if !config.fonts_dir.is_dir() {
        tracing::warn!("Font directory {} does not exist yet", config.fonts_dir.display());
    }
    if config.fonts_api_key.is_none() {
        tracing::warn!("GOOGLE_FONTS_API_KEY is not set; /fonts will answer 500");
    }

    let http = reqwest::Client::builder()
        .timeout(fonts::catalog::CATALOG_TIMEOUT)
        .build()?;

    let state = Arc::new(state::AppState {
        config: config.clone(),
        http,
    });

    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("certgen listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
