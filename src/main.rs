// Web front end for a menu analysis service.

use std::sync::Arc;

use anyhow::Context;
use menu_lens::{logging, server, Config, HttpMenuService, MenuService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    logging::init_logging();

    let config = Config::from_env()?;

    let service = HttpMenuService::new(&config.api_url, config.request_timeout)
        .context("failed to build HTTP client")?;
    tracing::info!(endpoint = %service.endpoint(), "using menu analysis service");

    let service: Arc<dyn MenuService> = Arc::new(service);
    let app = server::router(server::AppState::new(service));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("🚀 Server running on http://{}", config.bind_addr);
    tracing::info!("📋 Open in your browser and drop a menu photo!");

    axum::serve(listener, app).await?;
    Ok(())
}
