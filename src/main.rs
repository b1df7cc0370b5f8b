use std::sync::Arc;

use feira_api::api::{create_router, AppState};
use feira_api::config::Config;
use feira_api::db::{create_pool, MemStore, PgStore, Store};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feira_api=debug,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn Store> = if config.use_memory_store {
        tracing::warn!("running on the in-memory store; data will not survive a restart");
        Arc::new(MemStore::new())
    } else {
        let pool = create_pool(&config.database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Arc::new(PgStore::new(pool))
    };

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(store, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "feira-api listening");
    axum::serve(listener, app).await?;

    Ok(())
}
