use anyhow::Context;
use book_service::{
    AppState, app,
    config::{Config, StorageBackend, user_seeds_or_default},
    database,
    store::Stores,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let seeds = user_seeds_or_default(&config.users_file);

    let stores = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = database::connect(&config)
                .await
                .context("Failed to connect to Postgres")?;
            database::migrate(&pool)
                .await
                .context("Failed to create database schema")?;
            database::seed_users(&pool, &seeds, config.bcrypt_cost)
                .await
                .context("Failed to seed users")?;
            tracing::info!("Using Postgres storage");
            Stores::postgres(pool)
        }
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage with {} users", seeds.len());
            Stores::memory(&seeds, config.bcrypt_cost).context("Failed to load users")?
        }
    };

    spawn_token_cleanup(&stores, config.token_cleanup_interval());

    let state = AppState::new(config.clone(), stores);
    let router = app(state);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("  POST   /api/login");
    tracing::info!("  POST   /api/logout");
    tracing::info!("  GET    /api/books");
    tracing::info!("  POST   /api/books");
    tracing::info!("  GET    /api/books/{{id}}");
    tracing::info!("  PUT    /api/books/{{id}}");
    tracing::info!("  DELETE /api/books/{{id}}");
    tracing::info!("  GET    /health");
    tracing::info!("  GET    /docs");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn spawn_token_cleanup(stores: &Stores, every: std::time::Duration) {
    let tokens = stores.tokens.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match tokens.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!("Removed {} expired tokens", removed),
                Err(e) => tracing::warn!("Token cleanup failed: {}", e),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
