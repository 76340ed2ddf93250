use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use roster_core::Data;
use roster_database::{Database, MIGRATOR};
use roster_server::{Config, app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        // Per-statement logs from sqlx are too chatty at info.
        !target.starts_with("sqlx::query")
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    let db = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(Duration::from_secs(10))
                .connect(database_url)
                .await?;
            info!(
                max_connections = config.max_connections,
                "PostgreSQL connection established."
            );
            Database::new(pool)
        }
        None => {
            warn!("DATABASE_URL is not set; players are kept in memory and lost on exit.");
            Database::in_memory()
        }
    };

    if let Some(pool) = db.pool() {
        if config.auto_run_migrations {
            MIGRATOR.run(pool).await?;
            info!("Database migrations applied.");
        } else {
            info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
        }
    }

    let router = app(Data::new(db), &config.api_prefix);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %listener.local_addr()?,
        prefix = %config.api_prefix,
        "Player roster listening."
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Player roster stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(?err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
