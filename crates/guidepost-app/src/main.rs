use std::sync::Arc;

use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use guidepost_app::app::api::routes;
use guidepost_app::config::ConfigHandler;
use guidepost_app::db_handler::DbProviderHandler;
use guidepost_app::state::{ChangeFeedHandler, SyncEngineHandler};
use guidepost_core::config::load_config;
use guidepost_db::db::connection::create_pool;
use guidepost_db::db::migrate::run_pending_migrations;
use guidepost_service::events::ChangeFeed;
use guidepost_service::feed::import::FeedImporter;
use guidepost_service::ingest;
use guidepost_service::sync::orchestrator::SyncEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Guidepost availability engine");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    // Fail fast on a bad webhook status policy instead of at first delivery.
    ingest::default_status_from_config(&config.webhook.default_status)?;

    let applied = run_pending_migrations(&config.database.url)?;
    tracing::info!(applied, "Database schema ready");

    let pool = create_pool(
        &config.database.url,
        u32::from(config.database.max_connections),
    )
    .await?;

    tracing::info!("Database connection pool created.");

    let fetch_timeout = std::time::Duration::from_secs(config.sync.fetch_timeout_secs);
    let default_duration =
        chrono::Duration::minutes(i64::from(config.sync.default_event_duration_minutes));

    let importer = FeedImporter::new(fetch_timeout, default_duration)?;
    let engine = Arc::new(SyncEngine::new(Arc::new(importer), fetch_timeout));

    let events = Arc::new(ChangeFeed::new(64));
    spawn_change_logger(events.as_ref());

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(DbProviderHandler { pool })
        .hoop(ConfigHandler {
            settings: config.clone(),
        })
        .hoop(SyncEngineHandler { engine })
        .hoop(ChangeFeedHandler {
            feed: Arc::clone(&events),
        })
        .push(routes());

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}

/// First consumer of the change feed: an audit log of everything the
/// engine absorbed or detected.
fn spawn_change_logger(events: &ChangeFeed) {
    let mut receiver = events.subscribe();

    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => tracing::info!(event = ?event, "Change event"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Change logger fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
