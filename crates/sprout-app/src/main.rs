use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use sprout_app::app::api::routes;
use sprout_app::app::service;
use sprout_app::config::ConfigHandler;
use sprout_app::db_handler::DbProviderHandler;
use sprout_core::config::load_config;
use sprout_db::db::connection::create_pool;
use sprout_db::db::migrations::run_migrations;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

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

    tracing::info!("Starting sprout plant-care server");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    if config.database.run_migrations {
        run_migrations(&config.database.url).await?;
    }

    let pool = create_pool(
        &config.database.url,
        u32::from(config.database.max_connections),
    )
    .await?;

    let bind_addr = config.server.bind_addr();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(DbProviderHandler::new(pool))
        .hoop(ConfigHandler {
            settings: std::sync::Arc::new(config),
        })
        .push(routes());

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor)
        .serve(service(router))
        .await;

    Ok(())
}
