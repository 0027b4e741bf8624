use std::{fs::OpenOptions, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use finance_tracker::{
    AppState, Config, DbPool, auth::count_users, build_router, graceful_shutdown,
};

#[tokio::main]
async fn main() {
    setup_logging();

    let config = Config::parse();

    let db_pool = match DbPool::open(&config.db_path, config.max_connections) {
        Ok(db_pool) => db_pool,
        Err(error) => {
            tracing::error!(
                "Could not open the database at {}: {error}",
                config.db_path.display()
            );
            std::process::exit(1);
        }
    };

    match db_pool.acquire().await.map(|connection| count_users(&connection)) {
        Ok(Ok(user_count)) => tracing::info!("Found {user_count} registered user(s)"),
        Ok(Err(error)) | Err(error) => tracing::warn!("Could not count users: {error}"),
    }

    let state = AppState::new(db_pool, &config.secret, config.auth_settings());
    let router = add_tracing_layer(build_router(state, config.static_dir.as_deref()));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let address = config.address();
    tracing::info!("HTTP server listening on {}", address);
    if let Err(error) = axum_server::bind(address)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        std::process::exit(1);
    }
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let debug_log = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .map(|log_file| {
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_ansi(false)
                .with_writer(Arc::new(log_file))
                .with_filter(filter::LevelFilter::DEBUG)
        });

    let (debug_log, log_file_error) = match debug_log {
        Ok(layer) => (Some(layer), None),
        Err(error) => (None, Some(error)),
    };

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    if let Some(error) = log_file_error {
        tracing::warn!("Could not open debug.log, logging to stdout only: {error}");
    }
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they are converted into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
