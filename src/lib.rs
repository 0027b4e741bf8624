//! A REST API for tracking personal finances.
//!
//! Users register and log in to receive a token, and then record their
//! income and expenses, set a budget per spending category, keep track of
//! recurring income sources and get totals for dashboards and charts.
//!
//! All data is stored in SQLite and every record belongs to exactly one user.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
pub mod auth;
pub mod budget;
mod config;
pub mod db;
pub mod endpoints;
mod error;
pub mod income_source;
mod json;
mod logging;
mod routing;
pub mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, AuthSettings};
pub use config::Config;
pub use db::{DbPool, initialize as initialize_db};
pub use error::Error;
pub use json::{ApiJson, ApiPath, ApiQuery, CreatedResponse, MessageResponse};
pub use logging::logging_middleware;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
