//! Application router configuration with protected and unprotected route definitions.

use std::path::Path;

use axum::{
    Json, Router,
    handler::HandlerWithoutStateExt,
    middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::{
    AppState,
    auth::{auth_guard, post_log_in, post_verify_email, register_user},
    budget::{get_budget_progress_endpoint, list_budgets_endpoint, upsert_budget_endpoint},
    endpoints,
    error::get_404_not_found,
    income_source::{
        create_income_source_endpoint, delete_income_source_endpoint,
        edit_income_source_endpoint, list_income_sources_endpoint,
    },
    json::MessageResponse,
    logging::logging_middleware,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_chart_data_endpoint, get_summary_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Requests that match no route are answered from `static_dir` if one is
/// given, otherwise with a 404 JSON error.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index))
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::VERIFY_EMAIL, post(post_verify_email));

    let protected_routes = Router::new()
        .route(
            endpoints::POST_TRANSACTION,
            post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTIONS, get(list_transactions_endpoint))
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::SUMMARY, get(get_summary_endpoint))
        .route(endpoints::POST_BUDGET, post(upsert_budget_endpoint))
        .route(endpoints::BUDGETS, get(list_budgets_endpoint))
        .route(endpoints::BUDGET_PROGRESS, get(get_budget_progress_endpoint))
        .route(endpoints::CHART_DATA, get(get_chart_data_endpoint))
        .route(
            endpoints::POST_INCOME_SOURCE,
            post(create_income_source_endpoint),
        )
        .route(endpoints::INCOME_SOURCES, get(list_income_sources_endpoint))
        .route(
            endpoints::INCOME_SOURCE,
            put(edit_income_source_endpoint).delete(delete_income_source_endpoint),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    let router = protected_routes.merge(unprotected_routes);

    let router = match static_dir {
        Some(static_dir) => router.fallback_service(
            ServeDir::new(static_dir).not_found_service(get_404_not_found.into_service()),
        ),
        None => router.fallback(get_404_not_found),
    };

    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Report that the server is up.
async fn get_index() -> Json<MessageResponse> {
    Json(MessageResponse::new("Server running"))
}
