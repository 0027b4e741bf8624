//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/transaction/{transaction_id}', use [format_endpoint].

/// The root route which reports that the server is running.
pub const ROOT: &str = "/";
/// The route for registering a new user.
pub const REGISTER: &str = "/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/login";
/// The route for verifying a user's email.
pub const VERIFY_EMAIL: &str = "/verify-email";
/// The route to create a transaction.
pub const POST_TRANSACTION: &str = "/transaction";
/// The route to list transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/transaction/{transaction_id}";
/// The route for the total income, expenses and balance.
pub const SUMMARY: &str = "/summary";
/// The route to create or replace a budget.
pub const POST_BUDGET: &str = "/budget";
/// The route to list budgets.
pub const BUDGETS: &str = "/budgets";
/// The route for the spending against each budget.
pub const BUDGET_PROGRESS: &str = "/budget-progress";
/// The route for expense totals by category.
pub const CHART_DATA: &str = "/chart-data";
/// The route to create an income source.
pub const POST_INCOME_SOURCE: &str = "/income-source";
/// The route to list income sources.
pub const INCOME_SOURCES: &str = "/income-sources";
/// The route to update or delete a single income source.
pub const INCOME_SOURCE: &str = "/income-source/{income_source_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/transaction/{transaction_id}', '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
