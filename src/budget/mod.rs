//! Spending limits per category and progress against them.

mod core;
mod list_endpoint;
mod upsert_endpoint;

pub use core::{
    Budget, BudgetId, BudgetProgress, BudgetUpsert, create_budget_table, get_budget_progress,
    get_budgets, upsert_budget,
};
pub use list_endpoint::{get_budget_progress_endpoint, list_budgets_endpoint};
pub use upsert_endpoint::{BudgetForm, upsert_budget_endpoint};
