//! Recording, listing and aggregating a user's income and expenses.

mod chart;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod list_endpoint;
mod query;
mod summary;

pub use chart::{CategoryTotal, get_chart_data_endpoint, get_expenses_by_category};
pub use core::{
    NewTransaction, Transaction, TransactionId, TransactionKind, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, map_transaction_row,
    update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use form::TransactionForm;
pub use list_endpoint::list_transactions_endpoint;
pub use query::{TransactionFilter, TransactionQuery, get_transactions};
pub use summary::{Summary, get_summary, get_summary_endpoint};
