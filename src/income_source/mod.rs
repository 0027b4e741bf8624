//! Recurring sources of income.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod list_endpoint;

pub use core::{
    IncomeSource, IncomeSourceId, IncomeSourceUpdate, NewIncomeSource, create_income_source,
    create_income_source_table, delete_income_source, get_income_source, get_income_sources,
    update_income_source,
};
pub use create_endpoint::create_income_source_endpoint;
pub use delete_endpoint::delete_income_source_endpoint;
pub use edit_endpoint::edit_income_source_endpoint;
pub use form::{EditIncomeSourceForm, IncomeSourceForm};
pub use list_endpoint::list_income_sources_endpoint;
