//! Trip domain models: the trip aggregate, its expenses, and categories.

pub mod category;
pub mod expense;
#[allow(clippy::module_inception)]
pub mod trip;

pub use category::{Category, CategoryMap};
pub use expense::Expense;
pub use trip::{DateRange, Trip, CURRENT_SCHEMA_VERSION};
