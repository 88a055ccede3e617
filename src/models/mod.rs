pub mod category;
pub mod date_range;
pub mod transaction;
pub mod usage;

pub use category::{Category, NewCategory, Priority};
pub use date_range::DateRange;
pub use transaction::{NewTransaction, Transaction};
pub use usage::{BudgetUsageRecord, TrendPoint};
