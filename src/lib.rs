//! Budget and spending tracker backed by SQLite.
//!
//! [`analysis::FinanceTracker`] answers budget-usage and trend questions over
//! any [`db::FinanceStore`]; [`operations`] holds the validating entry points
//! used by the interactive binary.

pub mod analysis;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod operations;
pub mod parse;

pub use analysis::{FinanceTracker, Period};
pub use error::{FinanceError, FinanceResult};
