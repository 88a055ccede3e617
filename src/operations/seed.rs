use super::import::{ImportOptions, import_categories_to_db, import_transactions_to_db};
use crate::db::{category_repository, repository};
use crate::error::FinanceResult;
use std::path::Path;
use tracing::info;

pub const CATEGORIES_FILE: &str = "categories.csv";
pub const TRANSACTIONS_FILE: &str = "transactions.csv";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedReport {
    pub categories_imported: usize,
    pub default_categories: usize,
    pub transactions_imported: usize,
}

/// Fills empty tables on first start: categories from `categories.csv` (or the
/// built-in defaults), then transactions from `transactions.csv`.
pub fn seed_if_empty(conn: &rusqlite::Connection, data_dir: &Path) -> FinanceResult<SeedReport> {
    let mut report = SeedReport::default();

    if category_repository::count_categories(conn)? == 0 {
        let categories_file = data_dir.join(CATEGORIES_FILE);
        if categories_file.exists() {
            report.categories_imported = import_categories_to_db(conn, &categories_file)?.imported;
        }
        if category_repository::count_categories(conn)? == 0 {
            report.default_categories = category_repository::insert_default_categories(conn)?;
            info!(count = report.default_categories, "added default categories");
        }
    }

    let transactions_file = data_dir.join(TRANSACTIONS_FILE);
    if repository::count_transactions(conn)? == 0 && transactions_file.exists() {
        let options = ImportOptions {
            create_missing_categories: true,
        };
        report.transactions_imported =
            import_transactions_to_db(conn, &transactions_file, options)?.imported;
    }

    Ok(report)
}
