use crate::db::repository;
use crate::error::{FinanceError, FinanceResult};
use crate::models::Transaction;
use rusqlite::Connection;

pub fn search_transactions_by_category_db(conn: &Connection, category: &str) -> FinanceResult<Vec<Transaction>> {
    let category = category.trim();
    if category.is_empty() {
        return Err(FinanceError::Validation("Category cannot be empty".to_string()));
    }
    repository::search_by_category(conn, category)
}
