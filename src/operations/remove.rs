use crate::db::repository;
use crate::error::{FinanceError, FinanceResult};
use rusqlite::Connection;
use tracing::info;

pub fn parse_transaction_id(input: &str) -> FinanceResult<i64> {
    let input = input.trim();
    if input.is_empty() {
        return Err(FinanceError::Validation("Transaction ID cannot be empty.".to_string()));
    }
    input.parse::<i64>().map_err(|_| {
        FinanceError::Validation(format!(
            "Invalid transaction ID '{}'. Please provide a whole number.",
            input
        ))
    })
}

pub fn remove_transaction_from_db(conn: &Connection, input: &str) -> FinanceResult<()> {
    let id = parse_transaction_id(input)?;
    repository::remove_transaction(conn, id)?;
    info!(id, "transaction removed");
    Ok(())
}
