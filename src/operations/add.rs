use crate::db::{category_repository, repository};
use crate::error::{FinanceError, FinanceResult};
use crate::models::NewTransaction;
use crate::parse::{parse_date, parse_positive_amount};
use rusqlite::Connection;
use tracing::info;

pub const MAX_DESCRIPTION_LEN: usize = 255;

/// Parses `date, amount, category, description, account_type, payment_method`.
pub fn create_transaction(input: &str) -> FinanceResult<NewTransaction> {
    let detail_parts: Vec<&str> = input.split(',').map(|s| s.trim()).collect();
    if detail_parts.len() != 6 {
        return Err(FinanceError::Validation(format!(
            "Invalid number of details provided. Expected 6 details separated by commas but got {}",
            detail_parts.len()
        )));
    }

    let date = parse_date(detail_parts[0])?;
    let amount = parse_positive_amount(detail_parts[1])?;

    let category = detail_parts[2].to_string();
    if category.is_empty() {
        return Err(FinanceError::Validation("Category cannot be empty".to_string()));
    }

    let description = detail_parts[3].to_string();
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(FinanceError::Validation("Description too long".to_string()));
    }

    Ok(NewTransaction::new(
        date,
        amount,
        category,
        description,
        detail_parts[4].to_string(),
        detail_parts[5].to_string(),
    ))
}

/// Inserts a transaction after checking that its category exists.
pub fn add_checked_transaction(conn: &Connection, transaction: &NewTransaction) -> FinanceResult<i64> {
    if !category_repository::category_exists(conn, &transaction.category)? {
        return Err(FinanceError::category_not_found(&transaction.category));
    }
    let id = repository::add_transaction(conn, transaction)?;
    info!(id, category = %transaction.category, amount = %transaction.amount, "transaction added");
    Ok(id)
}

pub fn add_transaction_to_db(conn: &Connection, input: &str) -> FinanceResult<i64> {
    let transaction = create_transaction(input)?;
    add_checked_transaction(conn, &transaction)
}
