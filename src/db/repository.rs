use crate::error::{FinanceError, FinanceResult};
use crate::models::{DateRange, NewTransaction, Transaction};
use crate::parse::{parse_amount, parse_date};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

const TRANSACTION_COLUMNS: &str =
    "transaction_id, date, amount, category, description, account_type, payment_method";

/// Transaction columns as stored, before decoding.
struct TransactionRow {
    id: i64,
    date: String,
    amount: String,
    category: String,
    description: String,
    account_type: String,
    payment_method: String,
}

impl TransactionRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            date: row.get(1)?,
            amount: row.get(2)?,
            category: row.get(3)?,
            description: row.get(4)?,
            account_type: row.get(5)?,
            payment_method: row.get(6)?,
        })
    }

    fn decode(self) -> FinanceResult<Transaction> {
        Ok(Transaction {
            id: self.id,
            date: parse_date(&self.date)?,
            amount: parse_amount(&self.amount)?,
            category: self.category,
            description: self.description,
            account_type: self.account_type,
            payment_method: self.payment_method,
        })
    }
}

/// Builds the `WHERE` clause and its parameters for an inclusive date window.
fn range_filter(range: DateRange) -> (String, Vec<String>) {
    let mut clauses = Vec::new();
    let mut params = Vec::new();
    if let Some(start) = range.start {
        clauses.push("date >= ?");
        params.push(start.to_string());
    }
    if let Some(end) = range.end {
        clauses.push("date <= ?");
        params.push(end.to_string());
    }
    if clauses.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), params)
    }
}

fn query_transactions(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> FinanceResult<Vec<Transaction>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(FinanceError::db("Failed to prepare statement"))?;

    let iter = stmt
        .query_map(params, TransactionRow::read)
        .map_err(FinanceError::db("Failed to query transactions"))?;

    let mut transactions = Vec::new();
    for raw in iter {
        let raw = raw.map_err(FinanceError::db("Failed to read transaction"))?;
        transactions.push(raw.decode()?);
    }
    Ok(transactions)
}

/// Inserts a transaction and returns its id. A transaction carrying an
/// explicit id replaces the row with that id.
pub fn add_transaction(conn: &Connection, transaction: &NewTransaction) -> FinanceResult<i64> {
    conn.execute(
        "INSERT OR REPLACE INTO transactions (transaction_id, date, amount, category, description, account_type, payment_method) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            transaction.id,
            transaction.date.to_string(),
            transaction.amount.to_string(),
            &transaction.category,
            &transaction.description,
            &transaction.account_type,
            &transaction.payment_method,
        ],
    )
    .map_err(FinanceError::db("Failed to insert transaction"))?;

    Ok(transaction.id.unwrap_or_else(|| conn.last_insert_rowid()))
}

pub fn get_transaction(conn: &Connection, id: i64) -> FinanceResult<Option<Transaction>> {
    let raw = conn
        .query_row(
            &format!("SELECT {} FROM transactions WHERE transaction_id = ?1", TRANSACTION_COLUMNS),
            [id],
            TransactionRow::read,
        )
        .optional()
        .map_err(FinanceError::db("Failed to query transaction"))?;

    raw.map(TransactionRow::decode).transpose()
}

pub fn update_transaction(conn: &Connection, transaction: &Transaction) -> FinanceResult<()> {
    let rows = conn
        .execute(
            "UPDATE transactions SET date = ?1, amount = ?2, category = ?3, description = ?4, account_type = ?5, payment_method = ?6 WHERE transaction_id = ?7",
            rusqlite::params![
                transaction.date.to_string(),
                transaction.amount.to_string(),
                &transaction.category,
                &transaction.description,
                &transaction.account_type,
                &transaction.payment_method,
                transaction.id,
            ],
        )
        .map_err(FinanceError::db("Failed to update transaction"))?;

    if rows == 0 {
        return Err(FinanceError::transaction_not_found(transaction.id));
    }
    Ok(())
}

pub fn remove_transaction(conn: &Connection, id: i64) -> FinanceResult<()> {
    let rows_affected = conn
        .execute("DELETE FROM transactions WHERE transaction_id = ?1", [id])
        .map_err(FinanceError::db("Failed to delete transaction"))?;

    if rows_affected == 0 {
        return Err(FinanceError::transaction_not_found(id));
    }

    Ok(())
}

pub fn get_all_transactions(conn: &Connection) -> FinanceResult<Vec<Transaction>> {
    query_transactions(
        conn,
        &format!(
            "SELECT {} FROM transactions ORDER BY date DESC, transaction_id DESC",
            TRANSACTION_COLUMNS
        ),
        [],
    )
}

pub fn get_recent_transactions(conn: &Connection, limit: usize) -> FinanceResult<Vec<Transaction>> {
    query_transactions(
        conn,
        &format!(
            "SELECT {} FROM transactions ORDER BY date DESC, transaction_id DESC LIMIT ?1",
            TRANSACTION_COLUMNS
        ),
        [limit as i64],
    )
}

pub fn search_by_category(conn: &Connection, category: &str) -> FinanceResult<Vec<Transaction>> {
    query_transactions(
        conn,
        &format!(
            "SELECT {} FROM transactions WHERE LOWER(category) = LOWER(?1) ORDER BY date DESC",
            TRANSACTION_COLUMNS
        ),
        [category],
    )
}

pub fn get_transactions_in_range(conn: &Connection, range: DateRange) -> FinanceResult<Vec<Transaction>> {
    let (filter, params) = range_filter(range);
    query_transactions(
        conn,
        &format!(
            "SELECT {} FROM transactions{} ORDER BY date ASC",
            TRANSACTION_COLUMNS, filter
        ),
        rusqlite::params_from_iter(params),
    )
}

/// Sums amounts per category inside `range`, largest total first. Categories
/// without matching rows are absent. Every summed row must carry a valid
/// date and amount, otherwise the whole sum fails.
pub fn sum_amounts_by_category(conn: &Connection, range: DateRange) -> FinanceResult<Vec<(String, Decimal)>> {
    let (filter, params) = range_filter(range);
    let mut stmt = conn
        .prepare(&format!("SELECT category, date, amount FROM transactions{}", filter))
        .map_err(FinanceError::db("Failed to prepare statement"))?;

    let iter = stmt
        .query_map(rusqlite::params_from_iter(params), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(FinanceError::db("Failed to query spending"))?;

    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for row in iter {
        let (category, date, amount) = row.map_err(FinanceError::db("Failed to read spending"))?;
        parse_date(&date)?;
        *totals.entry(category).or_insert(Decimal::ZERO) += parse_amount(&amount)?;
    }

    let mut sums: Vec<(String, Decimal)> = totals
        .into_iter()
        .filter(|(_, total)| !total.is_zero())
        .collect();
    sums.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    debug!(?range, categories = sums.len(), "summed spending by category");
    Ok(sums)
}

/// Earliest and latest transaction dates, `None` when there are no transactions.
pub fn transaction_date_bounds(conn: &Connection) -> FinanceResult<Option<(NaiveDate, NaiveDate)>> {
    let (min, max): (Option<String>, Option<String>) = conn
        .query_row("SELECT MIN(date), MAX(date) FROM transactions", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .map_err(FinanceError::db("Failed to query date range"))?;

    match (min, max) {
        (Some(min), Some(max)) => Ok(Some((parse_date(&min)?, parse_date(&max)?))),
        _ => Ok(None),
    }
}

fn distinct_column(conn: &Connection, column: &str) -> FinanceResult<Vec<String>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT DISTINCT {0} FROM transactions WHERE {0} <> '' ORDER BY {0}",
            column
        ))
        .map_err(FinanceError::db("Failed to prepare statement"))?;

    let iter = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(FinanceError::db("Failed to query transactions"))?;

    let mut values = Vec::new();
    for value in iter {
        values.push(value.map_err(FinanceError::db("Failed to read transaction"))?);
    }
    Ok(values)
}

pub fn distinct_account_types(conn: &Connection) -> FinanceResult<Vec<String>> {
    distinct_column(conn, "account_type")
}

pub fn distinct_payment_methods(conn: &Connection) -> FinanceResult<Vec<String>> {
    distinct_column(conn, "payment_method")
}

pub fn count_transactions(conn: &Connection) -> FinanceResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))
        .map_err(FinanceError::db("Failed to count transactions"))?;
    Ok(count as usize)
}

pub fn clear_transactions_in_range(conn: &Connection, start: NaiveDate, end: NaiveDate) -> FinanceResult<usize> {
    conn.execute(
        "DELETE FROM transactions WHERE date >= ?1 AND date <= ?2",
        [start.to_string(), end.to_string()],
    )
    .map_err(FinanceError::db("Failed to clear transactions"))
}

pub fn clear_all_transactions(conn: &Connection) -> FinanceResult<usize> {
    conn.execute("DELETE FROM transactions", [])
        .map_err(FinanceError::db("Failed to clear transactions"))
}
