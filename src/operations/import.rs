use super::add::add_checked_transaction;
use crate::db::category_repository;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{NewCategory, NewTransaction, Priority};
use crate::parse::{parse_amount, parse_date, parse_positive_amount};
use csv::StringRecord;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

/// Budget given to categories created on the fly during a transaction import.
pub const DEFAULT_NEW_CATEGORY_BUDGET: i64 = 200;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Create unknown categories instead of skipping their rows.
    pub create_missing_categories: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: Vec<SkippedRow>,
}

impl ImportSummary {
    /// Records a rejected row. Store and I/O failures abort the import instead.
    fn skip(&mut self, line: usize, err: FinanceError) -> FinanceResult<()> {
        if matches!(err, FinanceError::DataAccess(_) | FinanceError::Io(_)) {
            return Err(err);
        }
        warn!(line, %err, "skipping row");
        self.skipped.push(SkippedRow {
            line,
            reason: err.to_string(),
        });
        Ok(())
    }
}

/// Header-name lookup for a CSV file.
struct Columns {
    headers: StringRecord,
}

impl Columns {
    fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header.eq_ignore_ascii_case(name))
    }

    fn require(&self, name: &str) -> FinanceResult<usize> {
        self.position(name)
            .ok_or_else(|| FinanceError::Import(format!("Missing required column '{}'", name)))
    }
}

fn field(record: &StringRecord, index: Option<usize>) -> &str {
    index.and_then(|i| record.get(i)).unwrap_or("")
}

fn optional_id(value: &str) -> FinanceResult<Option<i64>> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| FinanceError::Validation(format!("Invalid id '{}'", value)))
}

fn open_csv(path: &Path) -> FinanceResult<(csv::Reader<File>, Columns)> {
    let file = File::open(path).map_err(|e| {
        FinanceError::Import(format!("Failed to open file '{}': {}", path.display(), e))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .has_headers(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| FinanceError::Import(format!("CSV header error: {}", e)))?
        .clone();

    Ok((reader, Columns { headers }))
}

/// Imports `category_id,category_name,monthly_budget,priority_level,icon` rows.
/// Rows with an id replace the category with that id.
pub fn import_categories_to_db(conn: &Connection, path: &Path) -> FinanceResult<ImportSummary> {
    let (mut reader, columns) = open_csv(path)?;
    let id_col = columns.position("category_id");
    let name_col = columns.require("category_name")?;
    let budget_col = columns.require("monthly_budget")?;
    let priority_col = columns.require("priority_level")?;
    let icon_col = columns.position("icon");

    let mut summary = ImportSummary::default();
    for (line_index, result) in reader.records().enumerate() {
        let line = line_index + 2;
        let row = result
            .map_err(|e| FinanceError::Validation(format!("CSV parse error: {}", e)))
            .and_then(|record| {
                let name = field(&record, Some(name_col));
                if name.is_empty() {
                    return Err(FinanceError::Validation("Category cannot be empty".to_string()));
                }
                let budget = parse_amount(field(&record, Some(budget_col)))?;
                if budget < Decimal::ZERO {
                    return Err(FinanceError::Validation("Budget cannot be negative".to_string()));
                }
                let priority: Priority = field(&record, Some(priority_col)).parse()?;
                Ok(NewCategory {
                    id: optional_id(field(&record, id_col))?,
                    ..NewCategory::new(name, budget, priority, field(&record, icon_col))
                })
            });

        match row.and_then(|category| category_repository::add_category(conn, &category)) {
            Ok(_) => summary.imported += 1,
            Err(err) => summary.skip(line, err)?,
        }
    }

    info!(
        path = %path.display(),
        imported = summary.imported,
        skipped = summary.skipped.len(),
        "categories imported"
    );
    Ok(summary)
}

/// Imports `transaction_id,date,amount,category,description,account_type,payment_method`
/// rows. `transaction_id` and the trailing text columns are optional. Rows that
/// fail validation are skipped and reported with their line number.
pub fn import_transactions_to_db(
    conn: &Connection,
    path: &Path,
    options: ImportOptions,
) -> FinanceResult<ImportSummary> {
    let (mut reader, columns) = open_csv(path)?;
    let id_col = columns.position("transaction_id");
    let date_col = columns.require("date")?;
    let amount_col = columns.require("amount")?;
    let category_col = columns.require("category")?;
    let description_col = columns.position("description");
    let account_col = columns.position("account_type");
    let payment_col = columns.position("payment_method");

    let mut summary = ImportSummary::default();
    for (line_index, result) in reader.records().enumerate() {
        let line = line_index + 2;
        let row = result
            .map_err(|e| FinanceError::Validation(format!("CSV parse error: {}", e)))
            .and_then(|record| {
                let transaction = NewTransaction {
                    id: optional_id(field(&record, id_col))?,
                    ..NewTransaction::new(
                        parse_date(field(&record, Some(date_col)))?,
                        parse_positive_amount(field(&record, Some(amount_col)))?,
                        field(&record, Some(category_col)).to_string(),
                        field(&record, description_col).to_string(),
                        field(&record, account_col).to_string(),
                        field(&record, payment_col).to_string(),
                    )
                };
                if transaction.category.is_empty() {
                    return Err(FinanceError::Validation("Category cannot be empty".to_string()));
                }
                Ok(transaction)
            });

        let stored = row.and_then(|transaction| {
            if options.create_missing_categories {
                ensure_category(conn, &transaction.category)?;
            }
            add_checked_transaction(conn, &transaction)
        });

        match stored {
            Ok(_) => summary.imported += 1,
            Err(err) => summary.skip(line, err)?,
        }
    }

    info!(
        path = %path.display(),
        imported = summary.imported,
        skipped = summary.skipped.len(),
        "transactions imported"
    );
    Ok(summary)
}

fn ensure_category(conn: &Connection, name: &str) -> FinanceResult<()> {
    if category_repository::category_exists(conn, name)? {
        return Ok(());
    }
    let category = NewCategory::new(
        name,
        Decimal::from(DEFAULT_NEW_CATEGORY_BUDGET),
        Priority::Medium,
        "default",
    );
    category_repository::add_category(conn, &category)?;
    info!(name, "created missing category");
    Ok(())
}
