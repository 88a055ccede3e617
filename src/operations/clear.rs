use crate::db::repository;
use crate::error::{FinanceError, FinanceResult};
use crate::parse::parse_date;
use rusqlite::Connection;
use tracing::info;

/// Deletes transactions dated within `start..=end` and returns how many were removed.
pub fn clear_range_db(conn: &Connection, start: &str, end: &str) -> FinanceResult<usize> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    if start > end {
        return Err(FinanceError::Validation(
            "Start date must be before end date.".to_string(),
        ));
    }

    let deleted = repository::clear_transactions_in_range(conn, start, end)?;
    info!(%start, %end, deleted, "cleared transactions in range");
    Ok(deleted)
}

pub fn clear_all_db(conn: &Connection) -> FinanceResult<usize> {
    let deleted = repository::clear_all_transactions(conn)?;
    info!(deleted, "cleared all transactions");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{date, spend};
    use crate::db::connection::establish_test_connection;

    #[test]
    fn test_clear_range_db() {
        let conn = establish_test_connection().unwrap();
        spend(&conn, date(2025, 2, 28), "Food", "1");
        spend(&conn, date(2025, 3, 1), "Food", "1");
        spend(&conn, date(2025, 3, 31), "Food", "1");

        assert_eq!(clear_range_db(&conn, "2025-03-01", "2025-03-31").unwrap(), 2);
        assert_eq!(repository::get_all_transactions(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_clear_range_db_validates_dates() {
        let conn = establish_test_connection().unwrap();
        assert!(matches!(
            clear_range_db(&conn, "March", "2025-03-31"),
            Err(FinanceError::MalformedDate { .. })
        ));
        assert!(clear_range_db(&conn, "2025-04-01", "2025-03-31").unwrap_err().is_validation());
    }

    #[test]
    fn test_clear_all_db() {
        let conn = establish_test_connection().unwrap();
        spend(&conn, date(2025, 3, 1), "Food", "1");
        spend(&conn, date(2025, 3, 2), "Food", "1");

        assert_eq!(clear_all_db(&conn).unwrap(), 2);
        assert_eq!(clear_all_db(&conn).unwrap(), 0);
    }
}
