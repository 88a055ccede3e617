use crate::error::{FinanceError, FinanceResult};
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS categories (
        category_id INTEGER PRIMARY KEY,
        category_name TEXT NOT NULL UNIQUE,
        monthly_budget TEXT NOT NULL,
        priority_level TEXT NOT NULL,
        icon TEXT NOT NULL DEFAULT ''
    );
    CREATE TABLE IF NOT EXISTS transactions (
        transaction_id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        account_type TEXT NOT NULL DEFAULT '',
        payment_method TEXT NOT NULL DEFAULT ''
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions (date);
";

pub fn establish_connection(path: &Path) -> FinanceResult<Connection> {
    let conn = Connection::open(path).map_err(FinanceError::db("Failed to open database"))?;
    create_schema(&conn)?;
    debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn create_schema(conn: &Connection) -> FinanceResult<()> {
    conn.execute_batch(SCHEMA)
        .map_err(FinanceError::db("Failed to create tables"))
}

#[cfg(test)]
pub fn establish_test_connection() -> FinanceResult<Connection> {
    let conn = Connection::open_in_memory().map_err(FinanceError::db("Failed to open database"))?;
    create_schema(&conn)?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = establish_test_connection().unwrap();
        assert!(create_schema(&conn).is_ok());
    }

    #[test]
    fn test_establish_connection_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tracker.db");

        let conn = establish_connection(&path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
            .unwrap();

        assert_eq!(count, 0);
        assert!(path.exists());
    }

    #[test]
    fn test_establish_connection_bad_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("tracker.db");

        let result = establish_connection(&path);
        assert!(matches!(result, Err(FinanceError::DataAccess(_))));
    }
}
