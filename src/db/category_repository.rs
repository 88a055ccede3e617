use crate::error::{FinanceError, FinanceResult};
use crate::models::{Category, NewCategory, Priority};
use crate::parse::parse_amount;
use rusqlite::{Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

const CATEGORY_COLUMNS: &str = "category_id, category_name, monthly_budget, priority_level, icon";

/// Category columns as stored, before decoding.
struct CategoryRow {
    id: i64,
    name: String,
    monthly_budget: String,
    priority: String,
    icon: String,
}

impl CategoryRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            monthly_budget: row.get(2)?,
            priority: row.get(3)?,
            icon: row.get(4)?,
        })
    }

    fn decode(self) -> FinanceResult<Category> {
        Ok(Category {
            id: self.id,
            monthly_budget: parse_amount(&self.monthly_budget)?,
            priority: self.priority.parse::<Priority>()?,
            name: self.name,
            icon: self.icon,
        })
    }
}

/// Inserts a category and returns its id. A category carrying an explicit id
/// replaces the row with that id.
pub fn add_category(conn: &Connection, category: &NewCategory) -> FinanceResult<i64> {
    let budget = category.monthly_budget.to_string();
    match category.id {
        Some(id) => {
            conn.execute(
                "INSERT OR REPLACE INTO categories (category_id, category_name, monthly_budget, priority_level, icon) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, &category.name, budget, category.priority.as_str(), &category.icon],
            )
            .map_err(FinanceError::db("Failed to insert category"))?;
            Ok(id)
        }
        None => {
            conn.execute(
                "INSERT INTO categories (category_name, monthly_budget, priority_level, icon) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![&category.name, budget, category.priority.as_str(), &category.icon],
            )
            .map_err(FinanceError::db("Failed to insert category"))?;
            Ok(conn.last_insert_rowid())
        }
    }
}

pub fn get_category(conn: &Connection, name: &str) -> FinanceResult<Option<Category>> {
    let raw = conn
        .query_row(
            &format!("SELECT {} FROM categories WHERE category_name = ?1", CATEGORY_COLUMNS),
            [name],
            CategoryRow::read,
        )
        .optional()
        .map_err(FinanceError::db("Failed to query category"))?;

    raw.map(CategoryRow::decode).transpose()
}

pub fn category_exists(conn: &Connection, name: &str) -> FinanceResult<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE category_name = ?1)",
        [name],
        |row| row.get(0),
    )
    .map_err(FinanceError::db("Failed to query category"))
}

pub fn get_all_categories(conn: &Connection) -> FinanceResult<Vec<Category>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {} FROM categories ORDER BY category_name ASC", CATEGORY_COLUMNS))
        .map_err(FinanceError::db("Failed to prepare statement"))?;

    let iter = stmt
        .query_map([], CategoryRow::read)
        .map_err(FinanceError::db("Failed to query categories"))?;

    let mut categories = Vec::new();
    for raw in iter {
        let raw = raw.map_err(FinanceError::db("Failed to read category"))?;
        categories.push(raw.decode()?);
    }
    Ok(categories)
}

pub fn count_categories(conn: &Connection) -> FinanceResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
        .map_err(FinanceError::db("Failed to count categories"))?;
    Ok(count as usize)
}

pub fn set_monthly_budget(conn: &Connection, name: &str, amount: &Decimal) -> FinanceResult<()> {
    let rows = conn
        .execute(
            "UPDATE categories SET monthly_budget = ?1 WHERE category_name = ?2",
            [amount.to_string().as_str(), name],
        )
        .map_err(FinanceError::db("Failed to update budget"))?;

    if rows == 0 {
        return Err(FinanceError::category_not_found(name));
    }
    Ok(())
}

/// The starter set used when a fresh store has no categories.
pub fn default_categories() -> Vec<NewCategory> {
    [
        (1, "Groceries", 500, Priority::High, "grocery"),
        (2, "Dining", 300, Priority::Medium, "food"),
        (3, "Entertainment", 200, Priority::Low, "movie"),
        (4, "Utilities", 350, Priority::High, "utility"),
        (5, "Transportation", 250, Priority::Medium, "car"),
        (6, "Shopping", 200, Priority::Low, "cart"),
        (7, "Housing", 1000, Priority::High, "home"),
        (8, "Healthcare", 200, Priority::High, "medical"),
        (9, "Education", 100, Priority::Medium, "book"),
        (10, "Personal Care", 100, Priority::Low, "personal"),
    ]
    .into_iter()
    .map(|(id, name, budget, priority, icon)| NewCategory {
        id: Some(id),
        ..NewCategory::new(name, Decimal::from(budget), priority, icon)
    })
    .collect()
}

pub fn insert_default_categories(conn: &Connection) -> FinanceResult<usize> {
    let defaults = default_categories();
    for category in &defaults {
        add_category(conn, category)?;
    }
    Ok(defaults.len())
}
