use crate::db::category_repository;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Category, NewCategory, Priority};
use crate::parse::parse_amount;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::info;

pub const MAX_CATEGORY_LEN: usize = 50;

fn parse_budget_amount(amount_str: &str) -> FinanceResult<Decimal> {
    parse_amount(amount_str).map_err(|_| {
        FinanceError::Validation(format!(
            "Invalid budget amount '{}'. Must be a valid number",
            amount_str.trim()
        ))
    })
}

fn current_budget(conn: &Connection, category: &str) -> FinanceResult<Decimal> {
    category_repository::get_category(conn, category)?
        .map(|c| c.monthly_budget)
        .ok_or_else(|| FinanceError::category_not_found(category))
}

fn non_empty(category: &str) -> FinanceResult<&str> {
    let category = category.trim();
    if category.is_empty() {
        return Err(FinanceError::Validation("Category cannot be empty".to_string()));
    }
    Ok(category)
}

pub fn set_budget_db(conn: &Connection, category: &str, amount_str: &str) -> FinanceResult<()> {
    let amount = parse_budget_amount(amount_str)?;
    let category = non_empty(category)?;
    if amount < Decimal::ZERO {
        return Err(FinanceError::Validation("Budget cannot be negative".to_string()));
    }
    category_repository::set_monthly_budget(conn, category, &amount)?;
    info!(category, %amount, "monthly budget set");
    Ok(())
}

pub fn increase_budget_db(conn: &Connection, category: &str, amount_str: &str) -> FinanceResult<()> {
    let delta = parse_budget_amount(amount_str)?;
    let category = non_empty(category)?;
    let new_amount = current_budget(conn, category)? + delta;
    if new_amount < Decimal::ZERO {
        return Err(FinanceError::Validation("Budget cannot be negative".to_string()));
    }
    category_repository::set_monthly_budget(conn, category, &new_amount)
}

pub fn decrease_budget_db(conn: &Connection, category: &str, amount_str: &str) -> FinanceResult<()> {
    let delta = parse_budget_amount(amount_str)?;
    let category = non_empty(category)?;
    let new_amount = current_budget(conn, category)? - delta;
    if new_amount < Decimal::ZERO {
        return Err(FinanceError::Validation("Budget cannot be negative".to_string()));
    }
    category_repository::set_monthly_budget(conn, category, &new_amount)
}

pub fn list_budgets_db(conn: &Connection) -> FinanceResult<Vec<Category>> {
    category_repository::get_all_categories(conn)
}

/// Parses `name, monthly_budget, priority[, icon]` and stores a new category.
pub fn add_category_db(conn: &Connection, input: &str) -> FinanceResult<i64> {
    let parts: Vec<&str> = input.split(',').map(|s| s.trim()).collect();
    if parts.len() < 3 || parts.len() > 4 {
        return Err(FinanceError::Validation(format!(
            "Invalid number of details provided. Expected name, budget, priority[, icon] but got {} fields",
            parts.len()
        )));
    }

    let name = non_empty(parts[0])?;
    if name.len() > MAX_CATEGORY_LEN {
        return Err(FinanceError::Validation("Category too long".to_string()));
    }
    let budget = parse_budget_amount(parts[1])?;
    if budget < Decimal::ZERO {
        return Err(FinanceError::Validation("Budget cannot be negative".to_string()));
    }
    let priority: Priority = parts[2].parse()?;
    let icon = parts.get(3).copied().unwrap_or("");

    let id = category_repository::add_category(conn, &NewCategory::new(name, budget, priority, icon))?;
    info!(id, name, %budget, "category added");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::category;
    use crate::db::connection::establish_test_connection;
    use std::str::FromStr;

    #[test]
    fn test_set_budget_success() {
        let conn = establish_test_connection().unwrap();
        category(&conn, "Food", "10");
        set_budget_db(&conn, "Food", "100.50").unwrap();

        let budgets = list_budgets_db(&conn).unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].monthly_budget, Decimal::from_str("100.50").unwrap());
    }

    #[test]
    fn test_set_budget_invalid_amount() {
        let conn = establish_test_connection().unwrap();
        category(&conn, "Food", "10");
        let result = set_budget_db(&conn, "Food", "not-a-number");
        assert!(result.unwrap_err().to_string().contains("Invalid budget amount"));
    }

    #[test]
    fn test_set_budget_empty_category() {
        let conn = establish_test_connection().unwrap();
        let result = set_budget_db(&conn, "", "100");
        assert_eq!(
            result.unwrap_err().to_string(),
            "Validation error: Category cannot be empty"
        );
    }

    #[test]
    fn test_set_budget_unknown_category() {
        let conn = establish_test_connection().unwrap();
        assert!(set_budget_db(&conn, "Travel", "25").unwrap_err().is_not_found());
    }

    #[test]
    fn test_increase_budget_existing() {
        let conn = establish_test_connection().unwrap();
        category(&conn, "Food", "10");

        increase_budget_db(&conn, "Food", "5.25").unwrap();

        let budgets = list_budgets_db(&conn).unwrap();
        assert_eq!(budgets[0].monthly_budget, Decimal::from_str("15.25").unwrap());
    }

    #[test]
    fn test_decrease_budget_success() {
        let conn = establish_test_connection().unwrap();
        category(&conn, "Food", "20");

        decrease_budget_db(&conn, "Food", "7.50").unwrap();

        let budgets = list_budgets_db(&conn).unwrap();
        assert_eq!(budgets[0].monthly_budget, Decimal::from_str("12.50").unwrap());
    }

    #[test]
    fn test_decrease_budget_negative_error() {
        let conn = establish_test_connection().unwrap();
        category(&conn, "Food", "5");

        let result = decrease_budget_db(&conn, "Food", "10");
        assert_eq!(
            result.unwrap_err().to_string(),
            "Validation error: Budget cannot be negative"
        );
    }

    #[test]
    fn test_add_category_db() {
        let conn = establish_test_connection().unwrap();
        add_category_db(&conn, "Pets, 75, low, paw").unwrap();
        add_category_db(&conn, "Travel, 0, High").unwrap();

        let budgets = list_budgets_db(&conn).unwrap();
        assert_eq!(budgets.len(), 2);
        assert_eq!(budgets[0].name, "Pets");
        assert_eq!(budgets[0].priority, Priority::Low);
        assert_eq!(budgets[0].icon, "paw");
        assert_eq!(budgets[1].icon, "");
    }

    #[test]
    fn test_add_category_db_rejects_bad_input() {
        let conn = establish_test_connection().unwrap();
        assert!(add_category_db(&conn, "Pets, 75").unwrap_err().is_validation());
        assert!(add_category_db(&conn, "Pets, -1, Low").unwrap_err().is_validation());
        assert!(add_category_db(&conn, "Pets, 10, Urgent").unwrap_err().is_validation());
        assert!(add_category_db(&conn, ", 10, Low").unwrap_err().is_validation());
    }
}
