use crate::error::FinanceError;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(FinanceError::Validation(format!(
                "Invalid priority '{}'. Use High, Medium or Low",
                other
            ))),
        }
    }
}

/// A budget category. `name` is unique across the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub monthly_budget: Decimal,
    pub priority: Priority,
    pub icon: String,
}

/// A category not yet persisted. With an explicit `id` the insert replaces
/// any existing row with that id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub id: Option<i64>,
    pub name: String,
    pub monthly_budget: Decimal,
    pub priority: Priority,
    pub icon: String,
}

impl NewCategory {
    pub fn new(name: &str, monthly_budget: Decimal, priority: Priority, icon: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            monthly_budget,
            priority,
            icon: icon.to_string(),
        }
    }
}
