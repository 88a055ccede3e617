use rust_decimal::Decimal;

/// Spend against the period-scaled budget of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetUsageRecord {
    pub category: String,
    pub spent: Decimal,
    pub budget: Decimal,
    pub percentage: Decimal,
}

impl BudgetUsageRecord {
    /// Computes the percentage; a zero budget always yields 0.
    pub fn new(category: String, spent: Decimal, budget: Decimal) -> Self {
        let percentage = if budget > Decimal::ZERO {
            spent / budget * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
        Self {
            category,
            spent,
            budget,
            percentage,
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.percentage > Decimal::ONE_HUNDRED
    }

    /// Budget left in the period, negative when overspent.
    pub fn remaining(&self) -> Decimal {
        self.budget - self.spent
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    /// "Mon YYYY", e.g. "Mar 2025"
    pub month_label: String,
    pub total_spent: Decimal,
}
