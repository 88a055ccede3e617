use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub account_type: String,
    pub payment_method: String,
}

/// A transaction not yet persisted. `id` is assigned by the store unless given.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub account_type: String,
    pub payment_method: String,
}

impl NewTransaction {
    pub fn new(
        date: NaiveDate,
        amount: Decimal,
        category: String,
        description: String,
        account_type: String,
        payment_method: String,
    ) -> Self {
        Self {
            id: None,
            date,
            amount,
            category,
            description,
            account_type,
            payment_method,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}
