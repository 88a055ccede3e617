use crate::error::{FinanceError, FinanceResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> FinanceResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| FinanceError::MalformedDate {
        value: value.to_string(),
    })
}

pub fn parse_amount(value: &str) -> FinanceResult<Decimal> {
    Decimal::from_str(value.trim()).map_err(|_| FinanceError::MalformedAmount {
        value: value.to_string(),
    })
}

/// Parses an amount that must be strictly positive (transaction amounts).
pub fn parse_positive_amount(value: &str) -> FinanceResult<Decimal> {
    let amount = parse_amount(value)?;
    if amount <= Decimal::ZERO {
        return Err(FinanceError::Validation(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_valid() {
        let date = parse_date(" 2024-02-29 ").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_impossible_day() {
        let result = parse_date("2025-02-29");
        assert!(matches!(result, Err(FinanceError::MalformedDate { .. })));
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(parse_date("15/01/2025").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_amount_kinds() {
        assert_eq!(parse_amount("45.67").unwrap(), Decimal::new(4567, 2));
        assert!(matches!(
            parse_amount("abc"),
            Err(FinanceError::MalformedAmount { .. })
        ));
    }

    #[test]
    fn test_parse_positive_amount_rejects_zero_and_negative() {
        assert!(parse_positive_amount("0").unwrap_err().is_validation());
        assert!(parse_positive_amount("-3.50").unwrap_err().is_validation());
        assert_eq!(parse_positive_amount("3.50").unwrap(), Decimal::new(350, 2));
    }
}
