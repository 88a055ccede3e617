use chrono::NaiveDate;

/// Inclusive date window. A missing bound means unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_between_sets_both_bounds() {
        let range = DateRange::between(date(2025, 1, 1), date(2025, 1, 31));
        assert_eq!(range.start, Some(date(2025, 1, 1)));
        assert_eq!(range.end, Some(date(2025, 1, 31)));
        assert!(!range.is_unbounded());
    }

    #[test]
    fn test_unbounded_has_no_bounds() {
        assert!(DateRange::unbounded().is_unbounded());
    }
}
