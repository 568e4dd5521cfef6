use std::fmt;

use chrono::NaiveDate;

use crate::error::{LedgerError, Result};

/// A calendar month, or the whole lifetime of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    All,
    Month { year: i32, month: u32 },
}

impl Period {
    /// Validated month period. Months outside 1-12 are rejected, never wrapped.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        MonthRange::resolve(year, month)?;
        Ok(Period::Month { year, month })
    }

    /// Parse `YYYY-MM`. `None` means all time.
    pub fn parse(s: Option<&str>) -> Result<Self> {
        let Some(s) = s else {
            return Ok(Period::All);
        };
        let (y, m) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| LedgerError::Validation(format!("malformed month '{s}' (expected YYYY-MM)")))?;
        let year: i32 = y
            .parse()
            .map_err(|_| LedgerError::Validation(format!("malformed year in '{s}'")))?;
        let month: u32 = m
            .parse()
            .map_err(|_| LedgerError::Validation(format!("malformed month in '{s}'")))?;
        Period::month(year, month)
    }

    /// The half-open date range, or `None` for all time. A month built by
    /// hand with an out-of-range value is an error here too.
    pub fn range(&self) -> Result<Option<MonthRange>> {
        match *self {
            Period::All => Ok(None),
            Period::Month { year, month } => MonthRange::resolve(year, month).map(Some),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::All => f.write_str("all time"),
            Period::Month { year, month } => write!(f, "{year:04}-{month:02}"),
        }
    }
}

/// `[start, end)` covering exactly one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthRange {
    pub fn resolve(year: i32, month: u32) -> Result<Self> {
        let invalid = || LedgerError::InvalidPeriod { year, month };
        if !(1..=12).contains(&month) || !(1..=9998).contains(&year) {
            return Err(invalid());
        }
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(invalid)?;
        Ok(MonthRange { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_ranges_are_continuous_across_a_year() {
        for year in [2023, 2024, 2100] {
            for month in 1..=12u32 {
                let r = MonthRange::resolve(year, month).unwrap();
                let next = if month == 12 {
                    MonthRange::resolve(year + 1, 1).unwrap()
                } else {
                    MonthRange::resolve(year, month + 1).unwrap()
                };
                assert_eq!(r.end, next.start, "{year}-{month}");
            }
        }
    }

    #[test]
    fn test_december_rolls_over() {
        let r = MonthRange::resolve(2024, 12).unwrap();
        assert_eq!(r.start, d(2024, 12, 1));
        assert_eq!(r.end, d(2025, 1, 1));
    }

    #[test]
    fn test_range_includes_last_day_and_excludes_next_first() {
        let feb_leap = MonthRange::resolve(2024, 2).unwrap();
        let inside = |date: NaiveDate| feb_leap.start <= date && date < feb_leap.end;
        assert!(inside(d(2024, 2, 1)));
        assert!(inside(d(2024, 2, 29)));
        assert!(!inside(d(2024, 3, 1)));
        assert!(!inside(d(2024, 1, 31)));
    }

    #[test]
    fn test_hand_built_month_fails_to_resolve() {
        let bogus = Period::Month { year: 2024, month: 13 };
        assert!(matches!(
            bogus.range(),
            Err(LedgerError::InvalidPeriod { year: 2024, month: 13 })
        ));
        assert_eq!(Period::All.range().unwrap(), None);
    }

    #[test]
    fn test_month_out_of_range_is_rejected() {
        for bad in [0, 13, 24] {
            let err = Period::month(2024, bad).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidPeriod { month, .. } if month == bad));
        }
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(Period::parse(None).unwrap(), Period::All);
        assert_eq!(
            Period::parse(Some("2024-03")).unwrap(),
            Period::Month { year: 2024, month: 3 }
        );
        assert!(matches!(
            Period::parse(Some("2024-13")),
            Err(LedgerError::InvalidPeriod { .. })
        ));
        assert!(matches!(
            Period::parse(Some("March")),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Period::month(2024, 1).unwrap().to_string(), "2024-01");
        assert_eq!(Period::All.to_string(), "all time");
    }
}
