//! Date expression resolution and calendar arithmetic.
//!
//! A report range is given as two free-form expressions, each one of three
//! shapes: `Day-Month-Year` (an exact day), `Month-Year` (a whole month), or
//! `Year` (a whole year). Each expression resolves to an inclusive
//! first/last-day interval; the effective query range is the first day of
//! the start expression and the last day of the end expression, always at
//! day granularity.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{Result, SalesInsightError};

/// Separator between date components.
pub const SEPARATOR: char = '-';

/// Years outside this window are rejected as implausible.
const YEAR_MIN: i32 = 1000;
const YEAR_MAX: i32 = 9999;

/// A parsed date expression. The shape is decided once, by [`DateExpression::parse`],
/// rather than re-sniffed from the raw string at every use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateExpression {
    /// An exact calendar day.
    ExactDay(NaiveDate),
    /// A full calendar month.
    MonthYear { year: i32, month: u32 },
    /// A full calendar year.
    YearOnly(i32),
}

/// The inclusive span of calendar days denoted by one expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedInterval {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

/// The inclusive day range used to filter the sales ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateExpression {
    /// Parses a raw expression using a strict grammar keyed on the number of
    /// `-` separators: two means Day-Month-Year, one means Month-Year, none
    /// means Year. Anything else is malformed; no clamping or correction is
    /// attempted.
    pub fn parse(input: &str) -> Result<Self> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(malformed(input, "empty expression"));
        }

        match raw.matches(SEPARATOR).count() {
            2 => {
                let mut fields = raw.split(SEPARATOR);
                let day = parse_component::<u32>(input, fields.next(), "day")?;
                let month = parse_component::<u32>(input, fields.next(), "month")?;
                let year = parse_year(input, fields.next())?;
                let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
                    malformed(
                        input,
                        format!("{day:02}-{month:02}-{year} is not a real calendar date"),
                    )
                })?;
                Ok(Self::ExactDay(date))
            }
            1 => {
                let mut fields = raw.split(SEPARATOR);
                let month = parse_component::<u32>(input, fields.next(), "month")?;
                let year = parse_year(input, fields.next())?;
                // Synthetic day 1 validates the year/month pair.
                if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
                    return Err(malformed(input, format!("month {month} is out of range")));
                }
                Ok(Self::MonthYear { year, month })
            }
            0 => {
                let year = parse_year(input, Some(raw))?;
                Ok(Self::YearOnly(year))
            }
            n => Err(malformed(
                input,
                format!("expected at most 2 '{SEPARATOR}' separators, found {n}"),
            )),
        }
    }

    /// The inclusive first/last-day interval denoted by this expression.
    pub fn resolve(self) -> ResolvedInterval {
        match self {
            Self::ExactDay(date) => ResolvedInterval {
                first_day: date,
                last_day: date,
            },
            Self::MonthYear { year, month } => ResolvedInterval {
                first_day: first_day_of_month(year, month),
                last_day: last_day_of_month(year, month),
            },
            Self::YearOnly(year) => ResolvedInterval {
                first_day: first_day_of_month(year, 1),
                last_day: last_day_of_month(year, 12),
            },
        }
    }
}

/// Parses one expression and resolves it to its inclusive interval.
pub fn resolve_single(expr: &str) -> Result<ResolvedInterval> {
    Ok(DateExpression::parse(expr)?.resolve())
}

/// Resolves both expressions independently and combines them into the
/// effective query range: first day of the start, last day of the end.
///
/// A Year input always collapses to its boundary days, never to a mid-year
/// date. Reversed bounds are rejected rather than silently producing an
/// inverted filter downstream.
pub fn resolve_range(start_expr: &str, end_expr: &str) -> Result<EffectiveRange> {
    let start = resolve_single(start_expr)?;
    let end = resolve_single(end_expr)?;

    let range = EffectiveRange {
        start: start.first_day,
        end: end.last_day,
    };

    if range.start > range.end {
        return Err(SalesInsightError::ReversedRange {
            start: range.start,
            end: range.end,
        });
    }

    Ok(range)
}

fn malformed(input: &str, details: impl Into<String>) -> SalesInsightError {
    SalesInsightError::MalformedDate {
        input: input.trim().to_string(),
        details: details.into(),
    }
}

fn parse_component<T: std::str::FromStr>(
    input: &str,
    field: Option<&str>,
    what: &str,
) -> Result<T> {
    let field = field.unwrap_or_default().trim();
    field
        .parse()
        .map_err(|_| malformed(input, format!("'{field}' is not a valid {what}")))
}

fn parse_year(input: &str, field: Option<&str>) -> Result<i32> {
    let year: i32 = parse_component(input, field, "year")?;
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(malformed(input, format!("year {year} is not plausible")));
    }
    Ok(year)
}

/// First calendar day of the given month. The month must be in 1..=12.
pub fn first_day_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

/// Last calendar day of the given month, leap years included.
pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .checked_sub_days(Days::new(1))
        .unwrap()
}

/// Collapses any date to its month bucket (the first day of its month).
pub fn month_bucket(date: NaiveDate) -> NaiveDate {
    first_day_of_month(date.year(), date.month())
}

/// First day of the month `offset` months after `date`'s month.
pub fn add_months(date: NaiveDate, offset: u32) -> NaiveDate {
    let zero_based = date.month0() + offset;
    let year = date.year() + (zero_based / 12) as i32;
    let month = zero_based % 12 + 1;
    first_day_of_month(year, month)
}

/// Whole-month distance between the months of two dates.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let year_diff = end.year() - start.year();
    let month_diff = end.month() as i32 - start.month() as i32;
    year_diff * 12 + month_diff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_exact_day_resolves_to_itself() {
        let interval = resolve_single("15-03-2023").unwrap();
        assert_eq!(interval.first_day, date(2023, 3, 15));
        assert_eq!(interval.last_day, date(2023, 3, 15));
    }

    #[test]
    fn test_month_year_resolves_to_month_boundaries() {
        let interval = resolve_single("04-2023").unwrap();
        assert_eq!(interval.first_day, date(2023, 4, 1));
        assert_eq!(interval.last_day, date(2023, 4, 30));

        let interval = resolve_single("12-2023").unwrap();
        assert_eq!(interval.first_day, date(2023, 12, 1));
        assert_eq!(interval.last_day, date(2023, 12, 31));
    }

    #[test]
    fn test_february_honours_leap_years() {
        let interval = resolve_single("02-2024").unwrap();
        assert_eq!(interval.last_day, date(2024, 2, 29));

        let interval = resolve_single("02-2023").unwrap();
        assert_eq!(interval.last_day, date(2023, 2, 28));
    }

    #[test]
    fn test_year_resolves_to_year_boundaries() {
        let interval = resolve_single("2023").unwrap();
        assert_eq!(interval.first_day, date(2023, 1, 1));
        assert_eq!(interval.last_day, date(2023, 12, 31));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let first = resolve_single("06-2024").unwrap();
        let second = resolve_single("06-2024").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let interval = resolve_single("  2023 ").unwrap();
        assert_eq!(interval.first_day, date(2023, 1, 1));
    }

    #[test]
    fn test_impossible_day_is_malformed() {
        // April has 30 days.
        let err = resolve_single("31-04-2023").unwrap_err();
        assert!(matches!(err, SalesInsightError::MalformedDate { .. }));
    }

    #[test]
    fn test_malformed_inputs_are_rejected() {
        for input in [
            "",
            "abc",
            "13-2023",
            "00-2023",
            "32-01-2023",
            "29-02-2023",
            "15-00-2023",
            "1-2-3-4",
            "15-03-20x3",
            "-2023",
            "99",
        ] {
            let err = resolve_single(input).unwrap_err();
            assert!(
                matches!(err, SalesInsightError::MalformedDate { .. }),
                "expected MalformedDate for {input:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_produces_tagged_variants() {
        assert_eq!(
            DateExpression::parse("01-01-2023").unwrap(),
            DateExpression::ExactDay(date(2023, 1, 1))
        );
        assert_eq!(
            DateExpression::parse("06-2024").unwrap(),
            DateExpression::MonthYear {
                year: 2024,
                month: 6
            }
        );
        assert_eq!(
            DateExpression::parse("2023").unwrap(),
            DateExpression::YearOnly(2023)
        );
    }

    #[test]
    fn test_range_mixes_precisions_at_day_granularity() {
        let range = resolve_range("01-01-2023", "06-2024").unwrap();
        assert_eq!(range.start, date(2023, 1, 1));
        assert_eq!(range.end, date(2024, 6, 30));
    }

    #[test]
    fn test_range_from_single_year() {
        let range = resolve_range("2023", "2023").unwrap();
        assert_eq!(range.start, date(2023, 1, 1));
        assert_eq!(range.end, date(2023, 12, 31));
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let err = resolve_range("2024", "2023").unwrap_err();
        assert!(matches!(err, SalesInsightError::ReversedRange { .. }));
    }

    #[test]
    fn test_malformed_side_aborts_the_range() {
        assert!(resolve_range("31-04-2023", "2023").is_err());
        assert!(resolve_range("2023", "never").is_err());
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2023, 2), date(2023, 2, 28));
        assert_eq!(last_day_of_month(2024, 2), date(2024, 2, 29));
        assert_eq!(last_day_of_month(2023, 4), date(2023, 4, 30));
        assert_eq!(last_day_of_month(2023, 12), date(2023, 12, 31));
    }

    #[test]
    fn test_month_bucket() {
        assert_eq!(month_bucket(date(2023, 7, 19)), date(2023, 7, 1));
        assert_eq!(month_bucket(date(2023, 7, 1)), date(2023, 7, 1));
    }

    #[test]
    fn test_add_months_crosses_year_boundaries() {
        assert_eq!(add_months(date(2023, 11, 15), 3), date(2024, 2, 1));
        assert_eq!(add_months(date(2023, 1, 1), 0), date(2023, 1, 1));
        assert_eq!(add_months(date(2023, 12, 31), 1), date(2024, 1, 1));
    }

    #[test]
    fn test_months_between() {
        assert_eq!(months_between(date(2023, 1, 1), date(2023, 12, 1)), 11);
        assert_eq!(months_between(date(2023, 6, 1), date(2024, 6, 1)), 12);
        assert_eq!(months_between(date(2023, 6, 1), date(2023, 6, 30)), 0);
    }
}
