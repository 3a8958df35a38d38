use anyhow::Result;
use chrono::{Datelike, NaiveDate};

/// A calendar month used as an aggregation bucket.
///
/// Field order matters: the derived `Ord` compares year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    /// 1-based, 1..=12
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse "YYYY-MM".
    pub fn parse(s: &str) -> Result<Self> {
        let (y, m) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| anyhow::anyhow!("Invalid month '{s}', expected YYYY-MM"))?;
        let year: i32 = y
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid year in '{s}'"))?;
        let month: u32 = m
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid month in '{s}'"))?;
        Self::new(year, month).ok_or_else(|| anyhow::anyhow!("Month out of range in '{s}'"))
    }

    /// Shift by a number of months, carrying into the year.
    pub fn add_months(self, months: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + months;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Same calendar month, one year earlier.
    pub fn prior_year(self) -> Self {
        Self {
            year: self.year - 1,
            month: self.month,
        }
    }

    pub fn first_day(self) -> NaiveDate {
        // fields are private and every constructor keeps month in 1..=12
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
