use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use super::ColumnMap;
use crate::models::Sale;

pub(crate) const DEFAULT_CATEGORY: &str = "General";
pub(crate) const DEFAULT_REGION: &str = "Default";

/// Rows turned into sales, plus how many were dropped.
#[derive(Debug, Default)]
pub(crate) struct ParsedSales {
    pub(crate) sales: Vec<Sale>,
    pub(crate) skipped: usize,
}

pub(crate) struct CsvImporter;

impl CsvImporter {
    /// Read the CSV; the first record is the header row.
    pub(crate) fn read(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

        let mut all_rows: Vec<Vec<String>> = Vec::new();
        for result in rdr.records() {
            let record = result.context("Failed to read CSV record")?;
            if record.iter().all(|f| f.is_empty()) {
                continue;
            }
            all_rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        if all_rows.is_empty() {
            anyhow::bail!("CSV file is empty");
        }
        let headers = all_rows.remove(0);
        Ok((headers, all_rows))
    }

    /// Turn rows into sales. Rows without a usable date or amount are skipped.
    pub(crate) fn parse(rows: &[Vec<String>], columns: &ColumnMap) -> ParsedSales {
        let mut out = ParsedSales::default();

        for (i, row) in rows.iter().enumerate() {
            let cell = |idx: usize| row.get(idx).map(|s| s.trim()).unwrap_or("");

            let date = parse_date(cell(columns.date));
            let amount = parse_amount(cell(columns.amount));
            let (Some(date), Some(amount)) = (date, amount) else {
                tracing::debug!(row = i + 2, "skipping row without date or amount");
                out.skipped += 1;
                continue;
            };

            let text_or = |idx: Option<usize>, fallback: &str| {
                idx.map(cell)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(fallback)
                    .to_string()
            };

            out.sales.push(Sale::new(
                date,
                amount,
                text_or(columns.category, DEFAULT_CATEGORY),
                text_or(columns.region, DEFAULT_REGION),
            ));
        }

        out
    }
}

/// Accepts year-first or day-first dates separated by `-` or `/`,
/// plus full timestamps.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    let parts: Vec<&str> = s.split(['-', '/']).collect();
    let [a, b, c] = parts.as_slice() else {
        return None;
    };
    let (year, month, day) = if a.len() == 4 { (a, b, c) } else { (c, b, a) };
    let date = NaiveDate::from_ymd_opt(
        year.parse().ok()?,
        month.parse().ok()?,
        day.parse().ok()?,
    )?;
    date.and_hms_opt(0, 0, 0)
}

/// Keep only digits and the decimal point, so "₹1,234.50" and "$99" both parse.
pub(crate) fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
