use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::ForecastError;
use crate::models::{MonthKey, Sale};

/// Fewest transactions a forecast can be built from.
pub(crate) const MIN_TRANSACTIONS: usize = 2;

/// Monthly revenue totals in chronological order.
///
/// Only months with at least one sale have an entry; gaps are not zero-filled.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct MonthlySeries {
    totals: BTreeMap<MonthKey, Decimal>,
}

impl MonthlySeries {
    /// Build a series from `(month, amount)` pairs, summing repeated months.
    pub(crate) fn from_totals<I>(pairs: I) -> Result<Self, ForecastError>
    where
        I: IntoIterator<Item = (MonthKey, Decimal)>,
    {
        let mut totals = BTreeMap::new();
        for (key, amount) in pairs {
            let total = totals.entry(key).or_insert(Decimal::ZERO);
            *total = total.checked_add(amount).ok_or(ForecastError::Overflow)?;
        }
        Ok(Self { totals })
    }

    pub(crate) fn len(&self) -> usize {
        self.totals.len()
    }

    pub(crate) fn get(&self, key: &MonthKey) -> Option<Decimal> {
        self.totals.get(key).copied()
    }

    pub(crate) fn last(&self) -> Option<(MonthKey, Decimal)> {
        self.totals.last_key_value().map(|(k, v)| (*k, *v))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (MonthKey, Decimal)> + '_ {
        self.totals.iter().map(|(k, v)| (*k, *v))
    }

    /// Totals only, oldest first.
    pub(crate) fn values(&self) -> Vec<Decimal> {
        self.iter().map(|(_, total)| total).collect()
    }
}

/// Fold sales into per-month totals.
pub(crate) fn aggregate_monthly(sales: &[Sale]) -> Result<MonthlySeries, ForecastError> {
    if sales.len() < MIN_TRANSACTIONS {
        return Err(ForecastError::InsufficientData {
            unit: "transactions",
            found: sales.len(),
        });
    }
    let series = MonthlySeries::from_totals(sales.iter().map(|s| (s.month(), s.amount)))?;
    tracing::debug!(
        transactions = sales.len(),
        months = series.len(),
        "aggregated sales by month"
    );
    Ok(series)
}
