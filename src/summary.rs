use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

use crate::models::{ForecastPoint, MonthKey, Sale};

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Summary {
    pub(crate) transaction_count: usize,
    pub(crate) total_revenue: Decimal,
    /// Month of the most recent sale.
    pub(crate) latest_month: Option<MonthKey>,
    pub(crate) latest_month_revenue: Decimal,
    /// Earliest point of the current forecast set.
    pub(crate) next_forecast: Option<ForecastPoint>,
    /// Highest revenue first.
    pub(crate) by_region: Vec<(String, Decimal)>,
    /// Highest revenue first.
    pub(crate) by_category: Vec<(String, Decimal)>,
}

impl Summary {
    pub(crate) fn build(sales: &[Sale], forecasts: &[ForecastPoint]) -> Self {
        let total_revenue = saturating_sum(sales.iter().map(|s| s.amount));
        let latest_month = sales.iter().map(|s| s.date).max().map(|d| MonthKey::of(&d));
        let latest_month_revenue = latest_month
            .map(|month| {
                saturating_sum(
                    sales
                        .iter()
                        .filter(|s| s.month() == month)
                        .map(|s| s.amount),
                )
            })
            .unwrap_or(Decimal::ZERO);
        let next_forecast = forecasts.iter().min_by_key(|p| p.forecast_date).cloned();

        Self {
            transaction_count: sales.len(),
            total_revenue,
            latest_month,
            latest_month_revenue,
            next_forecast,
            by_region: ranked(sales.iter().map(|s| (s.region.as_str(), s.amount))),
            by_category: ranked(sales.iter().map(|s| (s.category.as_str(), s.amount))),
        }
    }

    /// Percentage change from the latest month to the next forecast month,
    /// to one decimal place. `None` without a forecast or a zero base.
    pub(crate) fn projected_growth(&self) -> Option<Decimal> {
        let next = self.next_forecast.as_ref()?.predicted_amount;
        if self.latest_month_revenue.is_zero() {
            return None;
        }
        let pct = next
            .checked_sub(self.latest_month_revenue)?
            .checked_div(self.latest_month_revenue)?
            .checked_mul(Decimal::ONE_HUNDRED)?;
        Some(pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
    }
}

fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, |acc, a| acc.saturating_add(a))
}

fn ranked<'a, I>(pairs: I) -> Vec<(String, Decimal)>
where
    I: Iterator<Item = (&'a str, Decimal)>,
{
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for (name, amount) in pairs {
        let total = totals.entry(name).or_insert(Decimal::ZERO);
        *total = total.saturating_add(amount);
    }
    let mut out: Vec<(String, Decimal)> = totals
        .into_iter()
        .map(|(name, total)| (name.to_string(), total))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
