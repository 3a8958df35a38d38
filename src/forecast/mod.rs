//! Monthly aggregation and revenue projection.
//!
//! Everything here is a pure function of its inputs. Callers fetch sales from
//! a store, hand them to [`aggregate_monthly`], then pass the series to
//! [`generate_forecast`] and persist the result themselves.

mod aggregate;
mod methods;

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;

use crate::models::{ForecastMethod, ForecastPoint};

pub(crate) use aggregate::{aggregate_monthly, MonthlySeries};
#[cfg(test)]
pub(crate) use methods::LinearFit;

pub(crate) const MIN_HORIZON: u32 = 1;
pub(crate) const MAX_HORIZON: u32 = 24;

/// Fewest distinct months any method will project from.
pub(crate) const MIN_MONTHS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    #[error("Horizon must be between 1 and 24 months, got {0}")]
    InvalidHorizon(u32),
    #[error("Unknown forecast method '{0}' (expected regression, moving_average or seasonal_naive)")]
    UnknownMethod(String),
    #[error("Not enough historical data to generate forecast (need at least 2 {unit}, found {found})")]
    InsufficientData { unit: &'static str, found: usize },
    #[error("Degenerate input: {0}")]
    DegenerateInput(&'static str),
    #[error("Sales amounts are too large to total")]
    Overflow,
}

impl FromStr for ForecastMethod {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ForecastMethod::parse(s).ok_or_else(|| ForecastError::UnknownMethod(s.to_string()))
    }
}

pub(crate) fn validate_horizon(horizon: u32) -> Result<u32, ForecastError> {
    if (MIN_HORIZON..=MAX_HORIZON).contains(&horizon) {
        Ok(horizon)
    } else {
        Err(ForecastError::InvalidHorizon(horizon))
    }
}

/// Project `horizon` months past the end of `series`.
///
/// Points are dated the first of each month following the last observed one,
/// clamped at zero and rounded to cents.
pub(crate) fn generate_forecast(
    series: &MonthlySeries,
    horizon: u32,
    method: ForecastMethod,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    let horizon = validate_horizon(horizon)?;
    let last = match series.last() {
        Some((month, _)) if series.len() >= MIN_MONTHS => month,
        _ => {
            return Err(ForecastError::InsufficientData {
                unit: "months",
                found: series.len(),
            })
        }
    };

    let predictions = match method {
        ForecastMethod::Regression => methods::regression(series, horizon)?,
        ForecastMethod::MovingAverage => methods::moving_average(series, horizon)?,
        ForecastMethod::SeasonalNaive => methods::seasonal_naive(series, last, horizon),
    };

    tracing::debug!(
        method = method.as_str(),
        horizon,
        months = series.len(),
        last = %last,
        "generated forecast"
    );

    Ok(predictions
        .into_iter()
        .zip(1..)
        .map(|(value, step)| {
            ForecastPoint::new(last.add_months(step).first_day(), to_cents(value), method)
        })
        .collect())
}

/// Clamp at zero and round half away from zero to two places.
fn to_cents(value: Decimal) -> Decimal {
    value
        .max(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests;
