use rust_decimal::Decimal;

use super::{ForecastError, MonthlySeries};
use crate::models::MonthKey;

/// Trailing window used by the moving average.
pub(crate) const MOVING_AVERAGE_WINDOW: usize = 3;

/// Ordinary least-squares line through `(index, total)` points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LinearFit {
    pub(crate) slope: Decimal,
    pub(crate) intercept: Decimal,
}

impl LinearFit {
    /// Fit against `ys`, using 0..n as the x values.
    pub(crate) fn fit(ys: &[Decimal]) -> Result<Self, ForecastError> {
        if ys.is_empty() {
            return Err(ForecastError::DegenerateInput(
                "cannot fit a line to an empty series",
            ));
        }

        let n = Decimal::from(ys.len());
        let mut sum_x = Decimal::ZERO;
        let mut sum_y = Decimal::ZERO;
        let mut sum_xy = Decimal::ZERO;
        let mut sum_xx = Decimal::ZERO;
        for (i, y) in ys.iter().enumerate() {
            let x = Decimal::from(i);
            sum_x = add(sum_x, x)?;
            sum_y = add(sum_y, *y)?;
            sum_xy = add(sum_xy, mul(x, *y)?)?;
            sum_xx = add(sum_xx, mul(x, x)?)?;
        }

        let denominator = sub(mul(n, sum_xx)?, mul(sum_x, sum_x)?)?;
        if denominator.is_zero() {
            return Err(ForecastError::DegenerateInput(
                "linear regression needs at least two distinct months",
            ));
        }

        let slope = div(sub(mul(n, sum_xy)?, mul(sum_x, sum_y)?)?, denominator)?;
        let intercept = div(sub(sum_y, mul(slope, sum_x)?)?, n)?;
        Ok(Self { slope, intercept })
    }

    pub(crate) fn predict(&self, x: usize) -> Result<Decimal, ForecastError> {
        add(mul(self.slope, Decimal::from(x))?, self.intercept)
    }
}

fn add(a: Decimal, b: Decimal) -> Result<Decimal, ForecastError> {
    a.checked_add(b).ok_or(ForecastError::Overflow)
}

fn sub(a: Decimal, b: Decimal) -> Result<Decimal, ForecastError> {
    a.checked_sub(b).ok_or(ForecastError::Overflow)
}

fn mul(a: Decimal, b: Decimal) -> Result<Decimal, ForecastError> {
    a.checked_mul(b).ok_or(ForecastError::Overflow)
}

fn div(a: Decimal, b: Decimal) -> Result<Decimal, ForecastError> {
    a.checked_div(b).ok_or(ForecastError::Overflow)
}

pub(crate) fn regression(series: &MonthlySeries, horizon: u32) -> Result<Vec<Decimal>, ForecastError> {
    let ys = series.values();
    let line = LinearFit::fit(&ys)?;
    tracing::debug!(slope = %line.slope, intercept = %line.intercept, "fitted trend line");
    let last_index = ys.len() - 1;
    (1..=horizon as usize)
        .map(|step| line.predict(last_index + step))
        .collect()
}

/// Each step averages the trailing window and feeds the average back in,
/// so later steps are built partly from earlier predictions.
///
/// `series` must not be empty.
pub(crate) fn moving_average(series: &MonthlySeries, horizon: u32) -> Result<Vec<Decimal>, ForecastError> {
    let mut history = series.values();
    let mut out = Vec::with_capacity(horizon as usize);
    for _ in 0..horizon {
        let start = history.len().saturating_sub(MOVING_AVERAGE_WINDOW);
        let window = &history[start..];
        let total = window.iter().try_fold(Decimal::ZERO, |acc, v| add(acc, *v))?;
        let avg = div(total, Decimal::from(window.len()))?;
        history.push(avg);
        out.push(avg);
    }
    Ok(out)
}

/// Same month last year, else the latest observed month, else zero.
pub(crate) fn seasonal_naive(series: &MonthlySeries, last: MonthKey, horizon: u32) -> Vec<Decimal> {
    let latest = series.last().map(|(_, total)| total);
    (1..=horizon as i32)
        .map(|step| {
            let target = last.add_months(step);
            series
                .get(&target.prior_year())
                .or(latest)
                .unwrap_or(Decimal::ZERO)
        })
        .collect()
}
