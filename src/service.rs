use anyhow::{Context, Result};

use crate::db::{ForecastRepository, SalesRepository};
use crate::forecast::{aggregate_monthly, generate_forecast};
use crate::models::{ForecastMethod, ForecastPoint, Sale};

/// Build a fresh forecast from everything in `store` and make it the current set.
///
/// Validation failures leave the stored forecasts untouched.
pub(crate) fn refresh_forecasts<S>(
    store: &mut S,
    horizon: u32,
    method: ForecastMethod,
) -> Result<Vec<ForecastPoint>>
where
    S: SalesRepository + ForecastRepository + ?Sized,
{
    let sales = store.list_sales().context("Failed to load sales")?;
    let series = aggregate_monthly(&sales)?;
    let points = generate_forecast(&series, horizon, method)?;
    let stored = store
        .replace_forecasts(&points)
        .context("Failed to store forecasts")?;
    tracing::info!(
        method = method.as_str(),
        horizon,
        months = series.len(),
        "forecast refreshed"
    );
    Ok(stored)
}

/// Store imported sales, either appended or as a replacement data set.
pub(crate) fn load_sales<S>(store: &mut S, sales: &[Sale], replace: bool) -> Result<usize>
where
    S: SalesRepository + ?Sized,
{
    let count = if replace {
        store.replace_sales(sales)?
    } else {
        store.insert_sales(sales)?
    };
    tracing::info!(count, replace, "loaded sales");
    Ok(count)
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
