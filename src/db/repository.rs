use anyhow::Result;

use crate::models::{ForecastPoint, Sale};

/// Where recorded sales live.
pub(crate) trait SalesRepository {
    /// Every sale, newest first.
    fn list_sales(&self) -> Result<Vec<Sale>>;

    fn insert_sale(&mut self, sale: &Sale) -> Result<i64>;

    /// Append sales in one batch; returns how many were stored.
    fn insert_sales(&mut self, sales: &[Sale]) -> Result<usize>;

    /// Swap the whole data set for `sales`. Forecasts built from the old data
    /// are dropped in the same step.
    fn replace_sales(&mut self, sales: &[Sale]) -> Result<usize>;

    /// Remove all sales and the forecasts derived from them.
    fn clear_sales(&mut self) -> Result<()>;
}

/// Where the current forecast set lives.
///
/// Implementations must make `replace_forecasts` atomic: a reader sees either
/// the whole old set or the whole new one, never a mix.
pub(crate) trait ForecastRepository {
    /// The current forecast set, earliest month first.
    fn list_forecasts(&self) -> Result<Vec<ForecastPoint>>;

    /// Replace the current set, returning the stored points with ids assigned.
    fn replace_forecasts(&mut self, points: &[ForecastPoint]) -> Result<Vec<ForecastPoint>>;

    fn clear_forecasts(&mut self) -> Result<()>;
}
