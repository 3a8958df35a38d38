use anyhow::Result;

use super::{ForecastRepository, SalesRepository};
use crate::models::{ForecastPoint, Sale};

/// Volatile store backed by plain vectors. Nothing survives the process.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    sales: Vec<Sale>,
    forecasts: Vec<ForecastPoint>,
    next_sale_id: i64,
    next_forecast_id: i64,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self {
            next_sale_id: 1,
            next_forecast_id: 1,
            ..Self::default()
        }
    }

    fn push_sale(&mut self, sale: &Sale) -> i64 {
        let id = self.next_sale_id;
        self.next_sale_id += 1;
        self.sales.push(Sale {
            id: Some(id),
            ..sale.clone()
        });
        id
    }
}

impl SalesRepository for MemoryStore {
    fn list_sales(&self) -> Result<Vec<Sale>> {
        let mut sales = self.sales.clone();
        sales.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(sales)
    }

    fn insert_sale(&mut self, sale: &Sale) -> Result<i64> {
        Ok(self.push_sale(sale))
    }

    fn insert_sales(&mut self, sales: &[Sale]) -> Result<usize> {
        for sale in sales {
            self.push_sale(sale);
        }
        Ok(sales.len())
    }

    fn replace_sales(&mut self, sales: &[Sale]) -> Result<usize> {
        *self = Self::new();
        self.insert_sales(sales)
    }

    fn clear_sales(&mut self) -> Result<()> {
        self.sales.clear();
        self.forecasts.clear();
        Ok(())
    }
}

impl ForecastRepository for MemoryStore {
    fn list_forecasts(&self) -> Result<Vec<ForecastPoint>> {
        let mut points = self.forecasts.clone();
        points.sort_by(|a, b| a.forecast_date.cmp(&b.forecast_date).then(a.id.cmp(&b.id)));
        Ok(points)
    }

    fn replace_forecasts(&mut self, points: &[ForecastPoint]) -> Result<Vec<ForecastPoint>> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut next_id = self.next_forecast_id;
        let stored: Vec<ForecastPoint> = points
            .iter()
            .map(|p| {
                let id = next_id;
                next_id += 1;
                ForecastPoint {
                    id: Some(id),
                    created_at: now.clone(),
                    ..p.clone()
                }
            })
            .collect();
        // Swap only once the new set is complete.
        self.forecasts = stored.clone();
        self.next_forecast_id = next_id;
        Ok(stored)
    }

    fn clear_forecasts(&mut self) -> Result<()> {
        self.forecasts.clear();
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
