mod memory;
mod repository;
mod schema;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

pub(crate) use memory::MemoryStore;
pub(crate) use repository::{ForecastRepository, SalesRepository};

const INSERT_SALE: &str = "INSERT INTO sales (date, amount, category, region) VALUES (?1, ?2, ?3, ?4)";

const INSERT_FORECAST: &str = "INSERT INTO forecasts (forecast_date, predicted_amount, model_name, created_at)
     VALUES (?1, ?2, ?3, ?4)";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::debug!(path = %path.display(), "opened database");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Sales ─────────────────────────────────────────────────

    /// Sales whose category or region contains `search`, newest first.
    pub(crate) fn get_sales(&self, search: Option<&str>) -> Result<Vec<Sale>> {
        let mut sql = String::from("SELECT id, date, amount, category, region FROM sales");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(s) = search {
            sql.push_str(" WHERE category LIKE ?1 OR region LIKE ?1");
            param_values.push(Box::new(format!("%{s}%")));
        }
        sql.push_str(" ORDER BY date DESC, id DESC");

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), sale_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_sale_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM sales", [], |row| row.get(0))?)
    }
}

impl SalesRepository for Database {
    fn list_sales(&self) -> Result<Vec<Sale>> {
        self.get_sales(None)
    }

    fn insert_sale(&mut self, sale: &Sale) -> Result<i64> {
        self.conn.execute(
            INSERT_SALE,
            params![
                sale.date.format(schema::DATETIME_FORMAT).to_string(),
                sale.amount.to_string(),
                sale.category,
                sale.region,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_sales(&mut self, sales: &[Sale]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let count = insert_sales_in(&tx, sales)?;
        tx.commit()?;
        Ok(count)
    }

    fn replace_sales(&mut self, sales: &[Sale]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM forecasts", [])?;
        tx.execute("DELETE FROM sales", [])?;
        let count = insert_sales_in(&tx, sales)?;
        tx.commit()?;
        tracing::info!(count, "replaced all sales");
        Ok(count)
    }

    fn clear_sales(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM forecasts", [])?;
        tx.execute("DELETE FROM sales", [])?;
        tx.commit()?;
        Ok(())
    }
}

impl ForecastRepository for Database {
    fn list_forecasts(&self) -> Result<Vec<ForecastPoint>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, forecast_date, predicted_amount, model_name, created_at
             FROM forecasts ORDER BY forecast_date ASC, id ASC",
        )?;
        let rows = stmt.query_map([], forecast_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn replace_forecasts(&mut self, points: &[ForecastPoint]) -> Result<Vec<ForecastPoint>> {
        let now = chrono::Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM forecasts", [])?;
        let mut stored = Vec::with_capacity(points.len());
        for point in points {
            tx.execute(
                INSERT_FORECAST,
                params![
                    point.forecast_date.format(schema::DATE_FORMAT).to_string(),
                    point.predicted_amount.to_string(),
                    point.model_name,
                    now,
                ],
            )?;
            stored.push(ForecastPoint {
                id: Some(tx.last_insert_rowid()),
                created_at: now.clone(),
                ..point.clone()
            });
        }
        tx.commit()?;
        Ok(stored)
    }

    fn clear_forecasts(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM forecasts", [])?;
        Ok(())
    }
}

fn insert_sales_in(conn: &Connection, sales: &[Sale]) -> Result<usize> {
    let mut stmt = conn.prepare(INSERT_SALE)?;
    for sale in sales {
        stmt.execute(params![
            sale.date.format(schema::DATETIME_FORMAT).to_string(),
            sale.amount.to_string(),
            sale.category,
            sale.region,
        ])?;
    }
    Ok(sales.len())
}

fn sale_from_row(row: &Row<'_>) -> rusqlite::Result<Sale> {
    let date_str: String = row.get(1)?;
    let amount_str: String = row.get(2)?;
    Ok(Sale {
        id: Some(row.get(0)?),
        date: NaiveDateTime::parse_from_str(&date_str, schema::DATETIME_FORMAT)
            .map_err(|e| conversion_error(1, e))?,
        amount: Decimal::from_str(&amount_str).map_err(|e| conversion_error(2, e))?,
        category: row.get(3)?,
        region: row.get(4)?,
    })
}

fn forecast_from_row(row: &Row<'_>) -> rusqlite::Result<ForecastPoint> {
    let date_str: String = row.get(1)?;
    let amount_str: String = row.get(2)?;
    Ok(ForecastPoint {
        id: Some(row.get(0)?),
        forecast_date: NaiveDate::parse_from_str(&date_str, schema::DATE_FORMAT)
            .map_err(|e| conversion_error(1, e))?,
        predicted_amount: Decimal::from_str(&amount_str).map_err(|e| conversion_error(2, e))?,
        model_name: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}
