use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use super::{flag_value, flag_values, has_flag, positional, report, shellexpand};
use crate::config::Config;
use crate::db::{Database, ForecastRepository, MemoryStore, SalesRepository};
use crate::forecast::validate_horizon;
use crate::import::{ColumnMapper, ColumnRule, CsvImporter};
use crate::models::{ForecastMethod, MonthKey, Sale};
use crate::summary::Summary;

pub(crate) fn as_cli(args: &[String], db: &mut Database, config: &Config, db_path: &Path) -> Result<()> {
    let Some(command) = args.get(1) else {
        print_usage();
        return Ok(());
    };
    let rest = &args[2..];
    match command.as_str() {
        "add" => cli_add(rest, db),
        "import" => cli_import(rest, db),
        "sales" => cli_sales(rest, db, config),
        "clear" => cli_clear(db),
        "forecast" | "f" => cli_forecast(rest, db, config),
        "forecasts" => cli_forecasts(rest, db, config),
        "preview" => cli_preview(rest, config),
        "summary" | "s" => cli_summary(db, config),
        "config" => cli_config(config, db_path),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("salescast {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("SalesCast: sales tracking and revenue forecasting");
    println!();
    println!("Usage: salescast <command>");
    println!();
    println!("Commands:");
    println!("  add <date> <amount> <category> <region>   Record a single sale");
    println!("  import <file.csv>                         Import sales from a CSV file");
    println!("    --replace                               Replace all existing sales and forecasts");
    println!("    --column <field>=<regex>                Map a header to date/amount/category/region");
    println!("  sales                                     List recorded sales, newest first");
    println!("    --search <term>                         Filter by category or region");
    println!("    --month <YYYY-MM>                       Only sales from one month");
    println!("  clear                                     Delete all sales and forecasts");
    println!("  forecast [months]                         Generate a new forecast (1-24 months)");
    println!("    --method <name>                         regression | moving_average | seasonal_naive");
    println!("  forecasts                                 Show the current forecast");
    println!("    --clear                                 Discard the current forecast");
    println!("  preview <file.csv> [months]               Forecast a CSV without saving anything");
    println!("    --method <name>, --column <field>=<regex>");
    println!("  summary                                   Dashboard totals and breakdowns");
    println!("  config                                    Show effective configuration");
    println!("  --help, -h                                Show this help");
    println!("  --version, -V                             Show version");
    println!();
    println!("Environment: SALESCAST_DB (database path), SALESCAST_LOG (log filter)");
}

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    let [date, amount, category, region] = args else {
        anyhow::bail!("Usage: salescast add <date> <amount> <category> <region>");
    };
    let date = crate::import::parse_date(date)
        .ok_or_else(|| anyhow::anyhow!("Could not parse date: {date}"))?;
    let amount = Decimal::from_str(amount.trim())
        .with_context(|| format!("Failed to parse '{amount}' as decimal"))?;
    if amount < Decimal::ZERO {
        anyhow::bail!("Amount must not be negative: {amount}");
    }

    let sale = Sale::new(date, amount, category.clone(), region.clone());
    let id = db.insert_sale(&sale)?;
    println!("Recorded sale #{id}: {} {amount} ({category}, {region})", date.date());
    Ok(())
}

fn cli_import(args: &[String], db: &mut Database) -> Result<()> {
    let sales = read_csv_sales(args, "import <file.csv> [--replace] [--column <field>=<regex>]")?;
    let replace = has_flag(args, "--replace");
    let count = crate::service::load_sales(db, &sales, replace)?;
    if replace {
        println!("Replaced data set with {count} sales; previous forecasts cleared");
    } else {
        println!("Imported {count} sales");
    }
    Ok(())
}

/// Load the CSV named by the first positional argument, honouring `--column` rules.
fn read_csv_sales(args: &[String], usage: &str) -> Result<Vec<Sale>> {
    let files = positional(args, &["--column", "--method"]);
    let Some(file_path) = files.first() else {
        anyhow::bail!("Usage: salescast {usage}");
    };
    let expanded = shellexpand(file_path);
    let path = Path::new(&expanded);
    if !path.exists() {
        anyhow::bail!("File not found: {file_path}");
    }

    let rules = flag_values(args, "--column")
        .into_iter()
        .map(ColumnRule::parse)
        .collect::<Result<Vec<_>>>()?;
    let (mapper, bad_patterns) = ColumnMapper::new(&rules);
    if !bad_patterns.is_empty() {
        eprintln!("Warning: invalid column pattern(s): {}", bad_patterns.join(", "));
    }

    let (headers, rows) = CsvImporter::read(path)?;
    let columns = mapper.map_headers(&headers)?;
    let parsed = CsvImporter::parse(&rows, &columns);
    println!(
        "Parsed {} sales ({} rows skipped)",
        parsed.sales.len(),
        parsed.skipped
    );
    Ok(parsed.sales)
}

fn cli_sales(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let search = flag_value(args, "--search");
    let mut sales = db.get_sales(search)?;
    if let Some(raw) = flag_value(args, "--month") {
        let month = MonthKey::parse(raw)?;
        sales.retain(|s| s.month() == month);
    }
    report::print_sales(&sales, &config.currency_symbol);
    Ok(())
}

fn cli_clear(db: &mut Database) -> Result<()> {
    let count = db.get_sale_count()?;
    db.clear_sales()?;
    println!("Data cleared successfully ({count} sales removed)");
    Ok(())
}

fn cli_forecast(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let (horizon, method) = forecast_options(&positional(args, &["--method"]), args, config)?;
    let points = crate::service::refresh_forecasts(db, horizon, method)?;
    report::print_forecasts(&points, &config.currency_symbol);
    Ok(())
}

/// Horizon from the first positional argument and `--method`, with config defaults.
fn forecast_options(
    positional: &[&str],
    args: &[String],
    config: &Config,
) -> Result<(u32, ForecastMethod)> {
    let horizon = match positional.first() {
        Some(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("Invalid number of months: {raw}"))?,
        None => config.default_horizon,
    };
    let horizon = validate_horizon(horizon)?;
    let method = match flag_value(args, "--method") {
        Some(raw) => ForecastMethod::from_str(raw)?,
        None => config.default_method,
    };
    Ok((horizon, method))
}

fn cli_forecasts(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    if has_flag(args, "--clear") {
        db.clear_forecasts()?;
        println!("Forecast cleared");
        return Ok(());
    }
    let points = db.list_forecasts()?;
    if points.is_empty() {
        println!("No forecast yet. Run `salescast forecast` to generate one.");
        return Ok(());
    }
    report::print_forecasts(&points, &config.currency_symbol);
    Ok(())
}

fn cli_preview(args: &[String], config: &Config) -> Result<()> {
    let sales = read_csv_sales(args, "preview <file.csv> [months] [--method <name>]")?;
    let rest = positional(args, &["--column", "--method"]);
    let (horizon, method) = forecast_options(rest.get(1..).unwrap_or(&[]), args, config)?;

    let mut store = MemoryStore::new();
    store.insert_sales(&sales)?;
    let points = crate::service::refresh_forecasts(&mut store, horizon, method)?;
    report::print_forecasts(&points, &config.currency_symbol);
    Ok(())
}

fn cli_summary(db: &mut Database, config: &Config) -> Result<()> {
    let sales = db.list_sales()?;
    let forecasts = db.list_forecasts()?;
    let summary = Summary::build(&sales, &forecasts);
    report::print_summary(&summary, &config.currency_symbol);
    Ok(())
}

fn cli_config(config: &Config, db_path: &Path) -> Result<()> {
    println!("Database:         {}", db_path.display());
    println!("Default horizon:  {} months", config.default_horizon);
    println!("Default method:   {}", config.default_method);
    println!("Currency symbol:  {}", config.currency_symbol);
    println!();
    println!("Methods:");
    for method in ForecastMethod::all() {
        println!("  {:<16} {}", method.as_str(), method.model_name());
    }
    Ok(())
}
