use rust_decimal::Decimal;

use crate::models::{ForecastPoint, Sale};
use crate::summary::Summary;

/// How many regions/categories the summary lists.
const TOP_N: usize = 5;

fn money(symbol: &str, amount: Decimal) -> String {
    format!("{symbol}{amount:.2}")
}

pub(super) fn print_sales(sales: &[Sale], symbol: &str) {
    if sales.is_empty() {
        println!("No sales recorded");
        return;
    }

    println!(
        "{:<6} {:<12} {:>14}  {:<20} Region",
        "ID", "Date", "Amount", "Category"
    );
    println!("{}", "─".repeat(66));
    for sale in sales {
        println!(
            "{:<6} {:<12} {:>14}  {:<20} {}",
            sale.id.unwrap_or(0),
            sale.date.format("%Y-%m-%d").to_string(),
            money(symbol, sale.amount),
            sale.category,
            sale.region,
        );
    }
    println!("{} sales", sales.len());
}

pub(super) fn print_forecasts(points: &[ForecastPoint], symbol: &str) {
    let Some(first) = points.first() else {
        println!("No forecast points");
        return;
    };

    println!("Model: {}", first.model_name);
    println!("{:<10} {:>16}", "Month", "Predicted");
    println!("{}", "─".repeat(27));
    for point in points {
        println!(
            "{:<10} {:>16}",
            point.forecast_date.format("%Y-%m").to_string(),
            money(symbol, point.predicted_amount),
        );
    }
}

pub(super) fn print_summary(summary: &Summary, symbol: &str) {
    println!("SalesCast dashboard");
    println!("{}", "─".repeat(40));
    println!("  Total Revenue:   {}", money(symbol, summary.total_revenue));
    match summary.latest_month {
        Some(month) => println!(
            "  Latest Month:    {} ({month})",
            money(symbol, summary.latest_month_revenue)
        ),
        None => println!("  Latest Month:    -"),
    }
    match &summary.next_forecast {
        Some(next) => println!(
            "  Next Forecast:   {} ({}, {})",
            money(symbol, next.predicted_amount),
            next.forecast_date.format("%Y-%m"),
            next.model_name,
        ),
        None => println!("  Next Forecast:   -"),
    }
    if let Some(growth) = summary.projected_growth() {
        println!("  Projected Growth: {growth:+}%");
    }
    println!("  Total Sales:     {}", summary.transaction_count);

    print_ranking("Regional Performance:", &summary.by_region, symbol);
    print_ranking("Top Categories:", &summary.by_category, symbol);
}

fn print_ranking(title: &str, rows: &[(String, Decimal)], symbol: &str) {
    if rows.is_empty() {
        return;
    }
    println!();
    println!("{title}");
    for (name, amount) in rows.iter().take(TOP_N) {
        println!("  {name:<24} {}", money(symbol, *amount));
    }
}
