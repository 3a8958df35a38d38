use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    Regression,
    MovingAverage,
    SeasonalNaive,
}

impl ForecastMethod {
    /// Identifier accepted on the command line and in the config file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regression => "regression",
            Self::MovingAverage => "moving_average",
            Self::SeasonalNaive => "seasonal_naive",
        }
    }

    /// Label stamped on every forecast point the method produces.
    pub fn model_name(&self) -> &'static str {
        match self {
            Self::Regression => "Linear Regression",
            Self::MovingAverage => "3-Month Moving Average",
            Self::SeasonalNaive => "Seasonal Naive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "regression" | "linear" | "linear_regression" => Some(Self::Regression),
            "moving_average" | "moving-average" | "ma" => Some(Self::MovingAverage),
            "seasonal_naive" | "seasonal-naive" | "seasonality" | "seasonal" => {
                Some(Self::SeasonalNaive)
            }
            _ => None,
        }
    }

    pub fn all() -> &'static [ForecastMethod] {
        &[Self::Regression, Self::MovingAverage, Self::SeasonalNaive]
    }
}

impl std::fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub id: Option<i64>,
    /// Always the first day of a month.
    pub forecast_date: NaiveDate,
    pub predicted_amount: Decimal,
    pub model_name: String,
    pub created_at: String,
}

impl ForecastPoint {
    pub fn new(forecast_date: NaiveDate, predicted_amount: Decimal, method: ForecastMethod) -> Self {
        Self {
            id: None,
            forecast_date,
            predicted_amount,
            model_name: method.model_name().to_string(),
            created_at: String::new(),
        }
    }
}
