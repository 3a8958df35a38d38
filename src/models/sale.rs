use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::MonthKey;

#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub id: Option<i64>,
    pub date: NaiveDateTime,
    pub amount: Decimal,
    pub category: String,
    pub region: String,
}

impl Sale {
    pub fn new(date: NaiveDateTime, amount: Decimal, category: String, region: String) -> Self {
        Self {
            id: None,
            date,
            amount,
            category,
            region,
        }
    }

    pub fn month(&self) -> MonthKey {
        MonthKey::of(&self.date)
    }
}
