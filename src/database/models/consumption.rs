use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ConsumptionData {
    pub id: i64,
    pub property_id: i64,
    pub date: NaiveDate,
    pub kwh: f64,
    pub max_power: Option<f64>,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewConsumption {
    pub date: NaiveDate,
    pub kwh: f64,
    pub max_power: Option<f64>,
    pub source: String,
}
