use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Alert {
    pub id: i64,
    pub property_id: i64,
    pub level: String,
    pub event_type: String,
    pub consumption_detected: Option<f64>,
    pub confidence_score: Option<i32>,
    pub message: Option<String>,
    pub status: String,
    /// User who handled the alert, cleared if that user is deleted
    pub treated_by: Option<i64>,
    pub treated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAlert {
    pub property_id: i64,
    pub level: String,
    pub event_type: String,
    pub consumption_detected: Option<f64>,
    pub confidence_score: Option<i32>,
    pub message: Option<String>,
    pub status: String,
}
