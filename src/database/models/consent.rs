use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Consent {
    pub id: i64,
    pub property_id: i64,
    pub holder_email: String,
    pub holder_name: Option<String>,
    pub status: String,
    pub permissions: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewConsent {
    pub property_id: i64,
    pub holder_email: String,
    pub holder_name: Option<String>,
    pub status: String,
    pub permissions: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}
