use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::database::models::{
    Alert, Consent, ConsumptionData, NewAlert, NewConsent, NewConsumption, NewProperty, NewUser,
    Property, PropertyChanges, User,
};

/// Errors from a Store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// A globally unique column (`email`, `pdl`) already holds this value
    #[error("Duplicate value for unique field '{0}'")]
    Conflict(&'static str),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let field = match db_err.constraint() {
                    Some(c) if c.contains("email") => "email",
                    Some(c) if c.contains("pdl") => "pdl",
                    _ => "unknown",
                };
                return StoreError::Conflict(field);
            }
        }
        StoreError::Sqlx(err)
    }
}

/// Persistence handle injected into every request.
///
/// Ownership is not enforced here: callers authorize against the owning
/// property before reading or mutating anything below it.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), StoreError>;

    // Users
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Removes the user and, by cascade, every property below it
    async fn delete_user(&self, id: i64) -> Result<bool, StoreError>;

    // Properties
    async fn create_property(&self, owner_id: i64, new_property: NewProperty) -> Result<Property, StoreError>;
    async fn find_property(&self, id: i64) -> Result<Option<Property>, StoreError>;
    async fn list_properties(&self, owner_id: i64) -> Result<Vec<Property>, StoreError>;
    async fn update_property(&self, id: i64, changes: PropertyChanges) -> Result<Option<Property>, StoreError>;
    /// Removes the property and its consumption, alerts and consents
    async fn delete_property(&self, id: i64) -> Result<bool, StoreError>;

    // Consumption
    async fn create_consumption(&self, property_id: i64, new_row: NewConsumption) -> Result<ConsumptionData, StoreError>;
    /// Inserts every row or none
    async fn import_consumption(&self, property_id: i64, rows: Vec<NewConsumption>) -> Result<u64, StoreError>;
    /// Rows dated on or after `since`, newest date first
    async fn list_consumption(&self, property_id: i64, since: NaiveDate) -> Result<Vec<ConsumptionData>, StoreError>;

    // Alerts
    async fn create_alert(&self, new_alert: NewAlert) -> Result<Alert, StoreError>;
    async fn find_alert(&self, id: i64) -> Result<Option<Alert>, StoreError>;
    /// Newest first
    async fn list_alerts(&self, property_id: i64) -> Result<Vec<Alert>, StoreError>;

    // Consents
    async fn create_consent(&self, new_consent: NewConsent) -> Result<Consent, StoreError>;
    async fn find_consent(&self, id: i64) -> Result<Option<Consent>, StoreError>;
    async fn list_consents(&self, property_id: i64) -> Result<Vec<Consent>, StoreError>;
}
