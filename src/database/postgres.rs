use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::debug;

use crate::database::models::{
    Alert, Consent, ConsumptionData, NewAlert, NewConsent, NewConsumption, NewProperty, NewUser,
    Property, PropertyChanges, User,
};
use crate::database::store::{Store, StoreError};

const USER_COLUMNS: &str = "id, email, hashed_password, phone, company_name, siret, \
     is_active, is_verified, created_at, updated_at";

const PROPERTY_COLUMNS: &str = "id, owner_id, label, address, city, postal_code, pdl, status, \
     latitude, longitude, threshold_alert, enedis_token, enedis_refresh_token, token_expires_at, \
     created_at, updated_at";

const CONSUMPTION_COLUMNS: &str = "id, property_id, date, kwh, max_power, source, created_at";

const ALERT_COLUMNS: &str = "id, property_id, level, event_type, consumption_detected, \
     confidence_score, message, status, treated_by, treated_at, created_at";

const CONSENT_COLUMNS: &str =
    "id, property_id, holder_email, holder_name, status, permissions, expires_at, created_at";

/// PostgreSQL-backed store. Every call checks a connection out of the pool
/// and returns it on all exit paths.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        debug!("Creating user {}", new_user.email);
        let sql = format!(
            "INSERT INTO users (email, hashed_password, phone, company_name, siret) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&new_user.email)
            .bind(&new_user.hashed_password)
            .bind(&new_user.phone)
            .bind(&new_user.company_name)
            .bind(&new_user.siret)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        debug!("Deleting user {}", id);
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_property(&self, owner_id: i64, new_property: NewProperty) -> Result<Property, StoreError> {
        debug!("Creating property '{}' for owner {}", new_property.label, owner_id);
        let sql = format!(
            "INSERT INTO properties \
             (owner_id, label, address, city, postal_code, pdl, status, latitude, longitude, threshold_alert) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {PROPERTY_COLUMNS}"
        );
        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(owner_id)
            .bind(&new_property.label)
            .bind(&new_property.address)
            .bind(&new_property.city)
            .bind(&new_property.postal_code)
            .bind(&new_property.pdl)
            .bind(&new_property.status)
            .bind(new_property.latitude)
            .bind(new_property.longitude)
            .bind(new_property.threshold_alert)
            .fetch_one(&self.pool)
            .await?;
        Ok(property)
    }

    async fn find_property(&self, id: i64) -> Result<Option<Property>, StoreError> {
        let sql = format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1");
        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(property)
    }

    async fn list_properties(&self, owner_id: i64) -> Result<Vec<Property>, StoreError> {
        let sql = format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE owner_id = $1 ORDER BY id");
        let properties = sqlx::query_as::<_, Property>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(properties)
    }

    async fn update_property(&self, id: i64, changes: PropertyChanges) -> Result<Option<Property>, StoreError> {
        debug!("Updating property {}", id);
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1 FOR UPDATE");
        let Some(mut property) = sqlx::query_as::<_, Property>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        changes.apply_to(&mut property);

        let update = format!(
            "UPDATE properties SET label = $2, address = $3, city = $4, postal_code = $5, pdl = $6, \
             status = $7, latitude = $8, longitude = $9, threshold_alert = $10, updated_at = $11 \
             WHERE id = $1 RETURNING {PROPERTY_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Property>(&update)
            .bind(id)
            .bind(&property.label)
            .bind(&property.address)
            .bind(&property.city)
            .bind(&property.postal_code)
            .bind(&property.pdl)
            .bind(&property.status)
            .bind(property.latitude)
            .bind(property.longitude)
            .bind(property.threshold_alert)
            .bind(property.updated_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_property(&self, id: i64) -> Result<bool, StoreError> {
        debug!("Deleting property {}", id);
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_consumption(&self, property_id: i64, new_row: NewConsumption) -> Result<ConsumptionData, StoreError> {
        let sql = format!(
            "INSERT INTO consumption_data (property_id, date, kwh, max_power, source) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {CONSUMPTION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ConsumptionData>(&sql)
            .bind(property_id)
            .bind(new_row.date)
            .bind(new_row.kwh)
            .bind(new_row.max_power)
            .bind(&new_row.source)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn import_consumption(&self, property_id: i64, rows: Vec<NewConsumption>) -> Result<u64, StoreError> {
        debug!("Importing {} consumption rows for property {}", rows.len(), property_id);
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for row in &rows {
            let result = sqlx::query(
                "INSERT INTO consumption_data (property_id, date, kwh, max_power, source) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(property_id)
            .bind(row.date)
            .bind(row.kwh)
            .bind(row.max_power)
            .bind(&row.source)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn list_consumption(&self, property_id: i64, since: NaiveDate) -> Result<Vec<ConsumptionData>, StoreError> {
        let sql = format!(
            "SELECT {CONSUMPTION_COLUMNS} FROM consumption_data \
             WHERE property_id = $1 AND date >= $2 ORDER BY date DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ConsumptionData>(&sql)
            .bind(property_id)
            .bind(since)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_alert(&self, new_alert: NewAlert) -> Result<Alert, StoreError> {
        debug!("Creating {} alert for property {}", new_alert.event_type, new_alert.property_id);
        let sql = format!(
            "INSERT INTO alerts \
             (property_id, level, event_type, consumption_detected, confidence_score, message, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {ALERT_COLUMNS}"
        );
        let alert = sqlx::query_as::<_, Alert>(&sql)
            .bind(new_alert.property_id)
            .bind(&new_alert.level)
            .bind(&new_alert.event_type)
            .bind(new_alert.consumption_detected)
            .bind(new_alert.confidence_score)
            .bind(&new_alert.message)
            .bind(&new_alert.status)
            .fetch_one(&self.pool)
            .await?;
        Ok(alert)
    }

    async fn find_alert(&self, id: i64) -> Result<Option<Alert>, StoreError> {
        let sql = format!("SELECT {ALERT_COLUMNS} FROM alerts WHERE id = $1");
        let alert = sqlx::query_as::<_, Alert>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(alert)
    }

    async fn list_alerts(&self, property_id: i64) -> Result<Vec<Alert>, StoreError> {
        let sql = format!(
            "SELECT {ALERT_COLUMNS} FROM alerts WHERE property_id = $1 ORDER BY created_at DESC, id DESC"
        );
        let alerts = sqlx::query_as::<_, Alert>(&sql)
            .bind(property_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(alerts)
    }

    async fn create_consent(&self, new_consent: NewConsent) -> Result<Consent, StoreError> {
        debug!("Creating consent for property {}", new_consent.property_id);
        let sql = format!(
            "INSERT INTO consents (property_id, holder_email, holder_name, status, permissions, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {CONSENT_COLUMNS}"
        );
        let consent = sqlx::query_as::<_, Consent>(&sql)
            .bind(new_consent.property_id)
            .bind(&new_consent.holder_email)
            .bind(&new_consent.holder_name)
            .bind(&new_consent.status)
            .bind(&new_consent.permissions)
            .bind(new_consent.expires_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(consent)
    }

    async fn find_consent(&self, id: i64) -> Result<Option<Consent>, StoreError> {
        let sql = format!("SELECT {CONSENT_COLUMNS} FROM consents WHERE id = $1");
        let consent = sqlx::query_as::<_, Consent>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(consent)
    }

    async fn list_consents(&self, property_id: i64) -> Result<Vec<Consent>, StoreError> {
        let sql = format!("SELECT {CONSENT_COLUMNS} FROM consents WHERE property_id = $1 ORDER BY id");
        let consents = sqlx::query_as::<_, Consent>(&sql)
            .bind(property_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(consents)
    }
}
