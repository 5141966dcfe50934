use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Property {
    pub id: i64,
    pub owner_id: i64,
    pub label: String,
    pub address: String,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub pdl: String,
    pub status: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub threshold_alert: f64,
    // Meter-operator OAuth tokens, never returned by the API
    pub enedis_token: Option<String>,
    pub enedis_refresh_token: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProperty {
    pub label: String,
    pub address: String,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub pdl: String,
    pub status: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub threshold_alert: f64,
}

/// Partial update: `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct PropertyChanges {
    pub label: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub pdl: Option<String>,
    pub status: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub threshold_alert: Option<f64>,
}

impl PropertyChanges {
    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.postal_code.is_none()
            && self.pdl.is_none()
            && self.status.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.threshold_alert.is_none()
    }

    /// Overwrite only the supplied fields and bump `updated_at`
    pub fn apply_to(self, property: &mut Property) {
        if let Some(v) = self.label {
            property.label = v;
        }
        if let Some(v) = self.address {
            property.address = v;
        }
        if let Some(v) = self.city {
            property.city = Some(v);
        }
        if let Some(v) = self.postal_code {
            property.postal_code = Some(v);
        }
        if let Some(v) = self.pdl {
            property.pdl = v;
        }
        if let Some(v) = self.status {
            property.status = v;
        }
        if let Some(v) = self.latitude {
            property.latitude = Some(v);
        }
        if let Some(v) = self.longitude {
            property.longitude = Some(v);
        }
        if let Some(v) = self.threshold_alert {
            property.threshold_alert = v;
        }
        property.updated_at = Utc::now();
    }
}
