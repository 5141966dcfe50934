use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::validation::Validator;
use crate::database::models::{NewProperty, Property, PropertyChanges};
use crate::error::ApiError;

pub const DEFAULT_PROPERTY_STATUS: &str = "EMPTY";
pub const DEFAULT_THRESHOLD_ALERT: f64 = 2.0;

fn default_status() -> String {
    DEFAULT_PROPERTY_STATUS.to_string()
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD_ALERT
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyCreate {
    pub label: String,
    pub address: String,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub pdl: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default = "default_threshold")]
    pub threshold_alert: f64,
}

impl PropertyCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .required("label", &self.label, 100)
            .required("address", &self.address, 10_000)
            .optional("city", self.city.as_deref(), 100)
            .optional("postal_code", self.postal_code.as_deref(), 10)
            .required("pdl", &self.pdl, 14)
            .required("status", &self.status, 20)
            .range("latitude", self.latitude, -90.0, 90.0)
            .range("longitude", self.longitude, -180.0, 180.0)
            .non_negative("threshold_alert", Some(self.threshold_alert))
            .finish()
    }
}

impl From<PropertyCreate> for NewProperty {
    fn from(input: PropertyCreate) -> Self {
        Self {
            label: input.label,
            address: input.address,
            city: input.city,
            postal_code: input.postal_code,
            pdl: input.pdl,
            status: input.status,
            latitude: input.latitude,
            longitude: input.longitude,
            threshold_alert: input.threshold_alert,
        }
    }
}

/// PUT body: absent or null fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyUpdate {
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

impl PropertyUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut validator = Validator::new();
        if let Some(label) = &self.label {
            validator.required("label", label, 100);
        }
        if let Some(address) = &self.address {
            validator.required("address", address, 10_000);
        }
        if let Some(pdl) = &self.pdl {
            validator.required("pdl", pdl, 14);
        }
        if let Some(status) = &self.status {
            validator.required("status", status, 20);
        }
        validator
            .optional("city", self.city.as_deref(), 100)
            .optional("postal_code", self.postal_code.as_deref(), 10)
            .range("latitude", self.latitude, -90.0, 90.0)
            .range("longitude", self.longitude, -180.0, 180.0)
            .non_negative("threshold_alert", self.threshold_alert)
            .finish()
    }
}

impl From<PropertyUpdate> for PropertyChanges {
    fn from(input: PropertyUpdate) -> Self {
        Self {
            label: input.label,
            address: input.address,
            city: input.city,
            postal_code: input.postal_code,
            pdl: input.pdl,
            status: input.status,
            latitude: input.latitude,
            longitude: input.longitude,
            threshold_alert: input.threshold_alert,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyResponse {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Property> for PropertyResponse {
    fn from(property: Property) -> Self {
        Self {
            id: property.id,
            owner_id: property.owner_id,
            label: property.label,
            address: property.address,
            city: property.city,
            postal_code: property.postal_code,
            pdl: property.pdl,
            status: property.status,
            latitude: property.latitude,
            longitude: property.longitude,
            threshold_alert: property.threshold_alert,
            created_at: property.created_at,
            updated_at: property.updated_at,
        }
    }
}
