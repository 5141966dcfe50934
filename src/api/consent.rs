use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::validation::Validator;
use crate::database::models::{Consent, NewConsent};
use crate::error::ApiError;

pub const DEFAULT_CONSENT_STATUS: &str = "INVITED";

fn default_status() -> String {
    DEFAULT_CONSENT_STATUS.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsentCreate {
    pub property_id: i64,
    pub holder_email: String,
    pub holder_name: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    pub permissions: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ConsentCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .email("holder_email", &self.holder_email)
            .optional("holder_name", self.holder_name.as_deref(), 100)
            .required("status", &self.status, 20)
            .finish()
    }
}

impl From<ConsentCreate> for NewConsent {
    fn from(input: ConsentCreate) -> Self {
        Self {
            property_id: input.property_id,
            holder_email: input.holder_email,
            holder_name: input.holder_name,
            status: input.status,
            permissions: input.permissions,
            expires_at: input.expires_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentResponse {
    pub id: i64,
    pub property_id: i64,
    pub holder_email: String,
    pub holder_name: Option<String>,
    pub status: String,
    pub permissions: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Consent> for ConsentResponse {
    fn from(consent: Consent) -> Self {
        Self {
            id: consent.id,
            property_id: consent.property_id,
            holder_email: consent.holder_email,
            holder_name: consent.holder_name,
            status: consent.status,
            permissions: consent.permissions,
            expires_at: consent.expires_at,
            created_at: consent.created_at,
        }
    }
}
