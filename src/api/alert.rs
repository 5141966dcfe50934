use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::validation::Validator;
use crate::database::models::{Alert, NewAlert};
use crate::error::ApiError;

pub const DEFAULT_ALERT_STATUS: &str = "ACTIVE";

fn default_status() -> String {
    DEFAULT_ALERT_STATUS.to_string()
}

/// POST /api/alerts/ body. The parent property comes from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertCreate {
    pub property_id: i64,
    pub level: String,
    pub event_type: String,
    pub consumption_detected: Option<f64>,
    pub confidence_score: Option<i32>,
    pub message: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

impl AlertCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .required("level", &self.level, 20)
            .required("event_type", &self.event_type, 50)
            .non_negative("consumption_detected", self.consumption_detected)
            .check(
                "confidence_score",
                self.confidence_score.map_or(true, |s| (0..=100).contains(&s)),
                "must be between 0 and 100",
            )
            .required("status", &self.status, 20)
            .finish()
    }
}

impl From<AlertCreate> for NewAlert {
    fn from(input: AlertCreate) -> Self {
        Self {
            property_id: input.property_id,
            level: input.level,
            event_type: input.event_type,
            consumption_detected: input.consumption_detected,
            confidence_score: input.confidence_score,
            message: input.message,
            status: input.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertResponse {
    pub id: i64,
    pub property_id: i64,
    pub level: String,
    pub event_type: String,
    pub consumption_detected: Option<f64>,
    pub confidence_score: Option<i32>,
    pub message: Option<String>,
    pub status: String,
    pub treated_by: Option<i64>,
    pub treated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Alert> for AlertResponse {
    fn from(alert: Alert) -> Self {
        Self {
            id: alert.id,
            property_id: alert.property_id,
            level: alert.level,
            event_type: alert.event_type,
            consumption_detected: alert.consumption_detected,
            confidence_score: alert.confidence_score,
            message: alert.message,
            status: alert.status,
            treated_by: alert.treated_by,
            treated_at: alert.treated_at,
            created_at: alert.created_at,
        }
    }
}
