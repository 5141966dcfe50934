use std::sync::Arc;

use crate::api::AlertCreate;
use crate::database::models::{Alert, User};
use crate::database::Store;
use crate::error::ApiError;
use crate::services::access::{authorize_property, find_owned_property};
use crate::state::AppState;

pub struct AlertService {
    store: Arc<dyn Store>,
}

impl AlertService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// The target property is named in the body and must belong to the caller
    pub async fn create(&self, caller: &User, input: AlertCreate) -> Result<Alert, ApiError> {
        input.validate()?;
        authorize_property(self.store.as_ref(), caller, input.property_id).await?;

        let alert = self.store.create_alert(input.into()).await?;
        tracing::info!(
            "Alert {} ({} / {}) raised on property {}",
            alert.id,
            alert.level,
            alert.event_type,
            alert.property_id
        );
        Ok(alert)
    }

    pub async fn list(&self, caller: &User, property_id: i64) -> Result<Vec<Alert>, ApiError> {
        authorize_property(self.store.as_ref(), caller, property_id).await?;
        Ok(self.store.list_alerts(property_id).await?)
    }

    pub async fn get(&self, caller: &User, alert_id: i64) -> Result<Alert, ApiError> {
        let not_found = || ApiError::not_found("Alert not found");

        let alert = self.store.find_alert(alert_id).await?.ok_or_else(not_found)?;
        find_owned_property(self.store.as_ref(), caller, alert.property_id)
            .await?
            .ok_or_else(not_found)?;
        Ok(alert)
    }
}
