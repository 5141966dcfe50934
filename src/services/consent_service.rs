use std::sync::Arc;

use crate::api::ConsentCreate;
use crate::database::models::{Consent, User};
use crate::database::Store;
use crate::error::ApiError;
use crate::services::access::{authorize_property, find_owned_property};
use crate::state::AppState;

pub struct ConsentService {
    store: Arc<dyn Store>,
}

impl ConsentService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn create(&self, caller: &User, input: ConsentCreate) -> Result<Consent, ApiError> {
        input.validate()?;
        authorize_property(self.store.as_ref(), caller, input.property_id).await?;

        let consent = self.store.create_consent(input.into()).await?;
        tracing::info!("Consent {} issued on property {}", consent.id, consent.property_id);
        Ok(consent)
    }

    pub async fn list(&self, caller: &User, property_id: i64) -> Result<Vec<Consent>, ApiError> {
        authorize_property(self.store.as_ref(), caller, property_id).await?;
        Ok(self.store.list_consents(property_id).await?)
    }

    pub async fn get(&self, caller: &User, consent_id: i64) -> Result<Consent, ApiError> {
        let not_found = || ApiError::not_found("Consent not found");

        let consent = self.store.find_consent(consent_id).await?.ok_or_else(not_found)?;
        find_owned_property(self.store.as_ref(), caller, consent.property_id)
            .await?
            .ok_or_else(not_found)?;
        Ok(consent)
    }
}
