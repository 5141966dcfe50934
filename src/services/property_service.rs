use std::sync::Arc;

use crate::api::{PropertyCreate, PropertyUpdate};
use crate::database::models::{Property, PropertyChanges, User};
use crate::database::Store;
use crate::error::ApiError;
use crate::services::access::{authorize_property, PROPERTY_NOT_FOUND};
use crate::state::AppState;

pub struct PropertyService {
    store: Arc<dyn Store>,
}

impl PropertyService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn create(&self, owner: &User, input: PropertyCreate) -> Result<Property, ApiError> {
        input.validate()?;
        let property = self.store.create_property(owner.id, input.into()).await?;
        tracing::info!("User {} created property {}", owner.id, property.id);
        Ok(property)
    }

    pub async fn list(&self, owner: &User) -> Result<Vec<Property>, ApiError> {
        Ok(self.store.list_properties(owner.id).await?)
    }

    pub async fn get(&self, caller: &User, property_id: i64) -> Result<Property, ApiError> {
        authorize_property(self.store.as_ref(), caller, property_id).await
    }

    /// Overwrite only the fields present in `input`
    pub async fn update(
        &self,
        caller: &User,
        property_id: i64,
        input: PropertyUpdate,
    ) -> Result<Property, ApiError> {
        input.validate()?;
        let existing = authorize_property(self.store.as_ref(), caller, property_id).await?;

        let changes = PropertyChanges::from(input);
        if changes.is_empty() {
            return Ok(existing);
        }

        self.store
            .update_property(property_id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found(PROPERTY_NOT_FOUND))
    }

    pub async fn delete(&self, caller: &User, property_id: i64) -> Result<(), ApiError> {
        authorize_property(self.store.as_ref(), caller, property_id).await?;

        if !self.store.delete_property(property_id).await? {
            return Err(ApiError::not_found(PROPERTY_NOT_FOUND));
        }
        tracing::info!("User {} deleted property {}", caller.id, property_id);
        Ok(())
    }
}
