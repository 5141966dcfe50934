use crate::database::models::{Property, User};
use crate::database::{Store, StoreError};
use crate::error::ApiError;

pub const PROPERTY_NOT_FOUND: &str = "Property not found";

/// The property, if it exists and belongs to `caller`. Foreign and absent
/// properties are indistinguishable to the caller.
pub async fn find_owned_property(
    store: &dyn Store,
    caller: &User,
    property_id: i64,
) -> Result<Option<Property>, StoreError> {
    match store.find_property(property_id).await? {
        Some(property) if property.owner_id == caller.id => Ok(Some(property)),
        Some(property) => {
            tracing::warn!(
                "User {} denied access to property {} owned by {}",
                caller.id,
                property.id,
                property.owner_id
            );
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Ownership check run before every read or write under a property
pub async fn authorize_property(
    store: &dyn Store,
    caller: &User,
    property_id: i64,
) -> Result<Property, ApiError> {
    find_owned_property(store, caller, property_id)
        .await?
        .ok_or_else(|| ApiError::not_found(PROPERTY_NOT_FOUND))
}
