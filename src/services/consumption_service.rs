use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};

use crate::api::consumption::{parse_consumption_csv, write_consumption_csv};
use crate::api::ConsumptionCreate;
use crate::database::models::{ConsumptionData, Property, User};
use crate::database::Store;
use crate::error::ApiError;
use crate::services::access::authorize_property;
use crate::state::AppState;

/// First date included in a trailing window of `days` days ending `today`.
/// The cutoff `today - days` itself is excluded, so `days=0` selects nothing.
pub fn window_start(today: NaiveDate, days: i64) -> Result<NaiveDate, ApiError> {
    let days = u64::try_from(days)
        .map_err(|_| ApiError::field_error("days", "must be greater than or equal to 0"))?;
    Ok(match today.checked_sub_days(Days::new(days)) {
        Some(cutoff) => cutoff.succ_opt().unwrap_or(cutoff),
        None => NaiveDate::MIN,
    })
}

pub struct ConsumptionService {
    store: Arc<dyn Store>,
    default_days: i64,
}

impl ConsumptionService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            default_days: state.config.api.default_consumption_days,
        }
    }

    pub async fn create(
        &self,
        caller: &User,
        property_id: i64,
        input: ConsumptionCreate,
    ) -> Result<ConsumptionData, ApiError> {
        input.validate()?;
        authorize_property(self.store.as_ref(), caller, property_id).await?;
        Ok(self.store.create_consumption(property_id, input.into()).await?)
    }

    /// Readings dated within the trailing window, newest first
    pub async fn list(
        &self,
        caller: &User,
        property_id: i64,
        days: Option<i64>,
    ) -> Result<Vec<ConsumptionData>, ApiError> {
        let since = window_start(Utc::now().date_naive(), days.unwrap_or(self.default_days))?;
        authorize_property(self.store.as_ref(), caller, property_id).await?;
        Ok(self.store.list_consumption(property_id, since).await?)
    }

    /// Parse the whole upload before touching the store; rows land together or not at all
    pub async fn import(&self, caller: &User, property_id: i64, body: &[u8]) -> Result<u64, ApiError> {
        authorize_property(self.store.as_ref(), caller, property_id).await?;
        let rows = parse_consumption_csv(body)?;

        let imported = self.store.import_consumption(property_id, rows).await?;
        tracing::info!("Imported {} readings into property {}", imported, property_id);
        Ok(imported)
    }

    /// CSV rendering of `list`, with the property for naming the download
    pub async fn export(
        &self,
        caller: &User,
        property_id: i64,
        days: Option<i64>,
    ) -> Result<(Property, Vec<u8>), ApiError> {
        let since = window_start(Utc::now().date_naive(), days.unwrap_or(self.default_days))?;
        let property = authorize_property(self.store.as_ref(), caller, property_id).await?;
        let rows = self.store.list_consumption(property_id, since).await?;
        Ok((property, write_consumption_csv(&rows)?))
    }
}
