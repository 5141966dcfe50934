//! Per-entity orchestration: authorization, validation, then store calls.
//! Handlers stay thin and only translate HTTP in and out of these.

pub mod access;
pub mod alert_service;
pub mod consent_service;
pub mod consumption_service;
pub mod property_service;
pub mod user_service;

pub use access::{authorize_property, find_owned_property};
pub use alert_service::AlertService;
pub use consent_service::ConsentService;
pub use consumption_service::{window_start, ConsumptionService};
pub use property_service::PropertyService;
pub use user_service::UserService;
