//! Request and response contracts, decoupled from the storage rows in
//! `database::models`.

pub mod alert;
pub mod consent;
pub mod consumption;
pub mod property;
pub mod user;
pub mod validation;

pub use alert::{AlertCreate, AlertResponse};
pub use consent::{ConsentCreate, ConsentResponse};
pub use consumption::{ConsumptionCreate, ConsumptionQuery, ConsumptionResponse, ImportSummary};
pub use property::{PropertyCreate, PropertyResponse, PropertyUpdate};
pub use user::{TokenRequest, TokenResponse, UserCreate, UserResponse};
pub use validation::Validator;
