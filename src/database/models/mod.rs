pub mod alert;
pub mod consent;
pub mod consumption;
pub mod property;
pub mod user;

pub use alert::{Alert, NewAlert};
pub use consent::{Consent, NewConsent};
pub use consumption::{ConsumptionData, NewConsumption};
pub use property::{NewProperty, Property, PropertyChanges};
pub use user::{NewUser, User};
