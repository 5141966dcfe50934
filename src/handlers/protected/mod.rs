// handlers/protected/mod.rs - handlers behind the bearer-token gate
//
// Every handler here receives the caller as `AuthUser`. Anything scoped to
// a property goes through the ownership check in `services::access`.

pub mod alerts;
pub mod consents;
pub mod consumption;
pub mod properties;
pub mod users;
