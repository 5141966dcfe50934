use std::sync::Arc;

use chrono::Duration;

use crate::api::UserCreate;
use crate::auth;
use crate::config::AppConfig;
use crate::database::models::{NewUser, User};
use crate::database::Store;
use crate::error::ApiError;
use crate::state::AppState;

pub const EMAIL_TAKEN: &str = "Email already registered";
pub const BAD_LOGIN: &str = "Incorrect email or password";

pub struct UserService {
    store: Arc<dyn Store>,
    config: Arc<AppConfig>,
}

impl UserService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            config: state.config.clone(),
        }
    }

    /// Validate, reject a taken email, hash the password and persist
    pub async fn register(&self, input: UserCreate) -> Result<User, ApiError> {
        input.validate(self.config.security.min_password_length)?;

        if self.store.find_user_by_email(&input.email).await?.is_some() {
            return Err(ApiError::bad_request(EMAIL_TAKEN));
        }

        let cost = self.config.security.bcrypt_cost;
        let password = input.password;
        let hashed_password =
            tokio::task::spawn_blocking(move || auth::hash_password(&password, cost)).await??;

        // A concurrent registration still loses on the unique index
        let user = self
            .store
            .create_user(NewUser {
                email: input.email,
                hashed_password,
                phone: input.phone,
                company_name: input.company_name,
                siret: input.siret,
            })
            .await?;

        tracing::info!("Registered user {} ({})", user.id, user.email);
        Ok(user)
    }

    /// Exchange email + password for an access token
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let Some(user) = self.store.find_user_by_email(email).await? else {
            tracing::warn!("Login attempt for unknown email");
            return Err(ApiError::unauthorized(BAD_LOGIN));
        };

        let password = password.to_string();
        let hash = user.hashed_password.clone();
        let verified =
            tokio::task::spawn_blocking(move || auth::verify_password(&password, &hash)).await?;

        if !verified {
            tracing::warn!("Wrong password for user {}", user.id);
            return Err(ApiError::unauthorized(BAD_LOGIN));
        }

        let ttl = Duration::minutes(self.config.security.jwt_expiry_minutes);
        let token = auth::issue_token(&user.email, ttl, &self.config.security.jwt_secret)?;

        tracing::debug!("Issued token for user {}", user.id);
        Ok(token)
    }

    /// Remove the caller along with every property, reading and alert below it
    pub async fn delete(&self, user: &User) -> Result<(), ApiError> {
        if !self.store.delete_user(user.id).await? {
            return Err(ApiError::not_found("User not found"));
        }
        tracing::info!("Deleted user {}", user.id);
        Ok(())
    }
}
