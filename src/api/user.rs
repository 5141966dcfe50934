use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::validation::Validator;
use crate::database::models::User;
use crate::error::ApiError;

/// POST /api/users/ body
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub siret: Option<String>,
}

impl UserCreate {
    pub fn validate(&self, min_password_length: usize) -> Result<(), ApiError> {
        Validator::new()
            .email("email", &self.email)
            .check(
                "password",
                self.password.chars().count() >= min_password_length,
                &format!("must be at least {} characters", min_password_length),
            )
            .optional("phone", self.phone.as_deref(), 20)
            .optional("company_name", self.company_name.as_deref(), 255)
            .check(
                "siret",
                self.siret
                    .as_deref()
                    .map_or(true, |s| s.len() == 14 && s.chars().all(|c| c.is_ascii_digit())),
                "must be 14 digits",
            )
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub siret: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            phone: user.phone,
            company_name: user.company_name,
            siret: user.siret,
            is_active: user.is_active,
            is_verified: user.is_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// OAuth2 password-flow form; `username` carries the email
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
    pub grant_type: Option<String>,
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
