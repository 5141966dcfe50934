use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth;
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// The persisted user behind a validated bearer token
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

/// Resolve `Authorization: Bearer <jwt>` to a stored user and inject it
/// into the request. Every token problem yields the same 401.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(request.headers()).map_err(|msg| {
        tracing::warn!("Rejected request to {}: {}", request.uri().path(), msg);
        ApiError::invalid_credentials()
    })?;

    let claims = auth::decode_token(token, &state.config.security.jwt_secret)?;

    // Store failures surface as 500, not as a credential problem
    let user = state
        .store
        .find_user_by_email(&claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token subject no longer exists");
            ApiError::invalid_credentials()
        })?;

    request.extensions_mut().insert(AuthUser(user));
    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_str = headers
        .get(header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let (scheme, token) = auth_str
        .split_once(' ')
        .ok_or("Authorization header must use Bearer token format")?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err("Authorization header must use Bearer token format");
    }

    let token = token.trim();
    if token.is_empty() {
        return Err("Empty JWT token");
    }
    Ok(token)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(ApiError::invalid_credentials)
    }
}
