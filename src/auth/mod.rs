use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Signing algorithm for every token this service issues or accepts
pub const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User email
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    pub fn new(subject: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.into(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Could not validate credentials")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
}

/// Hash a password with a per-call random salt
pub fn hash_password(password: &str, cost: u32) -> Result<String, CredentialError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Check a password against a stored hash. A hash that cannot be parsed never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("Stored password hash could not be verified: {}", e);
            false
        }
    }
}

pub fn issue_token(subject: &str, ttl: Duration, secret: &str) -> Result<String, CredentialError> {
    if secret.is_empty() {
        return Err(CredentialError::InvalidSecret);
    }

    let claims = Claims::new(subject, ttl);
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(JWT_ALGORITHM), &claims, &encoding_key)
        .map_err(|e| CredentialError::TokenGeneration(e.to_string()))
}

/// Validate signature, algorithm and expiry, and require both `sub` and `exp`
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, CredentialError> {
    if secret.is_empty() {
        return Err(CredentialError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Rejected JWT: {}", e);
            CredentialError::InvalidCredentials
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "test-secret";

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("password123", 4).unwrap();
        assert_ne!(hash, "password123");
        assert!(verify_password("password123", &hash));
        assert!(!verify_password("password124", &hash));
    }

    #[test]
    fn password_hashes_are_salted() {
        let a = hash_password("password123", 4).unwrap();
        let b = hash_password("password123", 4).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_does_not_verify() {
        assert!(!verify_password("password123", "not-a-bcrypt-hash"));
    }

    #[test]
    fn token_roundtrip_keeps_subject() {
        let token = issue_token("owner@example.com", Duration::minutes(5), SECRET).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "owner@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        // Well past the default validation leeway
        let token = issue_token("owner@example.com", Duration::minutes(-10), SECRET).unwrap();
        assert!(matches!(
            decode_token(&token, SECRET),
            Err(CredentialError::InvalidCredentials)
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token("owner@example.com", Duration::minutes(5), "other-secret").unwrap();
        assert!(matches!(
            decode_token(&token, SECRET),
            Err(CredentialError::InvalidCredentials)
        ));
    }

    #[test]
    fn token_without_subject_is_rejected() {
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();
        let token = encode(
            &Header::new(JWT_ALGORITHM),
            &json!({ "exp": exp }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            decode_token(&token, SECRET),
            Err(CredentialError::InvalidCredentials)
        ));
    }

    #[test]
    fn token_without_issued_at_is_accepted() {
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();
        let token = encode(
            &Header::new(JWT_ALGORITHM),
            &json!({ "sub": "owner@example.com", "exp": exp }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "owner@example.com");
        assert_eq!(claims.iat, 0);
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(decode_token("not.a.jwt", SECRET).is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(
            issue_token("owner@example.com", Duration::minutes(5), ""),
            Err(CredentialError::InvalidSecret)
        ));
    }
}
