use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub frontend_dir: PathBuf,
    pub default_consumption_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_minutes: i64,
    pub bcrypt_cost: u32,
    pub min_password_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub from: String,
}

const DEV_JWT_SECRET: &str = "alerte-compteur-dev-secret-change-me";

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()?;

        if config.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("SECRET_KEY"));
        }

        Ok(config)
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse_var("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = parse_var("DATABASE_RUN_MIGRATIONS", &v)?;
        }

        // API overrides
        if let Ok(v) = env::var("PORT") {
            self.api.port = parse_var("PORT", &v)?;
        }
        if let Ok(v) = env::var("FRONTEND_DIR") {
            self.api.frontend_dir = PathBuf::from(v);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = parse_var("SECURITY_ENABLE_CORS", &v)?;
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECRET_KEY") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            self.security.jwt_expiry_minutes = parse_var("ACCESS_TOKEN_EXPIRE_MINUTES", &v)?;
        }
        if let Ok(v) = env::var("BCRYPT_COST") {
            self.security.bcrypt_cost = parse_bcrypt_cost(&v)?;
        }

        // SMTP overrides
        if let Ok(v) = env::var("SMTP_HOST") {
            self.smtp.host = v;
        }
        if let Ok(v) = env::var("SMTP_PORT") {
            self.smtp.port = parse_var("SMTP_PORT", &v)?;
        }
        if let Ok(v) = env::var("SMTP_USER") {
            self.smtp.username = v;
        }
        if let Ok(v) = env::var("SMTP_PASS") {
            self.smtp.password = v;
        }
        if let Ok(v) = env::var("EMAIL_FROM") {
            self.smtp.from = v;
        }

        Ok(self)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            api: ApiConfig {
                port: 8000,
                frontend_dir: PathBuf::from("frontend"),
                default_consumption_days: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:8000".to_string(), "http://localhost:5173".to_string()],
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_minutes: 24 * 60,
                bcrypt_cost: 10,
                min_password_length: 8,
            },
            smtp: SmtpConfig::default(),
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
                run_migrations: true,
            },
            api: ApiConfig {
                port: 8000,
                frontend_dir: PathBuf::from("frontend"),
                default_consumption_days: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.alertecompteur.fr".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_minutes: 120,
                bcrypt_cost: bcrypt::DEFAULT_COST,
                min_password_length: 8,
            },
            smtp: SmtpConfig::default(),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                run_migrations: false,
            },
            api: ApiConfig {
                port: 8000,
                frontend_dir: PathBuf::from("frontend"),
                default_consumption_days: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.alertecompteur.fr".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_minutes: 30,
                bcrypt_cost: bcrypt::DEFAULT_COST,
                min_password_length: 8,
            },
            smtp: SmtpConfig::default(),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Database URL, required by anything that opens the pool
    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from: "AlerteCompteur <noreply@alertecompteur.fr>".to_string(),
        }
    }
}

/// bcrypt only accepts work factors in 4..=31
fn parse_bcrypt_cost(value: &str) -> Result<u32, ConfigError> {
    let cost: u32 = parse_var("BCRYPT_COST", value)?;
    if !(4..=31).contains(&cost) {
        return Err(ConfigError::Invalid {
            name: "BCRYPT_COST",
            value: value.to_string(),
        });
    }
    Ok(cost)
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.is_development());
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.api.default_consumption_days, 30);
        assert!(config.database.run_migrations);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.is_development());
        // Production must be given a secret explicitly
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.jwt_expiry_minutes, 30);
        assert!(!config.database.run_migrations);
    }

    #[test]
    fn database_url_is_required() {
        let mut config = AppConfig::development();
        assert!(matches!(config.database_url(), Err(ConfigError::Missing("DATABASE_URL"))));

        config.database.url = Some("postgres://localhost/alerte".to_string());
        assert_eq!(config.database_url().unwrap(), "postgres://localhost/alerte");
    }

    #[test]
    fn parse_var_reports_bad_values() {
        let err = parse_var::<u16>("PORT", "eighty").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
        assert_eq!(parse_var::<u16>("PORT", " 8080 ").unwrap(), 8080);
    }

    #[test]
    fn bcrypt_cost_must_be_in_range() {
        assert_eq!(parse_bcrypt_cost("12").unwrap(), 12);
        assert_eq!(parse_bcrypt_cost("4").unwrap(), 4);
        for bad in ["3", "32", "0", "high"] {
            assert!(
                matches!(parse_bcrypt_cost(bad), Err(ConfigError::Invalid { name: "BCRYPT_COST", .. })),
                "accepted {:?}",
                bad
            );
        }
    }
}
