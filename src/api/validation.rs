use crate::error::{ApiError, FieldErrors};

/// Collects field errors so a client sees every problem in one response
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn reject(&mut self, field: &str, message: impl Into<String>) {
        // Keep the first problem reported for a field
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.reject(field, message);
        }
        self
    }

    /// Non-blank and at most `max_len` characters
    pub fn required(&mut self, field: &str, value: &str, max_len: usize) -> &mut Self {
        if value.trim().is_empty() {
            self.reject(field, "must not be empty");
        } else {
            self.max_len(field, value, max_len);
        }
        self
    }

    pub fn optional(&mut self, field: &str, value: Option<&str>, max_len: usize) -> &mut Self {
        if let Some(value) = value {
            self.max_len(field, value, max_len);
        }
        self
    }

    fn max_len(&mut self, field: &str, value: &str, max_len: usize) {
        if value.chars().count() > max_len {
            self.reject(field, format!("must be at most {} characters", max_len));
        }
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if let Err(msg) = validate_email(value) {
            self.reject(field, msg);
        } else {
            self.max_len(field, value, 255);
        }
        self
    }

    pub fn range(&mut self, field: &str, value: Option<f64>, min: f64, max: f64) -> &mut Self {
        if let Some(value) = value {
            if !value.is_finite() || value < min || value > max {
                self.reject(field, format!("must be between {} and {}", min, max));
            }
        }
        self
    }

    pub fn non_negative(&mut self, field: &str, value: Option<f64>) -> &mut Self {
        if let Some(value) = value {
            if !value.is_finite() || value < 0.0 {
                self.reject(field, "must be a non-negative number");
            }
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::unprocessable_entity(
                "Validation failed",
                std::mem::take(&mut self.errors),
            ))
        }
    }
}

/// Basic shape check: one `@`, non-empty local part, dotted domain
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    if email.chars().any(char::is_whitespace) {
        return Err("Invalid email format".to_string());
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err("Invalid email format".to_string());
    }

    let domain = parts[1];
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}
