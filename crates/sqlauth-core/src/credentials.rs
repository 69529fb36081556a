//! Username/password input.

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Credentials supplied by the caller.
///
/// Deserializes from a mapping with `username` and `password` keys; either
/// may be absent, which [`Credentials::validate`] reports.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Credentials {
    /// Create credentials from a username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Read credentials from a JSON object.
    ///
    /// Non-string values for either key are treated as missing.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let field = |key: &str| value.get(key).and_then(|v| v.as_str()).map(str::to_string);
        Self {
            username: field("username"),
            password: field("password"),
        }
    }

    /// Check both fields are present and non-empty.
    pub fn validate(&self) -> AuthResult<(&str, &str)> {
        let username = match self.username.as_deref() {
            Some(u) if !u.is_empty() => u,
            _ => {
                return Err(AuthError::Validation(
                    "credentials must contain username in 'username' field".to_string(),
                ))
            }
        };
        let password = match self.password.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => {
                return Err(AuthError::Validation(
                    "credentials must contain password in 'password' field".to_string(),
                ))
            }
        };
        Ok((username, password))
    }
}

// Keep passwords out of debug output and logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate() {
        let creds = Credentials::new("tim", "sausages");
        assert_eq!(creds.validate().unwrap(), ("tim", "sausages"));
    }

    #[test]
    fn test_missing_fields() {
        let no_user = Credentials {
            username: None,
            password: Some("x".into()),
        };
        let err = no_user.validate().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("username"));

        let empty_password = Credentials::new("tim", "");
        let err = empty_password.validate().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn test_from_json() {
        let creds = Credentials::from_json(&json!({"username": "tim", "password": "sausages"}));
        assert_eq!(creds, Credentials::new("tim", "sausages"));

        let creds = Credentials::from_json(&json!({"username": "tim", "password": 42}));
        assert!(creds.password.is_none());

        let creds: Credentials = serde_json::from_value(json!({"username": "tim"})).unwrap();
        assert!(creds.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("tim", "sausages"));
        assert!(rendered.contains("tim"));
        assert!(!rendered.contains("sausages"));
    }
}
