//! Auto-login token claims.

use dusys_config::AutoLoginConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claims carried by an auto-login token.
///
/// `username` and `email` are required; a token without them does not
/// decode. `company_id` is passed through untouched, whatever its JSON type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoLoginClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Value>,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Expiration (Unix timestamp). Validated when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// The identity asserted by a verified token, with name defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginIdentity {
    pub company_id: Option<Value>,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl AutoLoginClaims {
    pub fn into_identity(self, config: &AutoLoginConfig) -> LoginIdentity {
        LoginIdentity {
            company_id: self.company_id,
            username: self.username,
            email: self.email,
            first_name: self
                .first_name
                .unwrap_or_else(|| config.default_first_name.clone()),
            last_name: self
                .last_name
                .unwrap_or_else(|| config.default_last_name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_names_take_defaults() {
        let claims: AutoLoginClaims = serde_json::from_value(json!({
            "company_id": 42,
            "username": "ana",
            "email": "ana@example.com"
        }))
        .unwrap();

        let identity = claims.into_identity(&AutoLoginConfig::default());

        assert_eq!(identity.first_name, "Dusys");
        assert_eq!(identity.last_name, "Viewer");
        assert_eq!(identity.company_id, Some(json!(42)));
    }

    #[test]
    fn test_present_names_are_kept() {
        let claims: AutoLoginClaims = serde_json::from_value(json!({
            "company_id": "acme",
            "username": "ana",
            "email": "ana@example.com",
            "first_name": "Ana",
            "last_name": "Souza"
        }))
        .unwrap();

        let identity = claims.into_identity(&AutoLoginConfig::default());

        assert_eq!(identity.first_name, "Ana");
        assert_eq!(identity.last_name, "Souza");
        assert_eq!(identity.company_id, Some(json!("acme")));
    }

    #[test]
    fn test_null_names_take_defaults() {
        let claims: AutoLoginClaims = serde_json::from_value(json!({
            "username": "ana",
            "email": "ana@example.com",
            "first_name": null
        }))
        .unwrap();

        let identity = claims.into_identity(&AutoLoginConfig::default());

        assert_eq!(identity.first_name, "Dusys");
        assert!(identity.company_id.is_none());
    }

    #[test]
    fn test_email_is_required() {
        let result: Result<AutoLoginClaims, _> = serde_json::from_value(json!({
            "username": "ana"
        }));
        assert!(result.is_err());
    }
}
