//! Auto-login token verification.
//!
//! Tokens are verified with a single symmetric algorithm, [`TOKEN_ALGORITHM`],
//! and a shared secret. `exp` and `nbf` are checked when the token carries
//! them, with no leeway, but neither is required.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::claims::AutoLoginClaims;

pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Why a token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token signature has expired")]
    Expired,

    /// Malformed token, bad signature, wrong algorithm or missing claims.
    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to issue token: {0}")]
    Encode(String),
}

impl TokenError {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::Invalid(_) => "invalid",
            Self::Encode(_) => "encode",
        }
    }
}

/// Verifies auto-login tokens against a shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithm", &TOKEN_ALGORITHM)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verifies the signature and decodes the claims.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Expired`] if `exp` is in the past
    /// - [`TokenError::Invalid`] for every other failure, including an `nbf`
    ///   in the future
    pub fn verify(&self, token: &str) -> Result<AutoLoginClaims, TokenError> {
        decode::<AutoLoginClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

/// Signs `claims` with `secret`.
///
/// Tokens are normally minted by the upstream application; this exists for
/// operators and tests.
pub fn issue_token(claims: &AutoLoginClaims, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::new(TOKEN_ALGORITHM),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encode(e.to_string()))
}

/// Unix timestamp `ttl_secs` from now, for the `exp` claim.
pub fn expiry_in(ttl_secs: i64) -> i64 {
    Utc::now().timestamp() + ttl_secs
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    fn claims() -> AutoLoginClaims {
        AutoLoginClaims {
            company_id: Some(json!(7)),
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            first_name: None,
            last_name: None,
            exp: Some(expiry_in(3600)),
        }
    }

    #[test]
    fn test_verify_token_success() {
        let token = issue_token(&claims(), SECRET).unwrap();
        let verified = TokenVerifier::new(SECRET).verify(&token).unwrap();
        assert_eq!(verified, claims());
    }

    #[test]
    fn test_token_without_exp_is_accepted() {
        let claims = AutoLoginClaims {
            exp: None,
            ..claims()
        };
        let token = issue_token(&claims, SECRET).unwrap();
        assert!(TokenVerifier::new(SECRET).verify(&token).is_ok());
    }

    #[test]
    fn test_expired_token() {
        let claims = AutoLoginClaims {
            exp: Some(expiry_in(-60)),
            ..claims()
        };
        let token = issue_token(&claims, SECRET).unwrap();
        assert_eq!(
            TokenVerifier::new(SECRET).verify(&token),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = issue_token(&claims(), "different-secret-key-at-least-32-characters").unwrap();
        let err = TokenVerifier::new(SECRET).verify(&token).unwrap_err();
        assert_eq!(err.kind(), "invalid");
    }

    #[test]
    fn test_malformed_token_is_invalid() {
        let err = TokenVerifier::new(SECRET).verify("not.a.token").unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn test_other_algorithm_is_invalid() {
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims(),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        let err = TokenVerifier::new(SECRET).verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn test_token_not_yet_valid_is_invalid() {
        let token = encode(
            &Header::new(TOKEN_ALGORITHM),
            &json!({
                "username": "ana",
                "email": "ana@example.com",
                "nbf": expiry_in(3600),
            }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        let err = TokenVerifier::new(SECRET).verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn test_missing_email_claim_is_invalid() {
        let token = encode(
            &Header::new(TOKEN_ALGORITHM),
            &json!({ "username": "ana", "company_id": 1 }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        let err = TokenVerifier::new(SECRET).verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }
}
