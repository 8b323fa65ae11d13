//! # Dusys Auth
//!
//! Verification of the signed tokens accepted by the login endpoint as an
//! alternative to a username and password.
//!
//! - [`claims`]: the claims carried by an auto-login token and the identity
//!   resolved from them
//! - [`token`]: HS256 verification and issuing
//!
//! Tokens are compact JWS strings signed with a shared secret. Verification
//! distinguishes exactly two failure kinds, [`TokenError::Expired`] and
//! [`TokenError::Invalid`]; callers treat both the same way.
//!
//! # Example
//!
//! ```ignore
//! use dusys_auth::TokenVerifier;
//!
//! let verifier = TokenVerifier::new(&settings.auth.auto_login.secret);
//! let claims = verifier.verify(&token)?;
//! let identity = claims.into_identity(&settings.auth.auto_login);
//! ```

pub mod claims;
pub mod token;

pub use claims::{AutoLoginClaims, LoginIdentity};
pub use token::{TOKEN_ALGORITHM, TokenError, TokenVerifier, expiry_in, issue_token};
