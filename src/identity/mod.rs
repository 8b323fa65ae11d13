//! Identity store: users and roles.
//!
//! Handlers talk to the store through the [`IdentityStore`] trait. Production
//! uses [`PgIdentityStore`]; tests use the in-memory store behind the
//! `test-utils` feature. Both enforce unique emails and usernames and report
//! a violation as `409 Conflict`.

pub mod postgres;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

use async_trait::async_trait;
use dusys_core::AppError;
use dusys_models::{NewUser, Role, User, UserId};

pub use postgres::PgIdentityStore;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryIdentityStore;

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, AppError>;

    async fn find_role(&self, name: &str) -> Result<Option<Role>, AppError>;

    /// Returns the role named `name`, creating it if needed.
    async fn ensure_role(&self, name: &str) -> Result<Role, AppError>;

    /// Inserts a user and assigns its role.
    ///
    /// Fails with `409 Conflict` if the email or username is taken.
    async fn add_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn user_roles(&self, id: UserId) -> Result<Vec<Role>, AppError>;

    /// Updates the login counters after a credential check.
    ///
    /// A success bumps `login_count`, resets `fail_login_count` and stamps
    /// `last_login`; a failure bumps `fail_login_count`.
    async fn record_login(&self, id: UserId, success: bool) -> Result<(), AppError>;
}

/// Looks a user up by username, then by email.
pub async fn find_user_by_login(
    store: &dyn IdentityStore,
    login: &str,
) -> Result<Option<User>, AppError> {
    if let Some(user) = store.find_user_by_username(login).await? {
        return Ok(Some(user));
    }
    store.find_user_by_email(login).await
}
