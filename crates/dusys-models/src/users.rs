//! Users and roles.
//!
//! A user is uniquely identified by email (and, separately, by username).
//! Users created from an auto-login token have no password hash and can
//! only sign in with a token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::ids::{RoleId, UserId};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub active: bool,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub login_count: i32,
    pub fail_login_count: i32,
    pub last_login: Option<DateTime<Utc>>,
    pub created_on: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}

/// Input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: RoleId,
    pub password_hash: Option<String>,
    pub active: bool,
}
