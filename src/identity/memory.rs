//! In-memory identity store for tests.

use async_trait::async_trait;
use chrono::Utc;
use dusys_core::AppError;
use dusys_models::{NewUser, Role, RoleId, User, UserId};
use tokio::sync::RwLock;

use super::IdentityStore;

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    roles: Vec<Role>,
    user_roles: Vec<(UserId, RoleId)>,
}

#[derive(Default)]
pub struct MemoryIdentityStore {
    inner: RwLock<Inner>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored user.
    pub async fn users(&self) -> Vec<User> {
        self.inner.read().await.users.clone()
    }

    pub async fn set_active(&self, id: UserId, active: bool) {
        let mut inner = self.inner.write().await;
        if let Some(user) = inner.users.iter_mut().find(|u| u.id == id) {
            user.active = active;
        }
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_role(&self, name: &str) -> Result<Option<Role>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.roles.iter().find(|r| r.name == name).cloned())
    }

    async fn ensure_role(&self, name: &str) -> Result<Role, AppError> {
        let mut inner = self.inner.write().await;
        if let Some(role) = inner.roles.iter().find(|r| r.name == name) {
            return Ok(role.clone());
        }
        let role = Role {
            id: RoleId::new(),
            name: name.to_string(),
        };
        inner.roles.push(role.clone());
        Ok(role)
    }

    async fn add_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;

        if inner
            .users
            .iter()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(AppError::conflict(anyhow::anyhow!(
                "User with this email or username already exists"
            )));
        }
        if !inner.roles.iter().any(|r| r.id == user.role_id) {
            return Err(AppError::internal_error("Role does not exist"));
        }

        let created = User {
            id: UserId::new(),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            active: user.active,
            password_hash: user.password_hash,
            login_count: 0,
            fail_login_count: 0,
            last_login: None,
            created_on: Utc::now(),
        };
        inner.user_roles.push((created.id, user.role_id));
        inner.users.push(created.clone());

        Ok(created)
    }

    async fn user_roles(&self, id: UserId) -> Result<Vec<Role>, AppError> {
        let inner = self.inner.read().await;
        let mut roles: Vec<Role> = inner
            .user_roles
            .iter()
            .filter(|(user_id, _)| *user_id == id)
            .filter_map(|(_, role_id)| inner.roles.iter().find(|r| r.id == *role_id).cloned())
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn record_login(&self, id: UserId, success: bool) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.iter_mut().find(|u| u.id == id) else {
            return Err(AppError::not_found(anyhow::anyhow!("User not found")));
        };

        if success {
            user.login_count += 1;
            user.fail_login_count = 0;
            user.last_login = Some(Utc::now());
        } else {
            user.fail_login_count += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_role() -> (MemoryIdentityStore, Role) {
        let store = MemoryIdentityStore::new();
        let role = store.ensure_role("CompanyUser").await.unwrap();
        (store, role)
    }

    fn new_user(role_id: RoleId, username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            first_name: "Ana".to_string(),
            last_name: "Souza".to_string(),
            role_id,
            password_hash: None,
            active: true,
        }
    }

    #[tokio::test]
    async fn test_ensure_role_is_idempotent() {
        let (store, role) = store_with_role().await;
        let again = store.ensure_role("CompanyUser").await.unwrap();
        assert_eq!(role, again);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let (store, role) = store_with_role().await;
        store
            .add_user(new_user(role.id, "ana", "ana@example.com"))
            .await
            .unwrap();

        let err = store
            .add_user(new_user(role.id, "ana2", "ana@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.status, axum::http::StatusCode::CONFLICT);
        assert_eq!(store.users().await.len(), 1);
    }

    #[tokio::test]
    async fn test_user_roles_and_login_counters() {
        let (store, role) = store_with_role().await;
        let user = store
            .add_user(new_user(role.id, "ana", "ana@example.com"))
            .await
            .unwrap();

        assert_eq!(store.user_roles(user.id).await.unwrap(), vec![role]);

        store.record_login(user.id, false).await.unwrap();
        store.record_login(user.id, false).await.unwrap();
        let failed = store.find_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(failed.fail_login_count, 2);

        store.record_login(user.id, true).await.unwrap();
        let ok = store.find_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(ok.login_count, 1);
        assert_eq!(ok.fail_login_count, 0);
        assert!(ok.last_login.is_some());
    }
}
