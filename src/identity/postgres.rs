use async_trait::async_trait;
use dusys_core::AppError;
use dusys_models::{NewUser, Role, RoleId, User, UserId};
use sqlx::PgPool;
use tracing::instrument;

use super::IdentityStore;

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, active, password_hash, \
     login_count, fail_login_count, last_login, created_on";

#[derive(Clone, Debug)]
pub struct PgIdentityStore {
    db: PgPool,
}

impl PgIdentityStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn find_user_where(&self, column: &str, value: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }
}

fn map_insert_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::conflict(anyhow::anyhow!("User with this email or username already exists"))
        }
        _ => AppError::database(err),
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.find_user_where("email", email).await
    }

    #[instrument(skip(self))]
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.find_user_where("username", username).await
    }

    #[instrument(skip(self))]
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_role(&self, name: &str) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.db)
            .await?;
        Ok(role)
    }

    #[instrument(skip(self))]
    async fn ensure_role(&self, name: &str) -> Result<Role, AppError> {
        let role = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (id, name) VALUES ($1, $2)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id, name",
        )
        .bind(RoleId::new())
        .bind(name)
        .fetch_one(&self.db)
        .await?;
        Ok(role)
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn add_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tx = self.db.begin().await?;

        let sql = format!(
            "INSERT INTO users (id, username, email, first_name, last_name, active, password_hash)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {USER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(UserId::new())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.active)
            .bind(&user.password_hash)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_insert_error)?;

        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(created.id)
            .bind(user.role_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    #[instrument(skip(self))]
    async fn user_roles(&self, id: UserId) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT r.id, r.name FROM roles r
             INNER JOIN user_roles ur ON ur.role_id = r.id
             WHERE ur.user_id = $1
             ORDER BY r.name",
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;
        Ok(roles)
    }

    #[instrument(skip(self))]
    async fn record_login(&self, id: UserId, success: bool) -> Result<(), AppError> {
        let sql = if success {
            "UPDATE users
             SET login_count = login_count + 1, fail_login_count = 0, last_login = NOW()
             WHERE id = $1"
        } else {
            "UPDATE users SET fail_login_count = fail_login_count + 1 WHERE id = $1"
        };

        sqlx::query(sql).bind(id).execute(&self.db).await?;
        Ok(())
    }
}
