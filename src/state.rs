use std::sync::Arc;

use anyhow::Context;
use dusys_auth::TokenVerifier;
use dusys_cache::RedisCache;
use dusys_config::{ConfigError, SessionBackend, Settings};
use dusys_db::{init_db_pool, run_migrations};
use governor::middleware::NoOpMiddleware;
use tower_governor::governor::GovernorConfig;
use tower_governor::key_extractor::SmartIpKeyExtractor;
use tracing::info;

use crate::identity::{IdentityStore, PgIdentityStore};
use crate::session::{MemorySessionStore, RedisSessionStore, SessionStore};

pub type LoginGovernorConfig = GovernorConfig<SmartIpKeyExtractor, NoOpMiddleware>;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub identity: Arc<dyn IdentityStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub token_verifier: TokenVerifier,
    pub login_governor: Option<Arc<LoginGovernorConfig>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("session_backend", &self.settings.session.backend)
            .field("auto_login_enabled", &self.settings.auth.auto_login.enabled)
            .field("rate_limited", &self.login_governor.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Assembles the state from already-built stores.
    pub fn new(
        settings: Settings,
        identity: Arc<dyn IdentityStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, ConfigError> {
        let token_verifier = TokenVerifier::new(&settings.auth.auto_login.secret);
        let login_governor = if settings.rate_limit.enabled {
            Some(Arc::new(settings.rate_limit.login_governor_config()?))
        } else {
            None
        };

        Ok(Self {
            settings: Arc::new(settings),
            identity,
            sessions,
            token_verifier,
            login_governor,
        })
    }
}

/// Connects to PostgreSQL (and Redis, for the Redis session backend),
/// applies migrations and builds the state.
pub async fn init_app_state(settings: Settings) -> anyhow::Result<AppState> {
    let pool = init_db_pool(&settings.database)
        .await
        .context("failed to connect to the database")?;
    run_migrations(&pool)
        .await
        .context("failed to apply migrations")?;

    let identity: Arc<dyn IdentityStore> = Arc::new(PgIdentityStore::new(pool));

    let sessions: Arc<dyn SessionStore> = match settings.session.backend {
        SessionBackend::Redis => {
            let url = settings.cache.redis_url(&settings.redis);
            let cache = RedisCache::new(&url)
                .await
                .context("failed to connect to Redis")?;
            info!(host = %settings.redis.host, db = %settings.cache.redis_db, "Using Redis session store");
            Arc::new(RedisSessionStore::new(cache, settings.cache.key_prefix.clone()))
        }
        SessionBackend::Memory => {
            info!("Using in-memory session store");
            Arc::new(MemorySessionStore::new())
        }
    };

    Ok(AppState::new(settings, identity, sessions)?)
}
