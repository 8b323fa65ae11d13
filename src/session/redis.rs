use std::time::Duration;

use async_trait::async_trait;
use dusys_cache::{RedisCache, keys};
use dusys_core::AppError;
use dusys_models::SessionData;
use tracing::warn;

use super::SessionStore;

/// Sessions stored in Redis under `{prefix}session:{sha256(id)}`.
#[derive(Clone, Debug)]
pub struct RedisSessionStore {
    cache: RedisCache,
    prefix: String,
}

impl RedisSessionStore {
    pub fn new(cache: RedisCache, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }

    fn key(&self, id: &str) -> String {
        keys::session(&self.prefix, id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: &str) -> Result<Option<SessionData>, AppError> {
        let key = self.key(id);
        match self.cache.get::<SessionData>(&key).await {
            Ok(data) => Ok(data),
            Err(dusys_cache::CacheError::Serialization(e)) => {
                warn!(error = %e, "Discarding unreadable session");
                self.cache.invalidate(&key).await?;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, id: &str, data: &SessionData, ttl: Duration) -> Result<(), AppError> {
        self.cache.set_with_ttl(&self.key(id), data, ttl).await?;
        Ok(())
    }

    async fn destroy(&self, id: &str) -> Result<(), AppError> {
        self.cache.invalidate(&self.key(id)).await?;
        Ok(())
    }
}
