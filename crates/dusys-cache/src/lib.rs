//! # Dusys Cache
//!
//! Redis client used for server-side sessions.
//!
//! - [`redis`]: connection management and JSON get/set/delete
//! - [`keys`]: key derivation
//!
//! # Example
//!
//! ```ignore
//! use dusys_cache::{RedisCache, keys};
//!
//! let cache = RedisCache::new(&redis_url).await?;
//! let key = keys::session(&settings.cache.key_prefix, &session_id);
//! cache.set_with_ttl(&key, &data, Duration::from_secs(3600)).await?;
//! let data: Option<SessionData> = cache.get(&key).await?;
//! ```

pub mod keys;
pub mod redis;

pub use redis::{CacheError, RedisCache};
