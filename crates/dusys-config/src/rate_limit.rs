//! Rate limiting for the login endpoint.
//!
//! Login is the only unauthenticated endpoint that touches the identity
//! store, so it gets a per-client token bucket.
//!
//! # Configuration
//!
//! - `RATE_LIMIT_ENABLED`: turn the limiter on or off (default: `true`)
//! - `RATE_LIMIT_LOGIN_PER_SECOND`: seconds to replenish one request (default: 1)
//! - `RATE_LIMIT_LOGIN_BURST_SIZE`: bucket size (default: 10)
//!
//! The client key is taken from `X-Forwarded-For`/`X-Real-IP`/`Forwarded`
//! headers when present, falling back to the peer address, since the
//! gateway normally runs behind a reverse proxy.

use serde::{Deserialize, Serialize};
use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::SmartIpKeyExtractor;

use crate::error::ConfigError;

/// Rate limit configuration for the login endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub login_per_second: u64,
    pub login_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            login_per_second: 1,
            login_burst_size: 10,
        }
    }
}

impl RateLimitConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && (self.login_per_second == 0 || self.login_burst_size == 0) {
            return Err(ConfigError::Invalid(
                "rate limit period and burst size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Creates a `GovernorConfig` for the login endpoint.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let governor = settings.rate_limit.login_governor_config()?;
    ///
    /// let router = Router::new()
    ///     .route("/login/", get(login_page).post(login_submit))
    ///     .layer(GovernorLayer::new(Arc::new(governor)));
    /// ```
    pub fn login_governor_config(
        &self,
    ) -> Result<GovernorConfig<SmartIpKeyExtractor, ::governor::middleware::NoOpMiddleware>, ConfigError>
    {
        GovernorConfigBuilder::default()
            .per_second(self.login_per_second)
            .burst_size(self.login_burst_size)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| ConfigError::Invalid("failed to build login rate limiter".to_string()))
    }
}
