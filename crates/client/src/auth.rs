//! API authentication boundary
//!
//! Token refresh flows live outside this crate; the transport only needs a
//! way to obtain a valid token per request.

use std::env;

use async_trait::async_trait;
use flock_domain::{ApiError, Result};

const ENV_TOKEN: &str = "FLOCK_API_TOKEN";

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token
    async fn access_token(&self) -> Result<String>;
}

/// Token provider backed by a fixed credential
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Wrap a token supplied by the caller
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    /// Read the token from `FLOCK_API_TOKEN`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Auth` when the variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        match env::var(ENV_TOKEN) {
            Ok(token) if !token.trim().is_empty() => Ok(Self::new(token)),
            _ => Err(ApiError::Auth(format!("{} is not set", ENV_TOKEN))),
        }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider_returns_token() {
        let provider = StaticTokenProvider::new("test-token");
        assert_eq!(provider.access_token().await.expect("token"), "test-token");
    }
}
