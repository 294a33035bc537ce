//! Gateway configuration
//!
//! Settings come from environment variables, with .env files loaded at
//! startup so actual environment variables override .env values. The
//! upstream credential is injected here once; no other module reads the
//! environment.
//!
//! # Example
//! ```rust,no_run
//! use elevenlabs_gateway::config::GatewayConfig;
//!
//! # fn main() -> Result<(), String> {
//! let config = GatewayConfig::from_env()?;
//! println!("routing to {}", config.base_url);
//! # Ok(())
//! # }
//! ```

use url::Url;
use zeroize::Zeroize;

use crate::core::request::RequestContext;

/// Upstream API root used when `ELEVENLABS_BASE_URL` is not set
pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

/// Total deadline for buffered requests, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection establishment deadline, in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Runtime settings for the gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Upstream credential sent as the `xi-api-key` header
    pub api_key: String,
    /// Upstream API root; override to point at a proxy or mock
    pub base_url: String,
    /// Total deadline for buffered requests (streams are exempt)
    pub request_timeout_secs: u64,
    /// Connection establishment deadline, applied to every request
    pub connect_timeout_secs: u64,
}

/// Clear the credential from memory when the config is dropped
impl Drop for GatewayConfig {
    fn drop(&mut self) {
        self.api_key.zeroize();
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables
    ///
    /// `ELEVENLABS_API_KEY` is required. `ELEVENLABS_BASE_URL`,
    /// `ELEVENLABS_REQUEST_TIMEOUT_SECS`, and
    /// `ELEVENLABS_CONNECT_TIMEOUT_SECS` fall back to defaults when unset
    /// or unparsable. The result is validated before being returned.
    pub fn from_env() -> Result<Self, String> {
        let api_key = std::env::var("ELEVENLABS_API_KEY")
            .map_err(|_| "ELEVENLABS_API_KEY not set in environment".to_string())?;
        let base_url =
            std::env::var("ELEVENLABS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let request_timeout_secs = parse_env_u64(
            "ELEVENLABS_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        );
        let connect_timeout_secs = parse_env_u64(
            "ELEVENLABS_CONNECT_TIMEOUT_SECS",
            DEFAULT_CONNECT_TIMEOUT_SECS,
        );

        let config = Self {
            api_key,
            base_url,
            request_timeout_secs,
            connect_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values that cannot work at runtime
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("ELEVENLABS_API_KEY must not be empty".to_string());
        }
        let url = Url::parse(&self.base_url)
            .map_err(|e| format!("invalid base URL '{}': {e}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "base URL '{}' must use http or https",
                self.base_url
            ));
        }
        if url.host_str().is_none() {
            return Err(format!("base URL '{}' has no host", self.base_url));
        }
        if self.request_timeout_secs == 0 {
            return Err("ELEVENLABS_REQUEST_TIMEOUT_SECS must be positive".to_string());
        }
        if self.connect_timeout_secs == 0 {
            return Err("ELEVENLABS_CONNECT_TIMEOUT_SECS must be positive".to_string());
        }
        Ok(())
    }

    /// The credential and base URL in the form the request builder consumes
    pub fn request_context(&self) -> RequestContext {
        RequestContext::new(self.base_url.as_str(), self.api_key.as_str())
    }
}

fn parse_env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use std::env;

    use super::*;

    fn clear_gateway_env() {
        unsafe {
            env::remove_var("ELEVENLABS_API_KEY");
            env::remove_var("ELEVENLABS_BASE_URL");
            env::remove_var("ELEVENLABS_REQUEST_TIMEOUT_SECS");
            env::remove_var("ELEVENLABS_CONNECT_TIMEOUT_SECS");
        }
    }

    fn test_config() -> GatewayConfig {
        GatewayConfig {
            api_key: "test-key".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }

    #[test]
    #[serial]
    fn test_from_env_requires_api_key() {
        clear_gateway_env();
        let result = GatewayConfig::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("ELEVENLABS_API_KEY"));
    }

    #[test]
    #[serial]
    fn test_from_env_applies_defaults() {
        clear_gateway_env();
        unsafe {
            env::set_var("ELEVENLABS_API_KEY", "test-key");
        }

        let config = GatewayConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);

        clear_gateway_env();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_gateway_env();
        unsafe {
            env::set_var("ELEVENLABS_API_KEY", "test-key");
            env::set_var("ELEVENLABS_BASE_URL", "http://localhost:9000");
            env::set_var("ELEVENLABS_REQUEST_TIMEOUT_SECS", "120");
            env::set_var("ELEVENLABS_CONNECT_TIMEOUT_SECS", "3");
        }

        let config = GatewayConfig::from_env().unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.connect_timeout_secs, 3);

        clear_gateway_env();
    }

    #[test]
    #[serial]
    fn test_unparsable_timeout_falls_back_to_default() {
        clear_gateway_env();
        unsafe {
            env::set_var("ELEVENLABS_API_KEY", "test-key");
            env::set_var("ELEVENLABS_REQUEST_TIMEOUT_SECS", "not-a-number");
        }

        let config = GatewayConfig::from_env().unwrap();
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);

        clear_gateway_env();
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let mut config = test_config();
        config.api_key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = test_config();
        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.base_url = "ftp://api.elevenlabs.io".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("http"));
    }

    #[test]
    fn test_validate_rejects_zero_timeouts() {
        let mut config = test_config();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.connect_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_request_context_carries_credential() {
        let config = test_config();
        let context = config.request_context();
        assert_eq!(context.base_url, DEFAULT_BASE_URL);
        assert_eq!(context.api_key, "test-key");
    }
}
