//! Connection-credential bundles.
//!
//! One deployment serves multiple commerce-backend tenants, so credentials
//! are explicit per-call value objects rather than process-global state.
//! The `from_env` constructors are a single-tenant convenience only.

use std::env;

/// Credentials for one commerce-backend tenant (REST basic auth).
#[derive(Debug, Clone)]
pub struct CommerceCredentials {
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub timeout_secs: u64,
}

impl CommerceCredentials {
    pub fn new(base_url: &str, consumer_key: &str, consumer_secret: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            consumer_key: consumer_key.to_string(),
            consumer_secret: consumer_secret.to_string(),
            timeout_secs: 30,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv().ok();
        Ok(Self {
            base_url: env::var("COMMERCE_BASE_URL")
                .map_err(|_| ConfigError::MissingVariable("COMMERCE_BASE_URL".to_string()))?
                .trim_end_matches('/')
                .to_string(),
            consumer_key: env::var("COMMERCE_CONSUMER_KEY")
                .map_err(|_| ConfigError::MissingVariable("COMMERCE_CONSUMER_KEY".to_string()))?,
            consumer_secret: env::var("COMMERCE_CONSUMER_SECRET")
                .map_err(|_| ConfigError::MissingVariable("COMMERCE_CONSUMER_SECRET".to_string()))?,
            timeout_secs: env::var("COMMERCE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "commerce base_url must be a valid URL".to_string(),
            ));
        }
        if self.consumer_key.is_empty() || self.consumer_secret.is_empty() {
            return Err(ConfigError::InvalidValue(
                "commerce consumer key and secret are required".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "commerce timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Client credentials for the banking gateway's OAuth token endpoint and
/// its SEPA payments API.
#[derive(Debug, Clone)]
pub struct BankingCredentials {
    pub token_url: String,
    pub api_base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub timeout_secs: u64,
}

impl BankingCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv().ok();
        Ok(Self {
            token_url: env::var("BANKING_TOKEN_URL")
                .map_err(|_| ConfigError::MissingVariable("BANKING_TOKEN_URL".to_string()))?,
            api_base_url: env::var("BANKING_API_BASE_URL")
                .map_err(|_| ConfigError::MissingVariable("BANKING_API_BASE_URL".to_string()))?
                .trim_end_matches('/')
                .to_string(),
            client_id: env::var("BANKING_CLIENT_ID")
                .map_err(|_| ConfigError::MissingVariable("BANKING_CLIENT_ID".to_string()))?,
            client_secret: env::var("BANKING_CLIENT_SECRET")
                .map_err(|_| ConfigError::MissingVariable("BANKING_CLIENT_SECRET".to_string()))?,
            timeout_secs: env::var("BANKING_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_url.is_empty() || self.api_base_url.is_empty() {
            return Err(ConfigError::InvalidValue(
                "banking token_url and api_base_url are required".to_string(),
            ));
        }
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(ConfigError::InvalidValue(
                "banking client_id and client_secret are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),

    #[error("Invalid value for configuration: {0}")]
    InvalidValue(String),
}

impl From<ConfigError> for crate::error::AppError {
    fn from(err: ConfigError) -> Self {
        crate::error::AppError::validation(err.to_string(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commerce_credentials_validation() {
        let creds = CommerceCredentials::new("https://shop.example.com", "ck_test", "cs_test");
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn commerce_credentials_reject_bad_url() {
        let creds = CommerceCredentials::new("shop.example.com", "ck_test", "cs_test");
        assert!(creds.validate().is_err());
    }

    #[test]
    fn commerce_credentials_trim_trailing_slash() {
        let creds = CommerceCredentials::new("https://shop.example.com/", "ck", "cs");
        assert_eq!(creds.base_url, "https://shop.example.com");
    }

    #[test]
    fn banking_credentials_require_client_pair() {
        let creds = BankingCredentials {
            token_url: "https://bank.example.com/oauth/token".to_string(),
            api_base_url: "https://bank.example.com/api".to_string(),
            client_id: "".to_string(),
            client_secret: "secret".to_string(),
            timeout_secs: 30,
        };
        assert!(creds.validate().is_err());
    }
}
