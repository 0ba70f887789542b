use crate::error::{AppError, AppResult};
use crate::payments::provider::RefundProvider;
use crate::payments::providers::{
    PaypalConfig, PaypalProvider, PayuConfig, PayuProvider, StripeConfig, StripeProvider,
};
use crate::payments::types::ProviderName;
use std::str::FromStr;

/// Per-call credential bundle for one provider. Credentials travel with
/// the request; the factory holds no secret state.
#[derive(Debug, Clone)]
pub enum ProviderCredentials {
    Stripe(StripeConfig),
    Paypal(PaypalConfig),
    Payu(PayuConfig),
}

impl ProviderCredentials {
    pub fn provider(&self) -> ProviderName {
        match self {
            ProviderCredentials::Stripe(_) => ProviderName::Stripe,
            ProviderCredentials::Paypal(_) => ProviderName::Paypal,
            ProviderCredentials::Payu(_) => ProviderName::Payu,
        }
    }
}

pub struct RefundProviderFactory {
    enabled_providers: Vec<ProviderName>,
}

impl RefundProviderFactory {
    pub fn with_enabled(enabled_providers: Vec<ProviderName>) -> Self {
        Self { enabled_providers }
    }

    pub fn from_env() -> AppResult<Self> {
        let enabled_raw = std::env::var("ENABLED_REFUND_PROVIDERS")
            .unwrap_or_else(|_| "stripe,paypal,payu".to_string());
        let mut enabled_providers = Vec::new();
        for part in enabled_raw.split(',') {
            let value = part.trim();
            if value.is_empty() {
                continue;
            }
            enabled_providers.push(ProviderName::from_str(value)?);
        }
        Ok(Self { enabled_providers })
    }

    pub fn build(&self, credentials: ProviderCredentials) -> AppResult<Box<dyn RefundProvider>> {
        let provider = credentials.provider();
        if !self.enabled_providers.contains(&provider) {
            return Err(AppError::validation(
                format!("provider {} is disabled", provider),
                Some("provider"),
            ));
        }

        match credentials {
            ProviderCredentials::Stripe(config) => Ok(Box::new(StripeProvider::new(config)?)),
            ProviderCredentials::Paypal(config) => Ok(Box::new(PaypalProvider::new(config)?)),
            ProviderCredentials::Payu(config) => Ok(Box::new(PayuProvider::new(config)?)),
        }
    }

    pub fn list_available_providers(&self) -> Vec<ProviderName> {
        self.enabled_providers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_builds_enabled_provider() {
        let factory = RefundProviderFactory::with_enabled(vec![ProviderName::Stripe]);
        let provider = factory
            .build(ProviderCredentials::Stripe(StripeConfig {
                secret_key: "sk_test".to_string(),
                ..Default::default()
            }))
            .expect("build should succeed");
        assert_eq!(provider.name(), ProviderName::Stripe);
    }

    #[test]
    fn factory_rejects_disabled_provider() {
        let factory = RefundProviderFactory::with_enabled(vec![ProviderName::Stripe]);
        let result = factory.build(ProviderCredentials::Payu(PayuConfig {
            api_key: "key".to_string(),
            base_url: "https://secure.payu.com".to_string(),
            timeout_secs: 5,
        }));
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn list_available_providers_returns_enabled() {
        let factory =
            RefundProviderFactory::with_enabled(vec![ProviderName::Stripe, ProviderName::Paypal]);
        assert_eq!(factory.list_available_providers().len(), 2);
    }
}
