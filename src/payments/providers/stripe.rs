//! Card-processor adapter.
//!
//! Refunds are issued by charge id with the amount in minor units. The
//! commerce-order sync that follows a successful card refund belongs to the
//! orchestrator, not to this adapter; `requires_commerce_sync` flags it.

use crate::error::{AppError, AppResult};
use crate::http::{GatewayAuth, GatewayBody, GatewayHttpClient};
use crate::payments::provider::RefundProvider;
use crate::payments::types::{ProviderName, RefundRequest, RefundResult, RefundStatus};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            base_url: "https://api.stripe.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl StripeConfig {
    pub fn from_env() -> AppResult<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY").map_err(|_| {
            AppError::validation(
                "STRIPE_SECRET_KEY environment variable is required",
                Some("STRIPE_SECRET_KEY"),
            )
        })?;

        Ok(Self {
            secret_key,
            base_url: std::env::var("STRIPE_BASE_URL")
                .unwrap_or_else(|_| "https://api.stripe.com".to_string()),
            timeout_secs: std::env::var("STRIPE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        })
    }
}

pub struct StripeProvider {
    config: StripeConfig,
    http: GatewayHttpClient,
}

impl StripeProvider {
    pub fn new(config: StripeConfig) -> AppResult<Self> {
        if config.secret_key.trim().is_empty() {
            return Err(AppError::validation(
                "stripe secret key is required",
                Some("secret_key"),
            ));
        }
        let http = GatewayHttpClient::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self { config, http })
    }

    pub fn from_env() -> AppResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

#[async_trait]
impl RefundProvider for StripeProvider {
    async fn refund(&self, request: RefundRequest) -> AppResult<RefundResult> {
        if request.reference.trim().is_empty() {
            return Err(AppError::validation(
                "charge reference is required",
                Some("reference"),
            ));
        }
        if request.amount_minor <= 0 {
            return Err(AppError::validation(
                "amount must be greater than zero",
                Some("amount_minor"),
            ));
        }

        let amount = request.amount_minor.to_string();
        let fields: Vec<(&str, &str)> =
            vec![("charge", request.reference.as_str()), ("amount", &amount)];

        let raw: StripeRefundData = self
            .http
            .request_json(
                "stripe",
                reqwest::Method::POST,
                &self.endpoint("/v1/refunds"),
                GatewayAuth::Bearer(&self.config.secret_key),
                GatewayBody::Form(&fields),
                &[],
            )
            .await?;

        let status = match raw.status.as_str() {
            "succeeded" | "pending" => RefundStatus::Succeeded,
            _ => RefundStatus::Failed,
        };
        info!(
            charge = %request.reference,
            refund = %raw.id,
            status = %raw.status,
            "stripe refund issued"
        );

        Ok(RefundResult {
            provider: ProviderName::Stripe,
            status,
            refund_reference: raw.id,
            amount_minor: raw.amount,
            currency: raw.currency.to_uppercase(),
            provider_data: None,
        })
    }

    fn name(&self) -> ProviderName {
        ProviderName::Stripe
    }

    fn native_currency(&self) -> Option<&'static str> {
        Some("EUR")
    }

    fn requires_commerce_sync(&self) -> bool {
        true
    }
}

#[derive(Debug, Deserialize)]
struct StripeRefundData {
    id: String,
    status: String,
    amount: i64,
    currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> StripeProvider {
        StripeProvider::new(StripeConfig {
            secret_key: "sk_test".to_string(),
            base_url: "https://api.stripe.com".to_string(),
            timeout_secs: 5,
        })
        .expect("provider init should succeed")
    }

    #[tokio::test]
    async fn refund_rejects_empty_reference_without_network() {
        let result = provider()
            .refund(RefundRequest {
                reference: "  ".to_string(),
                amount_minor: 500,
                currency: None,
                order_id: None,
                reason: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn refund_rejects_non_positive_amount() {
        let result = provider()
            .refund(RefundRequest {
                reference: "ch_1".to_string(),
                amount_minor: 0,
                currency: None,
                order_id: None,
                reason: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn provider_requires_commerce_sync() {
        assert!(provider().requires_commerce_sync());
        assert_eq!(provider().name(), ProviderName::Stripe);
    }
}
