//! Wallet-processor adapter.
//!
//! Refunds are issued by capture reference with an explicit amount and
//! currency; there is no native-currency default. The wallet ledger is
//! treated as authoritative: a successful refund is never mirrored to the
//! commerce backend on this path.

use crate::error::{AppError, AppResult};
use crate::http::{GatewayAuth, GatewayBody, GatewayHttpClient};
use crate::payments::provider::RefundProvider;
use crate::payments::types::{format_major_units, ProviderName, RefundRequest, RefundResult, RefundStatus};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct PaypalConfig {
    pub client_id: String,
    pub client_secret: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl PaypalConfig {
    pub fn from_env() -> AppResult<Self> {
        let client_id = std::env::var("PAYPAL_CLIENT_ID").unwrap_or_default();
        let client_secret = std::env::var("PAYPAL_CLIENT_SECRET").unwrap_or_default();
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(AppError::validation(
                "PAYPAL_CLIENT_ID and PAYPAL_CLIENT_SECRET are required",
                Some("paypal"),
            ));
        }
        Ok(Self {
            client_id,
            client_secret,
            base_url: std::env::var("PAYPAL_BASE_URL")
                .unwrap_or_else(|_| "https://api-m.paypal.com".to_string()),
            timeout_secs: std::env::var("PAYPAL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        })
    }
}

pub struct PaypalProvider {
    config: PaypalConfig,
    http: GatewayHttpClient,
}

impl PaypalProvider {
    pub fn new(config: PaypalConfig) -> AppResult<Self> {
        if config.client_id.trim().is_empty() || config.client_secret.trim().is_empty() {
            return Err(AppError::validation(
                "paypal client credentials are required",
                Some("client_id"),
            ));
        }
        let http = GatewayHttpClient::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self { config, http })
    }

    pub fn from_env() -> AppResult<Self> {
        Self::new(PaypalConfig::from_env()?)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

#[async_trait]
impl RefundProvider for PaypalProvider {
    async fn refund(&self, request: RefundRequest) -> AppResult<RefundResult> {
        if request.reference.trim().is_empty() {
            return Err(AppError::validation(
                "capture reference is required",
                Some("reference"),
            ));
        }
        if request.amount_minor <= 0 {
            return Err(AppError::validation(
                "amount must be greater than zero",
                Some("amount_minor"),
            ));
        }
        let currency = request
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                AppError::validation(
                    "currency is required for wallet refunds",
                    Some("currency"),
                )
            })?
            .to_uppercase();

        let payload = serde_json::json!({
            "amount": {
                "value": format_major_units(request.amount_minor),
                "currency_code": currency,
            },
            "note_to_payer": request.reason,
        });

        let raw: PaypalRefundData = self
            .http
            .request_json(
                "paypal",
                reqwest::Method::POST,
                &self.endpoint(&format!("/v2/payments/captures/{}/refund", request.reference)),
                GatewayAuth::Basic(&self.config.client_id, &self.config.client_secret),
                GatewayBody::Json(&payload),
                &[("Content-Type", "application/json")],
            )
            .await?;

        let status = match raw.status.as_str() {
            "COMPLETED" | "PENDING" => RefundStatus::Succeeded,
            _ => RefundStatus::Failed,
        };
        info!(
            capture = %request.reference,
            refund = %raw.id,
            status = %raw.status,
            "paypal refund issued"
        );

        Ok(RefundResult {
            provider: ProviderName::Paypal,
            status,
            refund_reference: raw.id,
            amount_minor: request.amount_minor,
            currency,
            provider_data: None,
        })
    }

    fn name(&self) -> ProviderName {
        ProviderName::Paypal
    }

    fn native_currency(&self) -> Option<&'static str> {
        None
    }

    fn requires_commerce_sync(&self) -> bool {
        false
    }
}

#[derive(Debug, Deserialize)]
struct PaypalRefundData {
    id: String,
    status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> PaypalProvider {
        PaypalProvider::new(PaypalConfig {
            client_id: "client_test".to_string(),
            client_secret: "secret_test".to_string(),
            base_url: "https://api-m.sandbox.paypal.com".to_string(),
            timeout_secs: 5,
        })
        .expect("provider init should succeed")
    }

    #[tokio::test]
    async fn refund_requires_currency() {
        let result = provider()
            .refund(RefundRequest {
                reference: "CAP-1".to_string(),
                amount_minor: 500,
                currency: None,
                order_id: None,
                reason: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn provider_has_no_native_currency_and_no_sync() {
        let p = provider();
        assert!(p.native_currency().is_none());
        assert!(!p.requires_commerce_sync());
    }
}
