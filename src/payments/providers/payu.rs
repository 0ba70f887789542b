//! Local-currency-processor adapter.
//!
//! A single gateway call refunds a charge by id with the amount in minor
//! units. Currency defaults to the processor's native PLN when omitted.
//! No commerce sync on this path.

use crate::error::{AppError, AppResult};
use crate::http::{GatewayAuth, GatewayBody, GatewayHttpClient};
use crate::payments::provider::RefundProvider;
use crate::payments::types::{ProviderName, RefundRequest, RefundResult, RefundStatus};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct PayuConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl PayuConfig {
    pub fn from_env() -> AppResult<Self> {
        let api_key = std::env::var("PAYU_API_KEY").map_err(|_| {
            AppError::validation(
                "PAYU_API_KEY environment variable is required",
                Some("PAYU_API_KEY"),
            )
        })?;
        Ok(Self {
            api_key,
            base_url: std::env::var("PAYU_BASE_URL")
                .unwrap_or_else(|_| "https://secure.payu.com".to_string()),
            timeout_secs: std::env::var("PAYU_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        })
    }
}

pub struct PayuProvider {
    config: PayuConfig,
    http: GatewayHttpClient,
}

impl PayuProvider {
    pub fn new(config: PayuConfig) -> AppResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AppError::validation(
                "payu api key is required",
                Some("api_key"),
            ));
        }
        let http = GatewayHttpClient::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self { config, http })
    }

    pub fn from_env() -> AppResult<Self> {
        Self::new(PayuConfig::from_env()?)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

#[async_trait]
impl RefundProvider for PayuProvider {
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
        let currency = request
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| "PLN".to_string());

        let payload = serde_json::json!({
            "refund": {
                "amount": request.amount_minor,
                "currencyCode": currency,
                "description": request.reason.as_deref().unwrap_or("support desk refund"),
            }
        });

        let raw: PayuRefundEnvelope = self
            .http
            .request_json(
                "payu",
                reqwest::Method::POST,
                &self.endpoint(&format!("/api/v2_1/orders/{}/refunds", request.reference)),
                GatewayAuth::Bearer(&self.config.api_key),
                GatewayBody::Json(&payload),
                &[("Content-Type", "application/json")],
            )
            .await?;

        if raw.status.status_code != "SUCCESS" {
            return Err(AppError::Provider {
                provider: "payu".to_string(),
                message: raw
                    .status
                    .status_desc
                    .unwrap_or_else(|| raw.status.status_code.clone()),
                provider_code: Some(raw.status.status_code),
                retryable: false,
            });
        }

        let refund = raw.refund.ok_or_else(|| AppError::Provider {
            provider: "payu".to_string(),
            message: "missing refund object in response".to_string(),
            provider_code: None,
            retryable: false,
        })?;
        info!(
            charge = %request.reference,
            refund = %refund.refund_id,
            "payu refund issued"
        );

        Ok(RefundResult {
            provider: ProviderName::Payu,
            status: RefundStatus::Succeeded,
            refund_reference: refund.refund_id,
            amount_minor: request.amount_minor,
            currency,
            provider_data: None,
        })
    }

    fn name(&self) -> ProviderName {
        ProviderName::Payu
    }

    fn native_currency(&self) -> Option<&'static str> {
        Some("PLN")
    }

    fn requires_commerce_sync(&self) -> bool {
        false
    }
}

#[derive(Debug, Deserialize)]
struct PayuRefundEnvelope {
    status: PayuStatus,
    #[serde(default)]
    refund: Option<PayuRefundData>,
}

#[derive(Debug, Deserialize)]
struct PayuStatus {
    #[serde(rename = "statusCode")]
    status_code: String,
    #[serde(rename = "statusDesc", default)]
    status_desc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PayuRefundData {
    #[serde(rename = "refundId")]
    refund_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> PayuProvider {
        PayuProvider::new(PayuConfig {
            api_key: "key_test".to_string(),
            base_url: "https://secure.snd.payu.com".to_string(),
            timeout_secs: 5,
        })
        .expect("provider init should succeed")
    }

    #[tokio::test]
    async fn refund_rejects_empty_reference() {
        let result = provider()
            .refund(RefundRequest {
                reference: "".to_string(),
                amount_minor: 100,
                currency: None,
                order_id: None,
                reason: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn provider_defaults_to_pln_and_skips_sync() {
        let p = provider();
        assert_eq!(p.native_currency(), Some("PLN"));
        assert!(!p.requires_commerce_sync());
    }

    #[test]
    fn refund_envelope_deserializes() {
        let payload = serde_json::json!({
            "status": {"statusCode": "SUCCESS"},
            "refund": {"refundId": "5000000142", "status": "PENDING"}
        });
        let parsed: PayuRefundEnvelope =
            serde_json::from_value(payload).expect("envelope should deserialize");
        assert_eq!(parsed.status.status_code, "SUCCESS");
        assert_eq!(parsed.refund.unwrap().refund_id, "5000000142");
    }
}
