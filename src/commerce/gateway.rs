//! Commerce-backend client.
//!
//! Thin abstraction over the backend's order REST API. The trait is the
//! seam everything above it consumes; the HTTP implementation authenticates
//! with a per-tenant consumer key/secret pair passed in as credentials.

use crate::config::CommerceCredentials;
use crate::error::{AppError, AppResult};
use crate::http::{GatewayAuth, GatewayBody, GatewayHttpClient};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use super::types::{Order, OrderPatch};

pub const COMMERCE_SYSTEM: &str = "commerce";

#[async_trait]
pub trait CommerceGateway: Send + Sync {
    async fn get_order(&self, order_id: u64) -> AppResult<Order>;

    /// Applies a partial update. Returns the backend's refreshed order
    /// representation. A rejection is an `Upstream` error carrying the
    /// backend's raw message; the write may have partially applied, so it
    /// is never retried here.
    async fn put_order(&self, order_id: u64, patch: &OrderPatch) -> AppResult<Order>;

    /// Attaches a human-readable note to an order.
    async fn add_order_note(&self, order_id: u64, note: &str) -> AppResult<()>;
}

pub struct HttpCommerceGateway {
    credentials: CommerceCredentials,
    http: GatewayHttpClient,
}

impl HttpCommerceGateway {
    pub fn new(credentials: CommerceCredentials) -> AppResult<Self> {
        credentials.validate()?;
        let http = GatewayHttpClient::new(Duration::from_secs(credentials.timeout_secs))?;
        Ok(Self { credentials, http })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.credentials.base_url, path)
    }

    fn auth(&self) -> GatewayAuth<'_> {
        GatewayAuth::Basic(
            &self.credentials.consumer_key,
            &self.credentials.consumer_secret,
        )
    }

    /// The shared client shapes rejected writes as `Provider`; on this
    /// gateway they are upstream commerce failures, and a 404 is a missing
    /// order.
    fn map_error(err: AppError, order_id: u64) -> AppError {
        match err {
            AppError::Provider {
                message,
                provider_code,
                ..
            } => {
                if provider_code.as_deref() == Some("404") {
                    AppError::not_found("order", order_id.to_string())
                } else {
                    AppError::Upstream {
                        system: COMMERCE_SYSTEM.to_string(),
                        message,
                    }
                }
            }
            other => other,
        }
    }
}

#[async_trait]
impl CommerceGateway for HttpCommerceGateway {
    async fn get_order(&self, order_id: u64) -> AppResult<Order> {
        self.http
            .request_json(
                COMMERCE_SYSTEM,
                reqwest::Method::GET,
                &self.endpoint(&format!("/orders/{}", order_id)),
                self.auth(),
                GatewayBody::Empty,
                &[],
            )
            .await
            .map_err(|e| Self::map_error(e, order_id))
    }

    async fn put_order(&self, order_id: u64, patch: &OrderPatch) -> AppResult<Order> {
        let payload = serde_json::to_value(patch).map_err(|e| AppError::Upstream {
            system: COMMERCE_SYSTEM.to_string(),
            message: format!("failed to serialize order patch: {}", e),
        })?;

        let order: Order = self
            .http
            .request_json(
                COMMERCE_SYSTEM,
                reqwest::Method::PUT,
                &self.endpoint(&format!("/orders/{}", order_id)),
                self.auth(),
                GatewayBody::Json(&payload),
                &[("Content-Type", "application/json")],
            )
            .await
            .map_err(|e| Self::map_error(e, order_id))?;

        info!(order_id, status = %order.status, "commerce order updated");
        Ok(order)
    }

    async fn add_order_note(&self, order_id: u64, note: &str) -> AppResult<()> {
        let payload = serde_json::json!({ "note": note });
        let _: serde_json::Value = self
            .http
            .request_json(
                COMMERCE_SYSTEM,
                reqwest::Method::POST,
                &self.endpoint(&format!("/orders/{}/notes", order_id)),
                self.auth(),
                GatewayBody::Json(&payload),
                &[("Content-Type", "application/json")],
            )
            .await
            .map_err(|e| Self::map_error(e, order_id))?;

        info!(order_id, "commerce order note recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CommerceCredentials;

    #[test]
    fn gateway_rejects_invalid_credentials() {
        let creds = CommerceCredentials::new("not-a-url", "ck", "cs");
        assert!(HttpCommerceGateway::new(creds).is_err());
    }

    #[test]
    fn provider_404_maps_to_not_found() {
        let err = HttpCommerceGateway::map_error(
            AppError::Provider {
                provider: COMMERCE_SYSTEM.to_string(),
                message: "HTTP 404".to_string(),
                provider_code: Some("404".to_string()),
                retryable: false,
            },
            99,
        );
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn provider_rejection_maps_to_upstream() {
        let err = HttpCommerceGateway::map_error(
            AppError::Provider {
                provider: COMMERCE_SYSTEM.to_string(),
                message: "HTTP 400: invalid line item".to_string(),
                provider_code: Some("400".to_string()),
                retryable: false,
            },
            99,
        );
        match err {
            AppError::Upstream { system, message } => {
                assert_eq!(system, COMMERCE_SYSTEM);
                assert!(message.contains("invalid line item"));
            }
            other => panic!("expected Upstream, got {:?}", other),
        }
    }
}
