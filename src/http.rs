//! Shared HTTP client for gateway calls.
//!
//! Every external call in this crate is a single request/response: there is
//! no internal retry loop. A blind retry risks duplicate refunds or
//! duplicate line mutations, so retries belong to the caller, who knows
//! which operations are idempotent.

use crate::error::{AppError, AppResult};
use base64::Engine;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;

/// Authentication scheme attached to an outgoing gateway request.
pub enum GatewayAuth<'a> {
    Bearer(&'a str),
    /// HTTP Basic from an id/secret pair (commerce consumer keys, OAuth
    /// client-credential exchanges).
    Basic(&'a str, &'a str),
    None,
}

/// Request body variants the gateways in this crate speak.
pub enum GatewayBody<'a> {
    Json(&'a JsonValue),
    Form(&'a [(&'a str, &'a str)]),
    Empty,
}

#[derive(Clone)]
pub struct GatewayHttpClient {
    client: Client,
}

impl GatewayHttpClient {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Upstream {
                system: "http".to_string(),
                message: format!("failed to initialize HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    /// Issues a single request and deserializes a JSON response body.
    ///
    /// `system` names the gateway for error attribution. Non-2xx responses
    /// are mapped to `Provider` with the raw body preserved for operator
    /// diagnosis; 401/403 map to `Auth`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        system: &str,
        method: reqwest::Method,
        url: &str,
        auth: GatewayAuth<'_>,
        body: GatewayBody<'_>,
        additional_headers: &[(&str, &str)],
    ) -> AppResult<T> {
        let mut request = self.client.request(method, url);

        match auth {
            GatewayAuth::Bearer(token) => {
                request = request.bearer_auth(token);
            }
            GatewayAuth::Basic(id, secret) => {
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", id, secret));
                request = request.header("Authorization", format!("Basic {}", encoded));
            }
            GatewayAuth::None => {}
        }
        for (k, v) in additional_headers {
            request = request.header(*k, *v);
        }
        match body {
            GatewayBody::Json(payload) => {
                request = request.json(payload);
            }
            GatewayBody::Form(fields) => {
                request = request.form(fields);
            }
            GatewayBody::Empty => {}
        }

        let response = request.send().await.map_err(|e| AppError::Upstream {
            system: system.to_string(),
            message: format!("request failed: {}", e),
        })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if status.is_success() {
            return serde_json::from_str::<T>(&text).map_err(|e| AppError::Provider {
                provider: system.to_string(),
                message: format!("invalid JSON response: {}", e),
                provider_code: None,
                retryable: false,
            });
        }

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AppError::Auth {
                gateway: system.to_string(),
                message: format!("HTTP {}: {}", status, text),
            });
        }

        Err(AppError::Provider {
            provider: system.to_string(),
            message: format!("HTTP {}: {}", status, text),
            provider_code: Some(status.as_u16().to_string()),
            retryable: status.is_server_error(),
        })
    }
}
