//! Banking-gateway client: OAuth client-credentials exchange and SEPA
//! credit-transfer submission.

use crate::config::BankingCredentials;
use crate::error::{AppError, AppResult};
use crate::http::{GatewayAuth, GatewayBody, GatewayHttpClient};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use super::types::{BearerToken, TransferRequest, TransferResult};

pub const BANKING_GATEWAY: &str = "banking";

#[async_trait]
pub trait BankingGateway: Send + Sync {
    /// Exchanges client credentials for a bearer token scoped to payments.
    /// Any failure here is an `Auth` error, distinct from a payment
    /// rejection.
    async fn get_token(&self) -> AppResult<BearerToken>;

    /// Submits a SEPA credit transfer. The gateway treats repeated
    /// submissions with the same idempotency key as a single transfer.
    async fn submit_sepa_transfer(
        &self,
        token: &BearerToken,
        request: &TransferRequest,
        idempotency_key: &str,
    ) -> AppResult<TransferResult>;
}

pub struct HttpBankingGateway {
    credentials: BankingCredentials,
    http: GatewayHttpClient,
}

impl HttpBankingGateway {
    pub fn new(credentials: BankingCredentials) -> AppResult<Self> {
        credentials.validate()?;
        let http = GatewayHttpClient::new(Duration::from_secs(credentials.timeout_secs))?;
        Ok(Self { credentials, http })
    }
}

#[async_trait]
impl BankingGateway for HttpBankingGateway {
    async fn get_token(&self) -> AppResult<BearerToken> {
        let fields = [("grant_type", "client_credentials"), ("scope", "payments")];

        let token: BearerToken = self
            .http
            .request_json(
                BANKING_GATEWAY,
                reqwest::Method::POST,
                &self.credentials.token_url,
                GatewayAuth::Basic(&self.credentials.client_id, &self.credentials.client_secret),
                GatewayBody::Form(&fields),
                &[],
            )
            .await
            .map_err(|e| match e {
                // The token endpoint reports credential problems as plain
                // 400s; they are still authentication failures.
                AppError::Provider { message, .. } => AppError::Auth {
                    gateway: BANKING_GATEWAY.to_string(),
                    message,
                },
                other => other,
            })?;

        info!("banking gateway token acquired");
        Ok(token)
    }

    async fn submit_sepa_transfer(
        &self,
        token: &BearerToken,
        request: &TransferRequest,
        idempotency_key: &str,
    ) -> AppResult<TransferResult> {
        let payload = serde_json::json!({
            "instructedAmount": {
                "currency": request.amount.currency,
                "amount": request.amount.amount,
            },
            "creditorAccount": { "iban": request.creditor_iban },
            "creditorName": request.creditor_name,
            "remittanceInformationUnstructured": request.remittance_info,
        });

        let raw: SepaTransferData = self
            .http
            .request_json(
                BANKING_GATEWAY,
                reqwest::Method::POST,
                &format!("{}/v1/payments/sepa-credit-transfers", self.credentials.api_base_url),
                GatewayAuth::Bearer(&token.access_token),
                GatewayBody::Json(&payload),
                &[
                    ("Content-Type", "application/json"),
                    ("X-Request-ID", idempotency_key),
                ],
            )
            .await?;

        info!(
            payment = %raw.payment_id,
            status = %raw.transaction_status,
            "sepa credit transfer submitted"
        );

        Ok(TransferResult {
            payment_reference: raw.payment_id,
            status: raw.transaction_status,
            idempotency_key: idempotency_key.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SepaTransferData {
    #[serde(rename = "paymentId")]
    payment_id: String,
    #[serde(rename = "transactionStatus")]
    transaction_status: String,
}
