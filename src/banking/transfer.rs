//! Idempotent SEPA transfer initiation.
//!
//! Validation happens before any network call, the token exchange before
//! the transfer. A gateway-level rejection (insufficient funds, invalid
//! IBAN) is a `Provider` error and must not be retried with a new
//! idempotency key: regenerating the key would defeat the only duplicate
//! safeguard.

use crate::error::{AppError, AppResult};
use tracing::info;
use uuid::Uuid;

use super::gateway::BankingGateway;
use super::types::{TransferRequest, TransferResult};

pub struct TransferInitiator<'a> {
    gateway: &'a dyn BankingGateway,
}

impl<'a> TransferInitiator<'a> {
    pub fn new(gateway: &'a dyn BankingGateway) -> Self {
        Self { gateway }
    }

    pub async fn initiate_transfer(&self, request: TransferRequest) -> AppResult<TransferResult> {
        validate_iban(&request.creditor_iban)?;
        if request.creditor_name.trim().is_empty() {
            return Err(AppError::validation(
                "creditor name is required",
                Some("creditor_name"),
            ));
        }
        request.amount.validate_positive("amount")?;

        let idempotency_key = request
            .idempotency_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let token = self.gateway.get_token().await?;

        info!(
            creditor = %request.creditor_name,
            amount = %request.amount.amount,
            currency = %request.amount.currency,
            idempotency_key = %idempotency_key,
            "initiating sepa credit transfer"
        );
        self.gateway
            .submit_sepa_transfer(&token, &request, &idempotency_key)
            .await
    }
}

/// Structural IBAN check: country code, check digits, 15-34 alphanumeric
/// characters. The gateway performs the authoritative validation.
fn validate_iban(iban: &str) -> AppResult<()> {
    let normalized: String = iban.chars().filter(|c| !c.is_whitespace()).collect();
    if normalized.is_empty() {
        return Err(AppError::validation(
            "creditor IBAN is required",
            Some("creditor_iban"),
        ));
    }
    let valid_shape = normalized.len() >= 15
        && normalized.len() <= 34
        && normalized.chars().take(2).all(|c| c.is_ascii_alphabetic())
        && normalized
            .chars()
            .skip(2)
            .take(2)
            .all(|c| c.is_ascii_digit())
        && normalized.chars().all(|c| c.is_ascii_alphanumeric());
    if !valid_shape {
        return Err(AppError::validation(
            format!("creditor IBAN has an invalid format: {}", iban),
            Some("creditor_iban"),
        ));
    }
    Ok(())
}
