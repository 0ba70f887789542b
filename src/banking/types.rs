use crate::payments::types::Money;
use serde::{Deserialize, Serialize};

/// A SEPA credit-transfer instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub creditor_iban: String,
    pub creditor_name: String,
    pub amount: Money,
    pub remittance_info: Option<String>,
    /// Propagated from an upstream request-tracing identifier, or left
    /// `None` to have a fresh key generated. The key is the only safeguard
    /// against duplicate transfers on client-side retry.
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResult {
    /// Gateway-assigned payment reference.
    pub payment_reference: String,
    /// Gateway transaction status ("RCVD", "ACCP", ...).
    pub status: String,
    /// The idempotency key the transfer was submitted under. Re-submitting
    /// with this exact key is the only safe retry.
    pub idempotency_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BearerToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_deserializes_from_oauth_response() {
        let payload = serde_json::json!({
            "access_token": "tok_abc",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "payments"
        });
        let token: BearerToken =
            serde_json::from_value(payload).expect("token should deserialize");
        assert_eq!(token.access_token, "tok_abc");
        assert_eq!(token.expires_in, Some(3600));
    }
}
