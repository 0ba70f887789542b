use crate::error::AppError;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProviderName {
    /// Card processor (refunds by charge id, minor units).
    Stripe,
    /// Wallet processor (refunds by capture reference, amount + currency).
    Paypal,
    /// Local-currency processor (refunds by charge id, minor units).
    Payu,
}

impl ProviderName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderName::Stripe => "stripe",
            ProviderName::Paypal => "paypal",
            ProviderName::Payu => "payu",
        }
    }
}

impl std::fmt::Display for ProviderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderName {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "stripe" => Ok(ProviderName::Stripe),
            "paypal" => Ok(ProviderName::Paypal),
            "payu" => Ok(ProviderName::Payu),
            _ => Err(AppError::validation(
                format!("unsupported provider: {}", value),
                Some("provider"),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Money {
    /// Decimal string, major units.
    pub amount: String,
    pub currency: String,
}

impl Money {
    pub fn validate_positive(&self, field: &str) -> Result<(), AppError> {
        let parsed = BigDecimal::from_str(&self.amount).map_err(|_| {
            AppError::validation(
                format!("invalid decimal amount: {}", self.amount),
                Some(field),
            )
        })?;
        if parsed <= BigDecimal::from(0) {
            return Err(AppError::validation(
                "amount must be greater than zero",
                Some(field),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(AppError::validation("currency is required", Some("currency")));
        }
        Ok(())
    }
}

/// A refund to issue against a previously captured charge or transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundRequest {
    /// Charge id (card, local currency) or capture reference (wallet).
    pub reference: String,
    /// Minor currency units.
    pub amount_minor: i64,
    /// Required for providers without a native-currency default.
    pub currency: Option<String>,
    /// Linked commerce order, where the provider's domain model syncs one.
    pub order_id: Option<u64>,
    /// Human-readable reason, recorded on the commerce order note.
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    Succeeded,
    Failed,
    /// The gateway refunded but the commerce sync failed.
    PartiallySucceeded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundResult {
    pub provider: ProviderName,
    pub status: RefundStatus,
    /// Gateway-assigned refund reference.
    pub refund_reference: String,
    pub amount_minor: i64,
    pub currency: String,
    pub provider_data: Option<JsonValue>,
}

/// Renders a minor-unit amount in major units for human-readable notes
/// ("500" minor -> "5.00").
pub fn format_major_units(amount_minor: i64) -> String {
    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_name_parses_known_tags() {
        assert!(matches!(
            ProviderName::from_str("stripe"),
            Ok(ProviderName::Stripe)
        ));
        assert!(matches!(
            ProviderName::from_str(" PayPal "),
            Ok(ProviderName::Paypal)
        ));
        assert!(ProviderName::from_str("klarna").is_err());
    }

    #[test]
    fn money_validation() {
        assert!(Money {
            amount: "10.00".to_string(),
            currency: "EUR".to_string()
        }
        .validate_positive("amount")
        .is_ok());
        assert!(Money {
            amount: "0".to_string(),
            currency: "EUR".to_string()
        }
        .validate_positive("amount")
        .is_err());
        assert!(Money {
            amount: "5.00".to_string(),
            currency: "".to_string()
        }
        .validate_positive("amount")
        .is_err());
    }

    #[test]
    fn major_unit_formatting() {
        assert_eq!(format_major_units(500), "5.00");
        assert_eq!(format_major_units(1), "0.01");
        assert_eq!(format_major_units(123456), "1234.56");
    }

    #[test]
    fn refund_result_serializes_status_tag() {
        let result = RefundResult {
            provider: ProviderName::Stripe,
            status: RefundStatus::Succeeded,
            refund_reference: "re_1".to_string(),
            amount_minor: 500,
            currency: "EUR".to_string(),
            provider_data: None,
        };
        let json = serde_json::to_value(&result).expect("serialization should succeed");
        assert_eq!(json["status"], "succeeded");
        assert_eq!(json["provider"], "stripe");
    }
}
