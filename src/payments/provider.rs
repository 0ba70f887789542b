use crate::error::AppResult;
use crate::payments::types::{ProviderName, RefundRequest, RefundResult};
use async_trait::async_trait;

/// Capability implemented once per payment gateway: issue a refund against
/// a previously captured charge or transaction and report the outcome.
#[async_trait]
pub trait RefundProvider: Send + Sync {
    /// Issues the refund at the gateway. Validation happens before any
    /// network call; a gateway rejection surfaces as `Provider`.
    async fn refund(&self, request: RefundRequest) -> AppResult<RefundResult>;

    fn name(&self) -> ProviderName;

    /// Currency assumed when the caller omits one. Providers without a
    /// native default return `None` and reject currency-less requests.
    fn native_currency(&self) -> Option<&'static str>;

    /// Whether a successful refund must be mirrored to the commerce order
    /// (status + note). The wallet and local-currency ledgers are treated
    /// as authoritative and never sync back.
    fn requires_commerce_sync(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::types::RefundStatus;

    struct MockProvider;

    #[async_trait]
    impl RefundProvider for MockProvider {
        async fn refund(&self, request: RefundRequest) -> AppResult<RefundResult> {
            Ok(RefundResult {
                provider: ProviderName::Stripe,
                status: RefundStatus::Succeeded,
                refund_reference: format!("re_{}", request.reference),
                amount_minor: request.amount_minor,
                currency: request.currency.unwrap_or_else(|| "EUR".to_string()),
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

    #[tokio::test]
    async fn trait_can_be_implemented_by_mock_provider() {
        let provider: Box<dyn RefundProvider> = Box::new(MockProvider);
        let result = provider
            .refund(RefundRequest {
                reference: "ch_1".to_string(),
                amount_minor: 500,
                currency: None,
                order_id: Some(42),
                reason: None,
            })
            .await
            .expect("refund should succeed");
        assert_eq!(result.status, RefundStatus::Succeeded);
        assert_eq!(result.refund_reference, "re_ch_1");
    }
}
