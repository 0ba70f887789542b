//! Refund orchestration across payment gateways and the commerce backend.
//!
//! A refund and its commerce sync are two independent upstream writes with
//! no shared rollback. Re-issuing the commerce status/note write is safe;
//! re-issuing the refund at the gateway is not and is never attempted here.
//! When the refund lands but the sync does not, the outcome is a
//! `PartialFailure` carrying the refund reference so the caller can retry
//! only the sync step via [`RefundOrchestrator::sync_refund_to_commerce`].

use crate::commerce::gateway::CommerceGateway;
use crate::commerce::types::OrderPatch;
use crate::error::{AppError, AppResult};
use crate::payments::provider::RefundProvider;
use crate::payments::types::{format_major_units, RefundRequest, RefundResult, RefundStatus};
use tracing::{info, warn};

pub const REFUNDED_STATUS: &str = "refunded";

pub struct RefundOrchestrator<'a> {
    provider: &'a dyn RefundProvider,
    commerce: &'a dyn CommerceGateway,
}

impl<'a> RefundOrchestrator<'a> {
    pub fn new(provider: &'a dyn RefundProvider, commerce: &'a dyn CommerceGateway) -> Self {
        Self { provider, commerce }
    }

    /// Issues the refund at the gateway and, where the provider's domain
    /// model requires it, mirrors it to the commerce order.
    pub async fn execute_refund(&self, request: RefundRequest) -> AppResult<RefundResult> {
        if request.reference.trim().is_empty() {
            return Err(AppError::validation(
                "charge/transaction reference is required",
                Some("reference"),
            ));
        }
        if request.amount_minor <= 0 {
            return Err(AppError::validation(
                "amount must be greater than zero",
                Some("amount_minor"),
            ));
        }
        // The sync target must exist before the irreversible gateway call.
        let sync_target = if self.provider.requires_commerce_sync() {
            Some(request.order_id.ok_or_else(|| {
                AppError::validation(
                    "order_id is required for refunds that sync the commerce order",
                    Some("order_id"),
                )
            })?)
        } else {
            None
        };

        let reason = request.reason.clone();
        let result = self.provider.refund(request).await?;

        if result.status != RefundStatus::Succeeded {
            warn!(
                provider = %result.provider,
                refund = %result.refund_reference,
                "gateway reported refund as not succeeded"
            );
            return Ok(result);
        }

        let order_id = match sync_target {
            Some(order_id) => order_id,
            None => {
                info!(
                    provider = %result.provider,
                    refund = %result.refund_reference,
                    "refund complete, provider ledger is authoritative"
                );
                return Ok(result);
            }
        };

        match self
            .sync_refund_to_commerce(order_id, &result, reason.as_deref())
            .await
        {
            Ok(()) => Ok(result),
            Err(sync_err) => {
                let partial = RefundResult {
                    status: RefundStatus::PartiallySucceeded,
                    ..result
                };
                warn!(
                    provider = %partial.provider,
                    refund = %partial.refund_reference,
                    order_id,
                    error = %sync_err,
                    "refund issued but commerce sync failed"
                );
                Err(AppError::PartialFailure {
                    committed_reference: partial.refund_reference,
                    completed_step: format!("{} refund", partial.provider),
                    failed_step: "commerce sync".to_string(),
                    message: sync_err.to_string(),
                })
            }
        }
    }

    /// Marks the commerce order refunded and records a refund note.
    /// Idempotent: safe to re-issue after a partial failure.
    pub async fn sync_refund_to_commerce(
        &self,
        order_id: u64,
        result: &RefundResult,
        reason: Option<&str>,
    ) -> AppResult<()> {
        self.commerce
            .put_order(order_id, &OrderPatch::status(REFUNDED_STATUS))
            .await?;

        let note = format_refund_note(result, reason);
        self.commerce.add_order_note(order_id, &note).await?;

        info!(order_id, refund = %result.refund_reference, "commerce order marked refunded");
        Ok(())
    }
}

fn format_refund_note(result: &RefundResult, reason: Option<&str>) -> String {
    let mut note = format!(
        "Refunded {} {} via {} (refund {}) at {}.",
        format_major_units(result.amount_minor),
        result.currency,
        result.provider,
        result.refund_reference,
        chrono::Utc::now().to_rfc3339(),
    );
    if let Some(reason) = reason {
        note.push_str(&format!(" Reason: {}", reason));
    }
    note
}
