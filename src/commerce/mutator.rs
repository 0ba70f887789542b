//! Order edit protocol against the commerce backend.
//!
//! The backend recomputes derived totals and tax from the line-item set
//! only when the order status transitions. Submitting a line patch under an
//! unchanged status silently skips recalculation. Line edits therefore land
//! in two writes: the patch together with a transient "pending" status,
//! then the same patch together with the original status. A failure between
//! the phases leaves the order in the transient status with correct lines —
//! a recoverable, observable intermediate state, not a hidden one.
//!
//! No locking is offered here. Concurrent edits to the same order can
//! interleave across the two phases; deployments with concurrent request
//! handling must serialize writers per order id.

use crate::error::{AppError, AppResult};
use bigdecimal::{BigDecimal, RoundingMode};
use std::str::FromStr;
use tracing::info;

use super::gateway::CommerceGateway;
use super::types::{Address, LineItemPatch, Order, OrderPatch};

/// Status the order passes through so the backend recalculates totals.
pub const TRANSIENT_RECALC_STATUS: &str = "pending";

pub struct OrderMutator<'a> {
    gateway: &'a dyn CommerceGateway,
}

impl<'a> OrderMutator<'a> {
    pub fn new(gateway: &'a dyn CommerceGateway) -> Self {
        Self { gateway }
    }

    /// Replaces the line at `index` with a new quantity and, optionally, a
    /// new total and variation. One logical replacement: the existing line
    /// is soft-deleted (quantity 0) and a rebuilt line is created in the
    /// same write, so the line count is unchanged.
    pub async fn edit_line(
        &self,
        order_id: u64,
        index: usize,
        new_quantity: u32,
        new_total: Option<&str>,
        new_variation_id: Option<u64>,
    ) -> AppResult<Order> {
        if new_quantity == 0 {
            return Err(AppError::validation(
                "quantity must be greater than zero; use remove_line to delete a line",
                Some("quantity"),
            ));
        }

        let order = self.gateway.get_order(order_id).await?;
        let line = order
            .line_items
            .get(index)
            .cloned()
            .ok_or_else(|| AppError::not_found("line item", format!("{}[{}]", order_id, index)))?;

        let unit_price = match new_total {
            Some(total) => derive_unit_price(total, new_quantity)?,
            None => line.price.clone().ok_or_else(|| {
                AppError::validation(
                    "line carries no unit price; a new total is required",
                    Some("total"),
                )
            })?,
        };
        let line_total = match new_total {
            Some(total) => normalize_amount(total, "total")?,
            None => multiply_scaled(&unit_price, new_quantity)?,
        };

        let replacement = LineItemPatch {
            id: None,
            product_id: Some(line.product_id),
            variation_id: new_variation_id.or(line.variation_id),
            quantity: new_quantity,
            subtotal: Some(line_total.clone()),
            total: Some(line_total),
            // Tax fields carry forward unchanged; the backend recomputes
            // them on the status transition.
            subtotal_tax: line.subtotal_tax.clone(),
            total_tax: line.total_tax.clone(),
        };
        let line_patch = vec![
            LineItemPatch {
                id: Some(line.id),
                quantity: 0,
                ..Default::default()
            },
            replacement,
        ];

        let original_status = order.status.clone();
        info!(
            order_id,
            index,
            new_quantity,
            unit_price = %unit_price,
            "editing order line, phase 1 (transient status)"
        );
        self.gateway
            .put_order(
                order_id,
                &OrderPatch::line_items(line_patch.clone()).with_status(TRANSIENT_RECALC_STATUS),
            )
            .await?;

        info!(order_id, status = %original_status, "editing order line, phase 2 (status restore)");
        self.gateway
            .put_order(
                order_id,
                &OrderPatch::line_items(line_patch).with_status(&original_status),
            )
            .await
    }

    /// Soft-deletes the line at `index`. A single write: no replacement
    /// line is introduced, so no recalculation phase is needed beyond the
    /// delete itself.
    pub async fn remove_line(&self, order_id: u64, index: usize) -> AppResult<Order> {
        let order = self.gateway.get_order(order_id).await?;
        let line = order
            .line_items
            .get(index)
            .ok_or_else(|| AppError::not_found("line item", format!("{}[{}]", order_id, index)))?;

        info!(order_id, index, line_id = line.id, "removing order line");
        self.gateway
            .put_order(
                order_id,
                &OrderPatch::line_items(vec![LineItemPatch {
                    id: Some(line.id),
                    quantity: 0,
                    ..Default::default()
                }]),
            )
            .await?;

        self.gateway.get_order(order_id).await
    }

    /// Appends a new line. The backend prices it from the catalog.
    pub async fn add_line(
        &self,
        order_id: u64,
        product_id: u64,
        quantity: u32,
        variation_id: Option<u64>,
    ) -> AppResult<Order> {
        if product_id == 0 {
            return Err(AppError::validation(
                "product_id is required",
                Some("product_id"),
            ));
        }
        if quantity == 0 {
            return Err(AppError::validation(
                "quantity must be greater than zero",
                Some("quantity"),
            ));
        }

        info!(order_id, product_id, quantity, "adding order line");
        self.gateway
            .put_order(
                order_id,
                &OrderPatch::line_items(vec![LineItemPatch {
                    product_id: Some(product_id),
                    variation_id,
                    quantity,
                    ..Default::default()
                }]),
            )
            .await?;

        self.gateway.get_order(order_id).await
    }

    /// Replaces the billing and/or shipping address. At least one is
    /// required.
    pub async fn edit_address(
        &self,
        order_id: u64,
        billing: Option<Address>,
        shipping: Option<Address>,
    ) -> AppResult<Order> {
        if billing.is_none() && shipping.is_none() {
            return Err(AppError::validation(
                "at least one of billing or shipping is required",
                None,
            ));
        }

        info!(order_id, "editing order addresses");
        self.gateway
            .put_order(
                order_id,
                &OrderPatch {
                    billing,
                    shipping,
                    ..Default::default()
                },
            )
            .await
    }

    pub async fn change_status(&self, order_id: u64, new_status: &str) -> AppResult<Order> {
        if new_status.trim().is_empty() {
            return Err(AppError::validation("status is required", Some("status")));
        }

        info!(order_id, new_status, "changing order status");
        self.gateway
            .put_order(order_id, &OrderPatch::status(new_status))
            .await?;

        self.gateway.get_order(order_id).await
    }
}

/// Unit price from a line total, two-decimal rounding (half-up).
pub fn derive_unit_price(total: &str, quantity: u32) -> AppResult<String> {
    let total = parse_positive(total, "total")?;
    let price = (&total / BigDecimal::from(quantity)).with_scale_round(2, RoundingMode::HalfUp);
    Ok(price.to_string())
}

fn normalize_amount(value: &str, field: &str) -> AppResult<String> {
    let parsed = parse_positive(value, field)?;
    Ok(parsed
        .with_scale_round(2, RoundingMode::HalfUp)
        .to_string())
}

fn multiply_scaled(unit_price: &str, quantity: u32) -> AppResult<String> {
    let price = parse_positive(unit_price, "price")?;
    let total = (price * BigDecimal::from(quantity)).with_scale_round(2, RoundingMode::HalfUp);
    Ok(total.to_string())
}

fn parse_positive(value: &str, field: &str) -> AppResult<BigDecimal> {
    let parsed = BigDecimal::from_str(value.trim()).map_err(|_| {
        AppError::validation(format!("invalid decimal amount: {}", value), Some(field))
    })?;
    if parsed <= BigDecimal::from(0) {
        return Err(AppError::validation(
            format!("{} must be greater than zero", field),
            Some(field),
        ));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_price_is_total_over_quantity_rounded() {
        assert_eq!(derive_unit_price("9.00", 3).unwrap(), "3.00");
        assert_eq!(derive_unit_price("10.00", 3).unwrap(), "3.33");
        assert_eq!(derive_unit_price("12.00", 1).unwrap(), "12.00");
        assert_eq!(derive_unit_price("0.05", 2).unwrap(), "0.03");
    }

    #[test]
    fn unit_price_rejects_invalid_totals() {
        assert!(derive_unit_price("abc", 2).is_err());
        assert!(derive_unit_price("-9.00", 3).is_err());
        assert!(derive_unit_price("0", 3).is_err());
    }

    #[test]
    fn line_total_from_price_keeps_two_decimals() {
        assert_eq!(multiply_scaled("3.00", 4).unwrap(), "12.00");
        assert_eq!(multiply_scaled("1.005", 2).unwrap(), "2.01");
    }
}
