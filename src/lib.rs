//! Order settlement core for the support-desk panel.
//!
//! Keeps a commerce order record and its payment-gateway counterpart
//! mutually consistent when a support agent edits an order or issues a
//! refund. The commerce backend, payment gateways and banking gateway are
//! external collaborators reached through the trait seams in
//! [`commerce::gateway`], [`payments::provider`] and [`banking::gateway`];
//! this crate holds no persistent state and performs best-effort sequencing
//! with explicit partial-failure reporting.

pub mod banking;
pub mod commerce;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod payments;
pub mod services;
