use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Unprocessed,
    Processed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Unprocessed => "unprocessed",
            OrderStatus::Processed => "processed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unprocessed" => Ok(OrderStatus::Unprocessed),
            "processed" => Ok(OrderStatus::Processed),
            other => Err(DomainError::Validation(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}

/// A line owned by exactly one order. `id` is `None` until the store has
/// persisted the line and assigned its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub id: Option<Uuid>,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
}

/// The order aggregate. Lines are reachable only through their owning order;
/// the store-side back reference (`order_id` column) never appears here.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub customer_name: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}

/// Line data supplied at order creation, before any identity exists.
#[derive(Debug, Clone)]
pub struct OrderLineInput {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
}

/// Partial update for an order. Absent scalar fields leave the persisted
/// value untouched; `lines` is the full intended line set (see `reconcile`).
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub customer_name: Option<String>,
    pub status: Option<OrderStatus>,
    pub lines: Vec<LinePatch>,
}

/// One line inside a patch: with an id it addresses an existing line,
/// without one it requests a new line.
#[derive(Debug, Clone)]
pub struct LinePatch {
    pub id: Option<Uuid>,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
}

/// Summary forwarded to the order-processing-log service after an order has
/// been promoted to `processed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: Uuid,
    pub customer_name: String,
    pub date: DateTime<Utc>,
    pub items_count: i64,
    pub amount: BigDecimal,
}

impl OrderSummary {
    pub fn from_order(order: &Order) -> Self {
        let items_count = order.lines.iter().map(|l| i64::from(l.quantity)).sum();
        let amount = order.lines.iter().fold(BigDecimal::from(0), |acc, l| {
            acc + &l.price * BigDecimal::from(l.quantity)
        });
        OrderSummary {
            order_id: order.id,
            customer_name: order.customer_name.clone(),
            date: order.created_at,
            items_count,
            amount,
        }
    }
}

pub fn validate_customer_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation(
            "customer name is required".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_line(quantity: i32, price: &BigDecimal) -> Result<(), DomainError> {
    if quantity <= 0 {
        return Err(DomainError::Validation(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    if *price <= BigDecimal::from(0) {
        return Err(DomainError::Validation(format!(
            "price must be positive, got {price}"
        )));
    }
    Ok(())
}
