//! Order Aggregate
//!
//! An order is created once, by the registry, from an accepted `OrderInput`
//! and is never mutated afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order_entry::errors::OrderError;
use crate::domain::order_entry::value_objects::{OrderSide, OrderType};
use crate::domain::shared::{OrderId, Symbol, Timestamp};

/// Most decimal places a price may carry.
pub const MAX_PRICE_SCALE: u32 = 4;

/// Most significant digits a price may carry.
///
/// Prices travel as JSON numbers, and a double holds 15 decimal digits
/// exactly.
pub const MAX_PRICE_DIGITS: u32 = 15;

/// Reject prices that would not survive the JSON wire format unchanged.
///
/// # Errors
///
/// Returns the user-facing message naming `label` when `price` has more
/// than [`MAX_PRICE_SCALE`] decimal places or [`MAX_PRICE_DIGITS`]
/// significant digits.
pub fn check_price_precision(price: Decimal, label: &str) -> Result<(), String> {
    let normalized = price.normalize();
    if normalized.scale() > MAX_PRICE_SCALE {
        return Err(format!(
            "{label} must have at most {MAX_PRICE_SCALE} decimal places"
        ));
    }
    if normalized.mantissa().unsigned_abs() >= 10u128.pow(MAX_PRICE_DIGITS) {
        return Err(format!(
            "{label} must have at most {MAX_PRICE_DIGITS} digits"
        ));
    }
    Ok(())
}

/// Order fields as submitted by a client.
///
/// Every field is optional on the wire so that missing fields can be
/// reported as a validation error instead of a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    /// Instrument symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Symbol>,
    /// Order type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_type: Option<OrderType>,
    /// Quantity (0 counts as missing).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
    /// Order side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<OrderSide>,
    /// Price (Limit / Stop Limit).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    /// Stop price (Stop Limit).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub stop_price: Option<Decimal>,
}

impl OrderInput {
    /// Wire names of the required fields that are absent.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.symbol.as_ref().is_none_or(Symbol::is_blank) {
            missing.push("symbol");
        }
        if self.order_type.is_none() {
            missing.push("orderType");
        }
        if self.quantity.is_none_or(|q| q == 0) {
            missing.push("quantity");
        }
        if self.side.is_none() {
            missing.push("side");
        }
        missing
    }

    /// Check presence and the conditional price rules.
    ///
    /// Prices that the order type does not use are dropped.
    pub fn validate(self) -> Result<NewOrder, OrderError> {
        let missing = self.missing_fields();
        let (Some(symbol), Some(order_type), Some(quantity), Some(side)) =
            (self.symbol, self.order_type, self.quantity, self.side)
        else {
            return Err(OrderError::MissingRequiredFields { fields: missing });
        };
        if !missing.is_empty() {
            return Err(OrderError::MissingRequiredFields { fields: missing });
        }

        let price = if order_type.requires_price() {
            Some(require_positive(self.price, "price", "Price", order_type)?)
        } else {
            None
        };
        let stop_price = if order_type.requires_stop_price() {
            Some(require_positive(
                self.stop_price,
                "stopPrice",
                "Stop price",
                order_type,
            )?)
        } else {
            None
        };

        Ok(NewOrder {
            symbol,
            order_type,
            side,
            quantity,
            price,
            stop_price,
        })
    }
}

fn require_positive(
    value: Option<Decimal>,
    field: &'static str,
    label: &str,
    order_type: OrderType,
) -> Result<Decimal, OrderError> {
    match value {
        Some(v) if v > Decimal::ZERO => check_price_precision(v, label)
            .map(|()| v.normalize())
            .map_err(|message| OrderError::InvalidParameters { field, message }),
        Some(_) => Err(OrderError::InvalidParameters {
            field,
            message: format!("{label} must be greater than 0"),
        }),
        None => Err(OrderError::InvalidParameters {
            field,
            message: format!("{label} is required for {order_type} orders"),
        }),
    }
}

/// A validated order waiting for its id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    symbol: Symbol,
    order_type: OrderType,
    side: OrderSide,
    quantity: u64,
    price: Option<Decimal>,
    stop_price: Option<Decimal>,
}

impl NewOrder {
    /// Stamp the order with its server-assigned identity.
    #[must_use]
    pub fn into_order(self, id: OrderId, timestamp: Timestamp) -> Order {
        Order {
            id,
            symbol: self.symbol,
            order_type: self.order_type,
            quantity: self.quantity,
            side: self.side,
            price: self.price,
            stop_price: self.stop_price,
            timestamp,
        }
    }
}

/// A stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: OrderId,
    symbol: Symbol,
    order_type: OrderType,
    quantity: u64,
    side: OrderSide,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    price: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    stop_price: Option<Decimal>,
    timestamp: Timestamp,
}

impl Order {
    /// Server-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> &OrderId {
        &self.id
    }

    /// Instrument symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Order type.
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Quantity.
    #[must_use]
    pub const fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Side.
    #[must_use]
    pub const fn side(&self) -> OrderSide {
        self.side
    }

    /// Price, present for Limit and Stop Limit orders.
    #[must_use]
    pub const fn price(&self) -> Option<Decimal> {
        self.price
    }

    /// Stop price, present for Stop Limit orders.
    #[must_use]
    pub const fn stop_price(&self) -> Option<Decimal> {
        self.stop_price
    }

    /// Server-assigned creation time.
    #[must_use]
    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
