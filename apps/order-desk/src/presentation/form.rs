//! Order Form
//!
//! Collects one order, validates it locally and submits it through the
//! store. Text inputs are kept as typed; nothing is parsed until submit.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::Instant;

use crate::application::ports::{ClientError, OrderApiPort};
use crate::application::store::OrderStore;
use crate::domain::order_entry::aggregate::{Order, OrderInput, check_price_precision};
use crate::domain::order_entry::value_objects::{Instrument, OrderSide, OrderType};
use crate::domain::shared::Symbol;

/// How long a banner stays visible.
pub const BANNER_DURATION: Duration = Duration::from_secs(3);

/// Default quantity text.
pub const DEFAULT_QUANTITY: &str = "1";

/// Form inputs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    /// Instrument symbol.
    Symbol,
    /// Order type.
    OrderType,
    /// Quantity.
    Quantity,
    /// Limit price.
    Price,
    /// Stop trigger price.
    StopPrice,
    /// Buy or sell.
    Side,
}

impl FormField {
    /// All fields in display order.
    pub const ALL: [Self; 6] = [
        Self::Symbol,
        Self::OrderType,
        Self::Quantity,
        Self::Price,
        Self::StopPrice,
        Self::Side,
    ];

    /// Field label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Symbol => "Symbol",
            Self::OrderType => "Order Type",
            Self::Quantity => "Quantity",
            Self::Price => "Price",
            Self::StopPrice => "Stop Price",
            Self::Side => "Side",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inline validation messages keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    /// Message for `field`, if any.
    #[must_use]
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether `field` has an error.
    #[must_use]
    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    /// Whether there are no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields in error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Fields in error, in display order.
    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }

    fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    fn remove(&mut self, field: FormField) {
        self.0.remove(&field);
    }
}

/// Banner tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    /// Order accepted.
    Success,
    /// Order rejected or not delivered.
    Failure,
}

/// Transient status message shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Tone.
    pub kind: BannerKind,
    /// Text.
    pub message: String,
    /// When it was shown.
    pub shown_at: Instant,
}

impl Banner {
    fn new(kind: BannerKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    /// Whether the banner has outlived `BANNER_DURATION` at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= BANNER_DURATION
    }
}

/// State of the submit button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitControl {
    /// Button text.
    pub label: &'static str,
    /// Whether clicks are ignored.
    pub disabled: bool,
}

/// Result of pressing submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A request was already in flight; nothing was sent.
    Busy,
    /// Local validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// The server stored the order.
    Submitted(Order),
    /// The request failed; entered values are kept.
    Failed(ClientError),
}

/// Order entry form bound to a store.
pub struct OrderForm<A>
where
    A: OrderApiPort,
{
    store: Arc<OrderStore<A>>,
    symbol: String,
    order_type: Option<OrderType>,
    quantity: String,
    price: String,
    stop_price: String,
    side: Option<OrderSide>,
    errors: FieldErrors,
    banner: Option<Banner>,
}

impl<A> OrderForm<A>
where
    A: OrderApiPort,
{
    /// Create a form with default values.
    #[must_use]
    pub fn new(store: Arc<OrderStore<A>>) -> Self {
        Self {
            store,
            symbol: Instrument::default().as_str().to_string(),
            order_type: Some(OrderType::Market),
            quantity: DEFAULT_QUANTITY.to_string(),
            price: String::new(),
            stop_price: String::new(),
            side: Some(OrderSide::Buy),
            errors: FieldErrors::default(),
            banner: None,
        }
    }

    // -------------------------------------------------------------------------
    // Field access
    // -------------------------------------------------------------------------

    /// Current symbol text.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Current order type.
    #[must_use]
    pub const fn order_type(&self) -> Option<OrderType> {
        self.order_type
    }

    /// Current quantity text.
    #[must_use]
    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    /// Current price text.
    #[must_use]
    pub fn price(&self) -> &str {
        &self.price
    }

    /// Current stop price text.
    #[must_use]
    pub fn stop_price(&self) -> &str {
        &self.stop_price
    }

    /// Current side.
    #[must_use]
    pub const fn side(&self) -> Option<OrderSide> {
        self.side
    }

    /// Pick one of the listed instruments.
    pub fn select_instrument(&mut self, instrument: Instrument) {
        self.set_symbol(instrument.as_str());
    }

    /// Set the symbol text.
    pub fn set_symbol(&mut self, symbol: impl Into<String>) {
        self.symbol = symbol.into();
        self.errors.remove(FormField::Symbol);
    }

    /// Change the order type.
    ///
    /// Errors on fields that this hides are dropped.
    pub fn set_order_type(&mut self, order_type: OrderType) {
        self.order_type = Some(order_type);
        self.errors.remove(FormField::OrderType);
        if !order_type.requires_price() {
            self.errors.remove(FormField::Price);
        }
        if !order_type.requires_stop_price() {
            self.errors.remove(FormField::StopPrice);
        }
    }

    /// Set the quantity text.
    pub fn set_quantity(&mut self, quantity: impl Into<String>) {
        self.quantity = quantity.into();
        self.errors.remove(FormField::Quantity);
    }

    /// Set the price text.
    pub fn set_price(&mut self, price: impl Into<String>) {
        self.price = price.into();
        self.errors.remove(FormField::Price);
    }

    /// Set the stop price text.
    pub fn set_stop_price(&mut self, stop_price: impl Into<String>) {
        self.stop_price = stop_price.into();
        self.errors.remove(FormField::StopPrice);
    }

    /// Change the side.
    pub fn set_side(&mut self, side: OrderSide) {
        self.side = Some(side);
        self.errors.remove(FormField::Side);
    }

    /// Blank a field, as if the user deleted its content.
    pub fn clear_field(&mut self, field: FormField) {
        match field {
            FormField::Symbol => self.symbol.clear(),
            FormField::OrderType => self.order_type = None,
            FormField::Quantity => self.quantity.clear(),
            FormField::Price => self.price.clear(),
            FormField::StopPrice => self.stop_price.clear(),
            FormField::Side => self.side = None,
        }
        self.errors.remove(field);
    }

    /// Restore every field to its default and drop all errors.
    pub fn reset(&mut self) {
        let banner = self.banner.take();
        *self = Self::new(Arc::clone(&self.store));
        self.banner = banner;
    }

    /// Fields currently shown, in display order.
    #[must_use]
    pub fn visible_fields(&self) -> Vec<FormField> {
        let order_type = self.order_type;
        FormField::ALL
            .into_iter()
            .filter(|field| match field {
                FormField::Price => order_type.is_some_and(|t| t.requires_price()),
                FormField::StopPrice => order_type.is_some_and(|t| t.requires_stop_price()),
                _ => true,
            })
            .collect()
    }

    /// Errors from the last submit attempt, minus fields edited since.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Check every visible field and build the request body.
    pub fn validate(&self) -> Result<OrderInput, FieldErrors> {
        let mut errors = FieldErrors::default();

        let symbol = self.symbol.trim();
        if symbol.is_empty() {
            errors.insert(FormField::Symbol, "Symbol is required");
        }

        if self.order_type.is_none() {
            errors.insert(FormField::OrderType, "Order type is required");
        }

        let quantity = match parse_quantity(&self.quantity) {
            Ok(quantity) => Some(quantity),
            Err(message) => {
                errors.insert(FormField::Quantity, message);
                None
            }
        };

        let mut price = None;
        let mut stop_price = None;
        if let Some(order_type) = self.order_type {
            if order_type.requires_price() {
                match parse_price(&self.price, "Price", order_type) {
                    Ok(value) => price = Some(value),
                    Err(message) => errors.insert(FormField::Price, message),
                }
            }
            if order_type.requires_stop_price() {
                match parse_price(&self.stop_price, "Stop price", order_type) {
                    Ok(value) => stop_price = Some(value),
                    Err(message) => errors.insert(FormField::StopPrice, message),
                }
            }
        }

        if self.side.is_none() {
            errors.insert(FormField::Side, "Side is required");
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(OrderInput {
            symbol: Some(Symbol::new(symbol)),
            order_type: self.order_type,
            quantity,
            side: self.side,
            price,
            stop_price,
        })
    }

    /// Validate and submit.
    ///
    /// Nothing is sent while the store is busy or when validation fails.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.store.is_busy() {
            tracing::debug!("Submit ignored while a request is in flight");
            return SubmitOutcome::Busy;
        }

        let input = match self.validate() {
            Ok(input) => input,
            Err(errors) => {
                tracing::debug!(fields = errors.len(), "Order form has invalid fields");
                self.errors = errors.clone();
                return SubmitOutcome::Invalid(errors);
            }
        };
        self.errors = FieldErrors::default();

        match self.store.submit(&input).await {
            Ok(order) => {
                self.reset();
                self.banner = Some(Banner::new(
                    BannerKind::Success,
                    format!(
                        "Order placed: {} {} {} x{}",
                        order.side(),
                        order.symbol(),
                        order.order_type(),
                        order.quantity()
                    ),
                ));
                SubmitOutcome::Submitted(order)
            }
            Err(e) => {
                let error = e.client_error().clone();
                self.banner = Some(Banner::new(BannerKind::Failure, failure_message(&error)));
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// State of the submit button.
    #[must_use]
    pub fn submit_control(&self) -> SubmitControl {
        if self.store.is_busy() {
            SubmitControl {
                label: "Submitting...",
                disabled: true,
            }
        } else {
            SubmitControl {
                label: "Submit Order",
                disabled: false,
            }
        }
    }

    /// Banner still visible now.
    #[must_use]
    pub fn banner(&self) -> Option<&Banner> {
        self.banner_at(Instant::now())
    }

    /// Banner still visible at `now`.
    #[must_use]
    pub fn banner_at(&self, now: Instant) -> Option<&Banner> {
        self.banner.as_ref().filter(|b| !b.is_expired_at(now))
    }

    /// Hide the banner early.
    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }
}

impl<A> fmt::Debug for OrderForm<A>
where
    A: OrderApiPort,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderForm")
            .field("symbol", &self.symbol)
            .field("order_type", &self.order_type)
            .field("quantity", &self.quantity)
            .field("price", &self.price)
            .field("stop_price", &self.stop_price)
            .field("side", &self.side)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

fn parse_quantity(text: &str) -> Result<u64, &'static str> {
    let text = text.trim();
    if text.is_empty() {
        return Err("Quantity is required");
    }
    match text.parse::<u64>() {
        Ok(0) => Err("Quantity must be at least 1"),
        Ok(quantity) => Ok(quantity),
        Err(_) => Err("Quantity must be a whole number of at least 1"),
    }
}

fn parse_price(text: &str, label: &str, order_type: OrderType) -> Result<Decimal, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(format!("{label} is required for {order_type} orders"));
    }
    match Decimal::from_str(text) {
        Ok(value) if value > Decimal::ZERO => {
            check_price_precision(value, label)?;
            Ok(value.normalize())
        }
        Ok(_) => Err(format!("{label} must be greater than 0")),
        Err(_) => Err(format!("{label} must be a number")),
    }
}

fn failure_message(error: &ClientError) -> String {
    match error {
        ClientError::Rejected { message, .. } => format!("Order rejected: {message}"),
        ClientError::Network(_) => "Order failed: server unreachable".to_string(),
        ClientError::Decode(_) => "Order failed: unexpected server response".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeOrderApi, market_input};
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn form() -> (Arc<FakeOrderApi>, Arc<OrderStore<FakeOrderApi>>, OrderForm<FakeOrderApi>) {
        let api = Arc::new(FakeOrderApi::new());
        let store = Arc::new(OrderStore::new(Arc::clone(&api)));
        let form = OrderForm::new(Arc::clone(&store));
        (api, store, form)
    }

    #[test]
    fn defaults() {
        let (_, _, form) = form();
        assert_eq!(form.symbol(), "NIFTY");
        assert_eq!(form.order_type(), Some(OrderType::Market));
        assert_eq!(form.side(), Some(OrderSide::Buy));
        assert_eq!(form.quantity(), "1");
        assert_eq!(form.price(), "");
        assert_eq!(form.stop_price(), "");
        assert!(form.errors().is_empty());
        assert!(form.banner().is_none());
    }

    #[test_case(OrderType::Market, &[] ; "market hides both prices")]
    #[test_case(OrderType::Limit, &[FormField::Price] ; "limit shows price")]
    #[test_case(OrderType::StopLimit, &[FormField::Price, FormField::StopPrice] ; "stop limit shows both")]
    fn price_visibility(order_type: OrderType, prices: &[FormField]) {
        let (_, _, mut form) = form();
        form.set_order_type(order_type);

        let visible = form.visible_fields();
        for field in [FormField::Price, FormField::StopPrice] {
            assert_eq!(visible.contains(&field), prices.contains(&field), "{field}");
        }
        assert!(visible.contains(&FormField::Quantity));
        assert!(visible.contains(&FormField::Side));
    }

    #[test_case("", "Quantity is required" ; "empty")]
    #[test_case("0", "Quantity must be at least 1" ; "zero")]
    #[test_case("-3", "Quantity must be a whole number of at least 1" ; "negative")]
    #[test_case("2.5", "Quantity must be a whole number of at least 1" ; "fractional")]
    #[test_case("ten", "Quantity must be a whole number of at least 1" ; "text")]
    fn bad_quantity(text: &str, message: &str) {
        let (_, _, mut form) = form();
        form.set_quantity(text);

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(FormField::Quantity), Some(message));
        assert_eq!(errors.len(), 1);
    }

    #[test_case(OrderType::Limit, "", "Price is required for Limit orders" ; "limit missing")]
    #[test_case(OrderType::Limit, "0", "Price must be greater than 0" ; "limit zero")]
    #[test_case(OrderType::StopLimit, "-1", "Price must be greater than 0" ; "stop limit negative")]
    #[test_case(OrderType::Limit, "abc", "Price must be a number" ; "limit text")]
    #[test_case(OrderType::Limit, "2450.123456789012345", "Price must have at most 4 decimal places" ; "too many decimals")]
    #[test_case(OrderType::StopLimit, "1234567890123456", "Price must have at most 15 digits" ; "too many digits")]
    fn bad_price(order_type: OrderType, text: &str, message: &str) {
        let (_, _, mut form) = form();
        form.set_order_type(order_type);
        form.set_price(text);
        form.set_stop_price("100");

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(FormField::Price), Some(message));
    }

    #[test]
    fn stop_limit_requires_stop_price() {
        let (_, _, mut form) = form();
        form.set_order_type(OrderType::StopLimit);
        form.set_price("2450");

        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get(FormField::StopPrice),
            Some("Stop price is required for Stop Limit orders")
        );
        assert!(!errors.contains(FormField::Price));
    }

    #[test]
    fn cleared_fields_are_reported_in_display_order() {
        let (_, _, mut form) = form();
        for field in [FormField::Side, FormField::Symbol, FormField::OrderType] {
            form.clear_field(field);
        }

        let errors = form.validate().unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(
            fields,
            [FormField::Symbol, FormField::OrderType, FormField::Side]
        );
        assert_eq!(errors.get(FormField::Side), Some("Side is required"));
    }

    #[test]
    fn hidden_prices_are_not_sent() {
        let (_, _, mut form) = form();
        form.set_order_type(OrderType::StopLimit);
        form.set_price("2450");
        form.set_stop_price("2400");
        form.set_order_type(OrderType::Market);

        let input = form.validate().unwrap();
        assert_eq!(input.price, None);
        assert_eq!(input.stop_price, None);
    }

    #[test]
    fn limit_input_carries_price_only() {
        let (_, _, mut form) = form();
        form.select_instrument(Instrument::Tcs);
        form.set_order_type(OrderType::Limit);
        form.set_side(OrderSide::Sell);
        form.set_quantity(" 5 ");
        form.set_price("3500.50");
        form.set_stop_price("3400");

        let input = form.validate().unwrap();
        assert_eq!(input.symbol, Some(Symbol::new("TCS")));
        assert_eq!(input.quantity, Some(5));
        assert_eq!(input.price, Some(dec!(3500.50)));
        assert_eq!(input.stop_price, None);
    }

    #[tokio::test]
    async fn switching_type_drops_hidden_errors() {
        let (_, _, mut form) = form();
        form.set_order_type(OrderType::StopLimit);
        let SubmitOutcome::Invalid(errors) = form.submit().await else {
            panic!("expected invalid outcome");
        };
        assert!(errors.contains(FormField::Price));
        assert!(errors.contains(FormField::StopPrice));

        form.set_order_type(OrderType::Limit);
        assert!(form.errors().contains(FormField::Price));
        assert!(!form.errors().contains(FormField::StopPrice));

        form.set_order_type(OrderType::Market);
        assert!(form.errors().is_empty());
    }

    #[tokio::test]
    async fn invalid_submit_makes_no_call() {
        let (api, store, mut form) = form();
        form.set_order_type(OrderType::Limit);
        form.select_instrument(Instrument::Tcs);
        form.set_quantity("5");
        form.set_side(OrderSide::Sell);

        let outcome = form.submit().await;

        let SubmitOutcome::Invalid(errors) = outcome else {
            panic!("expected invalid outcome, got {outcome:?}");
        };
        assert_eq!(
            errors.get(FormField::Price),
            Some("Price is required for Limit orders")
        );
        assert_eq!(api.create_calls(), 0);
        assert!(store.is_empty());
        assert_eq!(form.price(), "");
    }

    #[tokio::test]
    async fn successful_submit_resets_and_shows_banner() {
        let (_, store, mut form) = form();
        form.select_instrument(Instrument::Reliance);
        form.set_order_type(OrderType::StopLimit);
        form.set_quantity("15");
        form.set_price("2450");
        form.set_stop_price("2400");

        let outcome = form.submit().await;

        let SubmitOutcome::Submitted(order) = outcome else {
            panic!("expected submitted outcome, got {outcome:?}");
        };
        assert_eq!(order.price(), Some(dec!(2450)));
        assert_eq!(order.stop_price(), Some(dec!(2400)));
        assert_eq!(store.orders(), vec![order]);

        assert_eq!(form.symbol(), "NIFTY");
        assert_eq!(form.order_type(), Some(OrderType::Market));
        assert_eq!(form.quantity(), "1");
        assert_eq!(form.price(), "");

        let banner = form.banner().unwrap();
        assert_eq!(banner.kind, BannerKind::Success);
        assert_eq!(banner.message, "Order placed: Buy RELIANCE Stop Limit x15");
    }

    #[tokio::test]
    async fn failed_submit_keeps_values() {
        let (api, store, mut form) = form();
        api.fail_with(ClientError::Network("connection refused".to_string()));
        form.set_quantity("25");
        form.set_side(OrderSide::Sell);

        let outcome = form.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Failed(ClientError::Network(_))));
        assert_eq!(form.quantity(), "25");
        assert_eq!(form.side(), Some(OrderSide::Sell));
        assert!(store.is_empty());
        let banner = form.banner().unwrap();
        assert_eq!(banner.kind, BannerKind::Failure);
        assert_eq!(banner.message, "Order failed: server unreachable");
    }

    #[tokio::test]
    async fn busy_store_blocks_submit() {
        let (api, store, mut form) = form();
        store.set_busy(true);

        assert_eq!(form.submit().await, SubmitOutcome::Busy);
        assert_eq!(api.create_calls(), 0);
        assert_eq!(
            form.submit_control(),
            SubmitControl {
                label: "Submitting...",
                disabled: true
            }
        );

        store.set_busy(false);
        assert_eq!(form.submit_control().label, "Submit Order");
        assert!(!form.submit_control().disabled);
    }

    #[tokio::test]
    async fn fetch_finishing_mid_submit_keeps_submit_blocked() {
        let api = Arc::new(FakeOrderApi::gated_creates());
        let store = Arc::new(OrderStore::new(Arc::clone(&api)));
        let mut form = OrderForm::new(Arc::clone(&store));

        let pending = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.submit(&market_input("TCS", 3, OrderSide::Sell)).await })
        };
        api.wait_for_request().await;
        store.fetch_all().await.unwrap();

        assert!(store.is_busy());
        assert_eq!(form.submit().await, SubmitOutcome::Busy);
        assert!(form.submit_control().disabled);
        assert_eq!(api.create_calls(), 1);

        api.release();
        pending.await.unwrap().unwrap();
        assert!(!form.submit_control().disabled);
    }

    #[tokio::test]
    async fn banner_expires_after_three_seconds() {
        let (_, _, mut form) = form();
        form.submit().await;
        let shown_at = form.banner().unwrap().shown_at;

        assert!(form.banner_at(shown_at + Duration::from_millis(2_999)).is_some());
        assert!(form.banner_at(shown_at + BANNER_DURATION).is_none());

        form.dismiss_banner();
        assert!(form.banner_at(shown_at).is_none());
    }
}
