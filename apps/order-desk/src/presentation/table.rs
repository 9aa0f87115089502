//! Order Table
//!
//! Read-only view of the store's orders. The table keeps its own copy of the
//! rendered view and rebuilds it whenever the store notifies.

use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::application::ports::OrderApiPort;
use crate::application::store::{OrderStore, StoreError, StoreSnapshot, Subscription};
use crate::domain::order_entry::aggregate::Order;
use crate::domain::order_entry::value_objects::OrderSide;

/// Message shown when there is nothing to list.
pub const EMPTY_MESSAGE: &str = "No orders yet";

/// Placeholder for a price the order type does not use.
pub const NOT_APPLICABLE: &str = "N/A";

/// Column headers, in display order.
pub const COLUMNS: [&str; 7] = [
    "Symbol",
    "Type",
    "Quantity",
    "Price",
    "Stop Price",
    "Side",
    "Time",
];

/// Side column cell with its colour tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideCell {
    /// Text shown.
    pub label: &'static str,
    /// Tone; buys and sells are styled differently.
    pub tone: OrderSide,
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    /// Order id, used as the row key.
    pub id: String,
    /// Symbol.
    pub symbol: String,
    /// Order type.
    pub order_type: String,
    /// Quantity.
    pub quantity: String,
    /// Price, or `N/A`.
    pub price: String,
    /// Stop price, or `N/A`.
    pub stop_price: String,
    /// Side.
    pub side: SideCell,
    /// Creation time, e.g. `10 Jun 2024, 06:13:20 UTC`.
    pub timestamp: String,
}

impl OrderRow {
    fn cells(&self) -> [&str; 7] {
        [
            &self.symbol,
            &self.order_type,
            &self.quantity,
            &self.price,
            &self.stop_price,
            self.side.label,
            &self.timestamp,
        ]
    }
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id().to_string(),
            symbol: order.symbol().to_string(),
            order_type: order.order_type().to_string(),
            quantity: order.quantity().to_string(),
            price: format_price(order.price()),
            stop_price: format_price(order.stop_price()),
            side: SideCell {
                label: order.side().as_str(),
                tone: order.side(),
            },
            timestamp: order.timestamp().to_display_string(),
        }
    }
}

/// What the table shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    /// A request is in flight.
    Loading,
    /// No orders.
    Empty(&'static str),
    /// Orders in store order.
    Rows(Vec<OrderRow>),
}

impl TableView {
    /// Build the view for a store state.
    #[must_use]
    pub fn from_snapshot(snapshot: &StoreSnapshot) -> Self {
        if snapshot.busy {
            Self::Loading
        } else if snapshot.orders.is_empty() {
            Self::Empty(EMPTY_MESSAGE)
        } else {
            Self::Rows(snapshot.orders.iter().map(OrderRow::from).collect())
        }
    }
}

/// Cached view plus the store version it was built from.
#[derive(Debug)]
struct Rendered {
    version: u64,
    view: TableView,
}

impl Rendered {
    fn new(snapshot: &StoreSnapshot) -> Self {
        Self {
            version: snapshot.version,
            view: TableView::from_snapshot(snapshot),
        }
    }

    /// Rebuild from `snapshot` unless it is older than the cached view.
    fn apply(&mut self, snapshot: &StoreSnapshot) -> bool {
        if snapshot.version < self.version {
            return false;
        }
        *self = Self::new(snapshot);
        true
    }
}

/// Order table bound to a store.
pub struct OrderTable<A>
where
    A: OrderApiPort,
{
    store: Arc<OrderStore<A>>,
    rendered: Arc<RwLock<Rendered>>,
    renders: Arc<AtomicUsize>,
    _subscription: Subscription,
}

impl<A> OrderTable<A>
where
    A: OrderApiPort,
{
    /// Create a table and subscribe it to `store`.
    #[must_use]
    pub fn new(store: Arc<OrderStore<A>>) -> Self {
        let rendered = Arc::new(RwLock::new(Rendered::new(&store.snapshot())));
        let renders = Arc::new(AtomicUsize::new(1));

        let subscription = {
            let rendered = Arc::clone(&rendered);
            let renders = Arc::clone(&renders);
            store.subscribe(move |snapshot| {
                if rendered.write().apply(snapshot) {
                    renders.fetch_add(1, Ordering::Relaxed);
                }
            })
        };

        Self {
            store,
            rendered,
            renders,
            _subscription: subscription,
        }
    }

    /// Current view.
    #[must_use]
    pub fn view(&self) -> TableView {
        self.rendered.read().view.clone()
    }

    /// Number of times the view has been built, including the first.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::Relaxed)
    }

    /// Clear every order, locally at once and then on the server.
    pub async fn clear(&self) -> Result<String, StoreError> {
        self.store.clear_all().await
    }

    /// Plain-text rendering of the current view.
    #[must_use]
    pub fn render_text(&self) -> String {
        match self.view() {
            TableView::Loading => "Loading...".to_string(),
            TableView::Empty(message) => message.to_string(),
            TableView::Rows(rows) => render_rows(&rows),
        }
    }
}

impl<A> std::fmt::Debug for OrderTable<A>
where
    A: OrderApiPort,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderTable")
            .field("view", &self.rendered.read().view)
            .field("renders", &self.render_count())
            .finish_non_exhaustive()
    }
}

fn format_price(price: Option<Decimal>) -> String {
    price.map_or_else(|| NOT_APPLICABLE.to_string(), |p| format!("{:.2}", p.round_dp(2)))
}

fn render_rows(rows: &[OrderRow]) -> String {
    let mut widths = COLUMNS.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    write_line(&mut out, &COLUMNS, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
    write_line(&mut out, &rule, &widths);
    for row in rows {
        write_line(&mut out, &row.cells(), &widths);
    }
    out
}

fn write_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}
