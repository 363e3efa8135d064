//! Order source seam
//!
//! The live marketplace client lives outside this workspace. Anything that
//! can yield [`Order`]s for a time window implements [`OrderSource`];
//! [`JsonOrderSource`] reads a receipts export saved to disk.

use std::path::PathBuf;

use ornament_core::{CustomizationField, Error, Money, Order, OrderLineItem, Result};
use serde::Deserialize;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};
use tracing::{debug, info, warn};

/// Half-open time range `[since, until)` on order creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub since: OffsetDateTime,
    pub until: OffsetDateTime,
}

impl TimeWindow {
    pub fn new(since: OffsetDateTime, until: OffsetDateTime) -> Self {
        Self { since, until }
    }

    /// The `days` days leading up to `now`. A span reaching past the
    /// earliest representable date starts there instead.
    pub fn last_days(days: i64, now: OffsetDateTime) -> Self {
        let since = days
            .checked_mul(86_400)
            .map(Duration::seconds)
            .and_then(|span| now.checked_sub(span))
            .unwrap_or_else(|| {
                warn!("{} days back is out of range; using the earliest date", days);
                PrimitiveDateTime::MIN.assume_offset(now.offset())
            });
        Self { since, until: now }
    }

    pub fn contains(&self, at: OffsetDateTime) -> bool {
        at >= self.since && at < self.until
    }
}

/// Which order statuses to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Everything not marked completed
    #[default]
    Open,
    All,
}

impl StatusFilter {
    pub fn accepts(self, order: &Order) -> bool {
        match self {
            Self::Open => order.is_open(),
            Self::All => true,
        }
    }
}

/// Trait for anything that can produce orders for a run
pub trait OrderSource {
    /// Fetch orders created inside `window` whose status passes `status`
    fn fetch_orders(&self, window: &TimeWindow, status: StatusFilter) -> Result<Vec<Order>>;
}

/// Reads a marketplace receipts export (JSON array, or an object with a
/// `results` array) from disk.
pub struct JsonOrderSource {
    path: PathBuf,
}

impl JsonOrderSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse every order in the export without filtering.
    pub fn load_all(&self) -> Result<Vec<Order>> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| Error::ReadFile {
            path: self.path.clone(),
            source,
        })?;
        parse_export(&content)
    }
}

impl OrderSource for JsonOrderSource {
    fn fetch_orders(&self, window: &TimeWindow, status: StatusFilter) -> Result<Vec<Order>> {
        let all = self.load_all()?;
        let total = all.len();

        let orders: Vec<Order> = all
            .into_iter()
            .filter(|o| window.contains(o.created_at))
            .filter(|o| status.accepts(o))
            .collect();

        info!(
            "Loaded {} of {} orders from {}",
            orders.len(),
            total,
            self.path.display()
        );
        Ok(orders)
    }
}

/// Parse export JSON into domain orders.
pub fn parse_export(content: &str) -> Result<Vec<Order>> {
    let export: RawExport = serde_json::from_str(content)?;
    let receipts = match export {
        RawExport::List(receipts) => receipts,
        RawExport::Page { results } => results,
    };

    receipts.into_iter().map(convert_receipt).collect()
}

// =============================================================================
// Export wire format
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExport {
    List(Vec<RawReceipt>),
    Page { results: Vec<RawReceipt> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

#[derive(Deserialize)]
struct RawReceipt {
    receipt_id: RawId,
    #[serde(default)]
    name: Option<String>,
    create_timestamp: i64,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message_from_buyer: Option<String>,
    #[serde(default)]
    transactions: Vec<RawTransaction>,
}

#[derive(Deserialize)]
struct RawTransaction {
    #[serde(default)]
    sku: Option<String>,
    #[serde(default = "default_quantity")]
    quantity: u32,
    #[serde(default)]
    price: Option<RawPrice>,
    #[serde(default)]
    variations: Vec<RawVariation>,
}

#[derive(Deserialize)]
struct RawPrice {
    amount: i64,
    #[serde(default = "default_divisor")]
    divisor: i64,
    #[serde(default = "default_currency")]
    currency_code: String,
}

#[derive(Deserialize)]
struct RawVariation {
    #[serde(default)]
    formatted_name: String,
    #[serde(default)]
    formatted_value: String,
}

fn default_quantity() -> u32 {
    1
}

fn default_divisor() -> i64 {
    100
}

fn default_currency() -> String {
    "USD".to_string()
}

// =============================================================================
// Conversions
// =============================================================================

fn convert_receipt(receipt: RawReceipt) -> Result<Order> {
    let receipt_id = match receipt.receipt_id {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    };

    let created_at = OffsetDateTime::from_unix_timestamp(receipt.create_timestamp).map_err(|e| {
        Error::InvalidOrderExport(format!("receipt {receipt_id}: bad create_timestamp: {e}"))
    })?;

    let line_items: Vec<OrderLineItem> = receipt
        .transactions
        .into_iter()
        .map(convert_transaction)
        .collect();

    debug!("Receipt {} has {} line items", receipt_id, line_items.len());

    Ok(Order {
        receipt_id,
        buyer_name: receipt
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Unknown Customer".to_string()),
        created_at,
        status: receipt.status.unwrap_or_default(),
        buyer_message: receipt.message_from_buyer.filter(|m| !m.trim().is_empty()),
        line_items,
    })
}

fn convert_transaction(tx: RawTransaction) -> OrderLineItem {
    let price = tx
        .price
        .map(|p| Money::from_minor(p.amount, p.divisor, p.currency_code))
        .unwrap_or_else(|| Money::zero("USD"));

    let customizations = tx
        .variations
        .into_iter()
        .map(|v| CustomizationField::new(v.formatted_name, v.formatted_value))
        .collect();

    OrderLineItem::new(tx.sku.unwrap_or_default(), customizations)
        .with_quantity(tx.quantity)
        .with_price(price)
}
