//! Order categorization for ornament
//!
//! Ties the pieces together for one run:
//! - [`generator`]: line item -> canonical design filename
//! - [`matcher`]: design filename -> exists / needs update / needs made
//! - [`OrderCategorizer`]: walks orders (or bare name lists) and buckets
//!   every workflow item for reporting

pub mod generator;
pub mod matcher;

use std::collections::BTreeMap;

use ornament_core::{CenterType, DesignIdentifier, Order, OrderLineItem, ProductFamily};
use ornament_sources::{CatalogIndex, IndexedDesignFile, SeenOrders};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info};

pub use generator::{FieldNames, FilenameGenerator, SkuTable, UNKNOWN_NAME, compose, current_year};
pub use matcher::{Candidate, DesignMatcher, FieldChange, MatchOutcome, MatchStatus, describe};
pub use ornament_core::CenterChangePolicy;

/// Buyer-message phrases that mean the customer wants to see the design
/// before it is made.
pub const PREVIEW_KEYWORDS: &[&str] = &[
    "preview",
    "mock up",
    "mockup",
    "mock-up",
    "proof",
    "see the design",
    "see design",
    "approve",
    "approval",
];

/// True when a buyer message asks for a design preview.
pub fn wants_preview(message: Option<&str>) -> bool {
    let Some(message) = message else {
        return false;
    };
    let lower = message.to_lowercase();
    PREVIEW_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// One workflow line item with its generated filename and classification.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedItem {
    pub line_item: OrderLineItem,
    pub design_identifier: DesignIdentifier,
    pub family: ProductFamily,
    pub status: MatchStatus,
    pub matched_file: Option<IndexedDesignFile>,
    /// `"Field: old → new"` list, only for [`MatchStatus::NeedsUpdate`]
    pub diff: Option<String>,
}

impl ClassifiedItem {
    fn new(
        line_item: OrderLineItem,
        design_identifier: DesignIdentifier,
        family: ProductFamily,
        outcome: MatchOutcome,
    ) -> Self {
        let diff = outcome.diff_description();
        Self {
            line_item,
            design_identifier,
            family,
            status: outcome.status,
            matched_file: outcome.matched_file,
            diff,
        }
    }
}

/// Whether an order was already pulled by the previous run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderRecency {
    #[default]
    New,
    Existing,
}

impl OrderRecency {
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Existing => "Previously Pulled",
        }
    }
}

/// A classified item together with the order it came from.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemReport {
    /// Marketplace receipt the item belongs to
    pub receipt_id: String,
    pub buyer_name: String,
    /// New since the previous run, or already pulled by it
    pub order_status: OrderRecency,
    /// Buyer asked to see the design first
    pub preview: bool,
    #[serde(flatten)]
    pub item: ClassifiedItem,
}

/// Line item whose SKU is not a workflow product.
#[derive(Debug, Clone, Serialize)]
pub struct UnrecognizedItem {
    /// Marketplace receipt the item belongs to
    pub receipt_id: String,
    pub buyer_name: String,
    /// SKU as listed on the order, possibly empty
    pub sku: String,
    /// Units ordered
    pub quantity: u32,
}

/// Item tally for one (family, status) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub family: ProductFamily,
    pub status: MatchStatus,
    /// Classified items in this bucket, zero when none
    pub count: usize,
}

/// Everything one `categorize` run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Wall-clock time the report was assembled
    #[serde(with = "time::serde::timestamp")]
    pub generated_at: OffsetDateTime,
    /// Orders examined, including those with no workflow items
    pub orders: usize,
    /// One entry per family and status, always six
    pub counts: Vec<BucketCount>,
    /// Workflow items in export order
    pub items: Vec<OrderItemReport>,
    /// Line items whose SKU is not a workflow product
    pub unrecognized: Vec<UnrecognizedItem>,
}

impl RunReport {
    fn new(orders: usize, items: Vec<OrderItemReport>, unrecognized: Vec<UnrecognizedItem>) -> Self {
        let mut tally: BTreeMap<(u8, u8), BucketCount> = BTreeMap::new();
        for family in [ProductFamily::Ms, ProductFamily::Rr] {
            for status in MatchStatus::ALL {
                tally.insert(
                    bucket_key(family, status),
                    BucketCount {
                        family,
                        status,
                        count: 0,
                    },
                );
            }
        }
        for report in &items {
            if let Some(bucket) = tally.get_mut(&bucket_key(report.item.family, report.item.status)) {
                bucket.count += 1;
            }
        }

        Self {
            generated_at: OffsetDateTime::now_utc(),
            orders,
            counts: tally.into_values().collect(),
            items,
            unrecognized,
        }
    }

    /// Number of items in one (family, status) bucket.
    pub fn count(&self, family: ProductFamily, status: MatchStatus) -> usize {
        self.counts
            .iter()
            .find(|b| b.family == family && b.status == status)
            .map(|b| b.count)
            .unwrap_or(0)
    }

    pub fn with_status(&self, status: MatchStatus) -> impl Iterator<Item = &OrderItemReport> {
        self.items.iter().filter(move |r| r.item.status == status)
    }

    pub fn previews(&self) -> impl Iterator<Item = &OrderItemReport> {
        self.items.iter().filter(|r| r.preview)
    }

    /// Items from orders the previous run had not pulled.
    pub fn new_items(&self) -> impl Iterator<Item = &OrderItemReport> {
        self.items.iter().filter(|r| r.order_status == OrderRecency::New)
    }
}

fn bucket_key(family: ProductFamily, status: MatchStatus) -> (u8, u8) {
    let family = match family {
        ProductFamily::Ms => 0,
        ProductFamily::Rr => 1,
    };
    let status = match status {
        MatchStatus::NeedsMade => 0,
        MatchStatus::NeedsUpdate => 1,
        MatchStatus::Exists => 2,
    };
    (family, status)
}

/// Result of checking one entry of a bare name list.
#[derive(Debug, Clone, Serialize)]
pub struct NameCheck {
    /// Entry as listed, remark included
    pub original_name: String,
    pub name: String,
    pub design_identifier: DesignIdentifier,
    pub status: MatchStatus,
    pub matched_file: Option<IndexedDesignFile>,
    pub diff: Option<String>,
    pub days_since_modified: Option<i64>,
}

/// Strip a listed name down to the person's name: trimmed, with any
/// parenthesized remark dropped ("John Jackie (if possible)" -> "John
/// Jackie"). `None` for blank entries.
pub fn clean_listed_name(raw: &str) -> Option<String> {
    let mut name = raw.trim();
    if name.contains('(') && name.contains(')') {
        name = name.split('(').next().unwrap_or_default().trim();
    }
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Runs generation and matching over a batch of work against one catalog.
pub struct OrderCategorizer<'a> {
    generator: &'a FilenameGenerator,
    matcher: &'a DesignMatcher,
    catalog: &'a CatalogIndex,
    seen: Option<&'a SeenOrders>,
}

impl<'a> OrderCategorizer<'a> {
    pub fn new(
        generator: &'a FilenameGenerator,
        matcher: &'a DesignMatcher,
        catalog: &'a CatalogIndex,
    ) -> Self {
        Self {
            generator,
            matcher,
            catalog,
            seen: None,
        }
    }

    /// Mark orders found in `seen` as [`OrderRecency::Existing`]. Without
    /// it every order counts as new.
    pub fn with_seen_orders(mut self, seen: &'a SeenOrders) -> Self {
        self.seen = Some(seen);
        self
    }

    fn recency(&self, receipt_id: &str) -> OrderRecency {
        match self.seen {
            Some(seen) if seen.contains(receipt_id) => OrderRecency::Existing,
            _ => OrderRecency::New,
        }
    }

    /// Classify one line item; `None` when its SKU is not a workflow product.
    pub fn classify_item(&self, item: &OrderLineItem) -> Option<ClassifiedItem> {
        let family = self.generator.family(&item.sku)?;
        let identifier = self.generator.generate(item)?;
        let outcome = self.matcher.classify(identifier.as_str(), self.catalog);
        debug!("{} -> {}", identifier, outcome.status);
        Some(ClassifiedItem::new(item.clone(), identifier, family, outcome))
    }

    /// One entry per line item with a workflow SKU; others are skipped.
    pub fn classify_all(&self, items: &[OrderLineItem]) -> Vec<ClassifiedItem> {
        items.iter().filter_map(|i| self.classify_item(i)).collect()
    }

    /// Classify every line item of every order.
    pub fn categorize(&self, orders: &[Order]) -> RunReport {
        let mut items = Vec::new();
        let mut unrecognized = Vec::new();

        for order in orders {
            let preview = wants_preview(order.buyer_message.as_deref());
            let order_status = self.recency(&order.receipt_id);
            for line_item in &order.line_items {
                match self.classify_item(line_item) {
                    Some(item) => items.push(OrderItemReport {
                        receipt_id: order.receipt_id.clone(),
                        buyer_name: order.buyer_name.clone(),
                        order_status,
                        preview,
                        item,
                    }),
                    None => unrecognized.push(UnrecognizedItem {
                        receipt_id: order.receipt_id.clone(),
                        buyer_name: order.buyer_name.clone(),
                        sku: line_item.sku.clone(),
                        quantity: line_item.quantity,
                    }),
                }
            }
        }

        let report = RunReport::new(orders.len(), items, unrecognized);
        info!(
            "Categorized {} items from {} orders ({} unrecognized)",
            report.items.len(),
            report.orders,
            report.unrecognized.len()
        );
        report
    }

    /// Check a bare list of names as `{Name} Ms {Center}` (MS) or
    /// `{Name} {Center}` (RR) designs.
    pub fn check_names<S: AsRef<str>>(
        &self,
        names: &[S],
        family: ProductFamily,
        center: CenterType,
    ) -> Vec<NameCheck> {
        let now = OffsetDateTime::now_utc();
        let mut results = Vec::new();

        for raw in names {
            let raw = raw.as_ref();
            let Some(name) = clean_listed_name(raw) else {
                continue;
            };

            let sanitized = generator::person_name(Some(name.as_str()));
            let identifier = compose(family, &sanitized, center.as_token(), "");
            let outcome = self.matcher.classify(identifier.as_str(), self.catalog);
            debug!("Checking: {} -> {} ({})", name, identifier, outcome.status);

            let diff = outcome.diff_description();
            let days_since_modified = match outcome.status {
                MatchStatus::Exists => outcome
                    .matched_file
                    .as_ref()
                    .and_then(|f| f.days_since_modified(now)),
                _ => None,
            };

            results.push(NameCheck {
                original_name: raw.trim().to_string(),
                name,
                design_identifier: identifier,
                status: outcome.status,
                matched_file: outcome.matched_file,
                diff,
                days_since_modified,
            });
        }

        info!("Checked {} names", results.len());
        results
    }
}
