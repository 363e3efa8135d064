//! Data sources for ornament
//!
//! - [`catalog`]: on-disk design catalog index (built once per run)
//! - [`exclude`]: glob exclusion list applied while scanning the catalog
//! - [`history`]: order IDs seen by the previous run
//! - [`orders`]: order source seam and the JSON export reader

pub mod catalog;
pub mod exclude;
pub mod history;
pub mod orders;

pub use catalog::{CatalogIndex, CatalogOptions, IndexedDesignFile, RootSummary, index_key};
pub use exclude::ExcludeList;
pub use history::SeenOrders;
pub use orders::{JsonOrderSource, OrderSource, StatusFilter, TimeWindow, parse_export};
