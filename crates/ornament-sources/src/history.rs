//! Order IDs pulled by the previous run
//!
//! Each `check` run records the receipt IDs it saw. The next run marks an
//! order as new when its ID is absent from that record. Only the latest run
//! is remembered; saving replaces the previous set.

use std::collections::BTreeSet;
use std::path::Path;

use ornament_core::{Error, Result};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

/// On-disk record of the receipt IDs one run pulled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenOrders {
    /// When the record was written; absent for an empty record
    #[serde(default, with = "time::serde::timestamp::option")]
    pub saved_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub order_ids: BTreeSet<String>,
}

impl SeenOrders {
    /// Read the record at `path`. A missing file is an empty record, so
    /// the first run reports every order as new.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(
                "No previous run at {}; all orders will be marked new",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let seen: Self = serde_json::from_str(&content)?;
        info!(
            "Loaded {} order IDs from previous run",
            seen.order_ids.len()
        );
        Ok(seen)
    }

    /// Replace the record at `path` with `order_ids`, creating parent
    /// directories as needed.
    pub fn save<I, S>(path: &Path, order_ids: I, now: OffsetDateTime) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let seen = Self {
            saved_at: Some(now),
            order_ids: order_ids.into_iter().map(Into::into).collect(),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&seen)?)?;

        info!("Saved {} order IDs for next run", seen.order_ids.len());
        Ok(seen)
    }

    pub fn contains(&self, receipt_id: &str) -> bool {
        self.order_ids.contains(receipt_id)
    }
}
