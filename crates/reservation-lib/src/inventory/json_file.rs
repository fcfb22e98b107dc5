//! Inventory read from a saved `describe-reserved-instances` response

use super::{InventoryFilter, InventorySource};
use crate::models::{ReservationListing, ReservationRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Reads the provider's JSON listing from a file, or stdin for `-`
pub struct JsonFileInventory {
    path: PathBuf,
}

impl JsonFileInventory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<String> {
        if self.path.as_os_str() == "-" {
            let mut content = String::new();
            tokio::io::stdin()
                .read_to_string(&mut content)
                .await
                .context("Failed to read inventory from stdin")?;
            return Ok(content);
        }

        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read inventory file {:?}", self.path))
    }
}

#[async_trait]
impl InventorySource for JsonFileInventory {
    async fn list_reservations(&self, filter: &InventoryFilter) -> Result<Vec<ReservationRecord>> {
        let content = self.read().await?;
        let listing: ReservationListing =
            serde_json::from_str(&content).context("Failed to parse inventory JSON")?;

        let now = chrono::Utc::now();
        let total = listing.reserved_instances.len();
        let records: Vec<_> = listing
            .reserved_instances
            .into_iter()
            .filter(|r| filter.matches(r, now))
            .collect();

        debug!(
            path = ?self.path,
            total = total,
            matched = records.len(),
            "Loaded reservations from file"
        );

        Ok(records)
    }
}
