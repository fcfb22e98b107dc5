//! Inventory from the AWS command line client

use super::{InventoryFilter, InventorySource};
use crate::models::{ReservationListing, ReservationRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

/// Runs `aws ec2 describe-reserved-instances` and parses its JSON output
#[derive(Debug, Clone)]
pub struct AwsCliInventory {
    program: String,
    region: Option<String>,
    profile: Option<String>,
}

impl AwsCliInventory {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            region: None,
            profile: None,
        }
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    /// Arguments passed to the AWS CLI for `filter`
    pub fn args(&self, filter: &InventoryFilter) -> Vec<String> {
        let mut args: Vec<String> = ["ec2", "describe-reserved-instances", "--output", "json"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        if let Some(region) = &self.region {
            args.push("--region".to_string());
            args.push(region.clone());
        }
        if let Some(profile) = &self.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }

        let filters = filter.to_provider_filters();
        if !filters.is_empty() {
            args.push("--filters".to_string());
            args.extend(filters);
        }

        args
    }
}

impl Default for AwsCliInventory {
    fn default() -> Self {
        Self::new("aws")
    }
}

#[async_trait]
impl InventorySource for AwsCliInventory {
    async fn list_reservations(&self, filter: &InventoryFilter) -> Result<Vec<ReservationRecord>> {
        let args = self.args(filter);
        debug!(program = %self.program, args = ?args, "Querying reserved instances");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            );
        }

        let listing: ReservationListing = serde_json::from_slice(&output.stdout)
            .context("Failed to parse describe-reserved-instances output")?;

        info!(
            count = listing.reserved_instances.len(),
            "Fetched reserved instances"
        );

        Ok(listing.reserved_instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReservationState;

    #[test]
    fn test_args_without_filters() {
        let source = AwsCliInventory::default();
        assert_eq!(
            source.args(&InventoryFilter::default()),
            vec!["ec2", "describe-reserved-instances", "--output", "json"]
        );
    }

    #[test]
    fn test_args_with_region_profile_and_filters() {
        let source = AwsCliInventory::default()
            .with_region(Some("eu-west-1".to_string()))
            .with_profile(Some("billing".to_string()));
        let filter = InventoryFilter {
            state: Some(ReservationState::Active),
            instance_type: Some("m5".to_string()),
        };

        assert_eq!(
            source.args(&filter),
            vec![
                "ec2",
                "describe-reserved-instances",
                "--output",
                "json",
                "--region",
                "eu-west-1",
                "--profile",
                "billing",
                "--filters",
                "Name=state,Values=active",
                "Name=instance-type,Values=*m5*",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let source = AwsCliInventory::new("definitely-not-an-aws-binary");
        let err = source
            .list_reservations(&InventoryFilter::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("definitely-not-an-aws-binary"));
    }
}
