pub mod payload;
pub mod servicenow;

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use crate::config::SubmitConfig;

pub use payload::Payload;
pub use servicenow::{Credentials, ServiceNowClient};

/// Destination for a finished payload.
#[async_trait]
pub trait Submitter: Send + Sync {
    /// Deliver the payload. Retrying is up to the implementation.
    async fn submit(&self, payload: &Payload) -> Result<()>;

    /// Display name for this destination (e.g., "ServiceNow").
    fn name(&self) -> &str;
}

/// Prints the payload to stdout instead of sending it.
pub struct DryRun;

#[async_trait]
impl Submitter for DryRun {
    async fn submit(&self, payload: &Payload) -> Result<()> {
        let json = serde_json::to_string_pretty(payload).context("failed to serialise payload")?;
        println!("{}", json);
        Ok(())
    }

    fn name(&self) -> &str {
        "dry run"
    }
}

/// Construct the submitter for this invocation.
pub fn connect(
    config: &SubmitConfig,
    instance: &str,
    credentials: Credentials,
    dry_run: bool,
) -> Result<Box<dyn Submitter>> {
    if dry_run {
        return Ok(Box::new(DryRun));
    }
    let base_url = config
        .endpoint
        .clone()
        .unwrap_or_else(|| format!("https://{}.service-now.com", instance));
    let client = ServiceNowClient::new(
        base_url,
        credentials,
        Duration::from_secs(config.timeout_secs),
        config.retries,
    )?;
    Ok(Box::new(client))
}

/// Submit and log the outcome.
pub async fn deliver(submitter: &dyn Submitter, payload: &Payload) -> Result<()> {
    submitter.submit(payload).await?;
    info!(
        destination = submitter.name(),
        summaries = payload.test_summaries.len(),
        "test summary submitted"
    );
    Ok(())
}
