//! Read-only inspection commands

use anyhow::{bail, Context as _, Result};
use space_lib::{DryRunPublisher, InMemoryOrchestrator};
use std::path::Path;
use std::sync::Arc;

use crate::context::Context;
use crate::output::{print_estimate, print_footprint};

/// Show the largest container footprint on a live cluster
pub async fn show_footprint(ctx: &Context, cluster: &str) -> Result<()> {
    let metric = ctx.read_only_metric().await;
    let footprint = metric.footprint(cluster).await?;
    print_footprint(&footprint, ctx.format)
}

/// Show per-instance capacity on a live cluster
pub async fn show_headroom(ctx: &Context, cluster: &str) -> Result<()> {
    let metric = ctx.read_only_metric().await;
    let estimate = metric.estimate(cluster).await?;
    print_estimate(&estimate, ctx.format)
}

/// Estimate from a snapshot file without touching AWS
pub async fn estimate_snapshot(ctx: &Context, path: &Path, cluster: Option<String>) -> Result<()> {
    let orchestrator = InMemoryOrchestrator::from_json_file(path)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))?;

    let cluster = match cluster {
        Some(c) => c,
        None => match orchestrator.cluster_names().as_slice() {
            [only] => only.clone(),
            _ => bail!("Snapshot holds no single cluster, pass --cluster"),
        },
    };

    let metric = ctx.metric(Arc::new(orchestrator), Arc::new(DryRunPublisher));
    let estimate = metric.estimate(&cluster).await?;
    print_estimate(&estimate, ctx.format)
}
