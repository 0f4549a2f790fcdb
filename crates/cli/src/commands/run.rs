//! One-shot invocation

use anyhow::Result;
use space_lib::{DryRunPublisher, InvocationInput, MetricsPublisher};
use std::sync::Arc;

use crate::context::Context;
use crate::output::{color_total, print_estimate, print_success, OutputFormat};

/// Estimate and publish once, as the scheduled function would
pub async fn run_once(ctx: &Context, cluster: &str, dry_run: bool) -> Result<()> {
    let input = InvocationInput::new(cluster)?;
    let clients = ctx.clients().await;

    let publisher: Arc<dyn MetricsPublisher> = if dry_run {
        Arc::new(DryRunPublisher)
    } else {
        Arc::new(clients.publisher())
    };
    let metric = ctx.metric(Arc::new(clients.orchestrator()), publisher);

    let estimate = metric.run(&input).await?;

    match ctx.format {
        OutputFormat::Json => print_estimate(&estimate, ctx.format)?,
        OutputFormat::Table => {
            let verb = if dry_run { "Computed" } else { "Published" };
            print_success(&format!(
                "{} {}/{} = {} for cluster {}",
                verb,
                ctx.settings.namespace,
                ctx.settings.metric_name,
                color_total(estimate.total),
                cluster
            ));
        }
    }

    Ok(())
}
