//! Periodic exporter mode

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use space_lib::{
    AwsClients, DryRunPublisher, EstimatorMetrics, InvocationInput, MetricsPublisher, PrometheusPublisher,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::api::{self, WatchState};
use crate::context::Context;

/// Destination for each run's data point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Sink {
    /// CloudWatch PutMetricData
    #[default]
    CloudWatch,
    /// Only the local /metrics endpoint
    Prometheus,
}

/// Options for the watch loop
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub interval_secs: u64,
    pub port: u16,
    pub sink: Sink,
    pub dry_run: bool,
}

fn publisher_for(options: &WatchOptions, clients: &AwsClients) -> Arc<dyn MetricsPublisher> {
    if options.dry_run {
        return Arc::new(DryRunPublisher);
    }
    match options.sink {
        Sink::CloudWatch => Arc::new(clients.publisher()),
        Sink::Prometheus => Arc::new(PrometheusPublisher::new(EstimatorMetrics::new())),
    }
}

/// Run the estimate every `interval_secs` until interrupted
///
/// The API listener is bound before the first run, so a taken port fails the
/// command. If the server stops, the loop stops with its error.
pub async fn watch(ctx: &Context, cluster: &str, options: WatchOptions) -> Result<()> {
    let input = InvocationInput::new(cluster)?;
    let listener = api::bind(options.port).await?;

    let clients = ctx.clients().await;
    let publisher = publisher_for(&options, &clients);
    let metric = ctx.metric(Arc::new(clients.orchestrator()), publisher);

    let state = Arc::new(WatchState::new(cluster));
    let mut server = tokio::spawn(api::serve(listener, state.clone()));

    info!(
        cluster = %cluster,
        interval_secs = options.interval_secs,
        sink = ?options.sink,
        dry_run = options.dry_run,
        "Starting watch loop"
    );

    let mut ticker = interval(Duration::from_secs(options.interval_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match metric.run(&input).await {
                    Ok(estimate) => state.record_success(estimate.total).await,
                    Err(e) => {
                        warn!(error = %e, "Watch run failed");
                        state.record_failure(e.to_string()).await;
                    }
                }
            }
            result = &mut server => {
                return match result {
                    Ok(Ok(())) => Err(anyhow!("API server stopped")),
                    Ok(Err(e)) => Err(e.context("API server failed")),
                    Err(e) => Err(anyhow!("API server task failed: {e}")),
                };
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down watch loop");
                break;
            }
        }
    }

    server.abort();
    Ok(())
}
