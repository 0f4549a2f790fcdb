//! Metric publishing sinks

mod cloudwatch;
mod gauge;

pub use cloudwatch::CloudWatchPublisher;
pub use gauge::PrometheusPublisher;

use crate::error::EstimateResult;
use crate::models::MetricDatum;
use tracing::info;

pub use async_trait::async_trait;

/// Destination for the computed schedulable count
#[async_trait]
pub trait MetricsPublisher: Send + Sync {
    async fn publish(&self, datum: &MetricDatum) -> EstimateResult<()>;
}

/// Publisher that only logs what would have been sent
#[derive(Debug, Clone, Default)]
pub struct DryRunPublisher;

#[async_trait]
impl MetricsPublisher for DryRunPublisher {
    async fn publish(&self, datum: &MetricDatum) -> EstimateResult<()> {
        info!(
            event = "metric_dry_run",
            namespace = %datum.namespace,
            metric_name = %datum.metric_name,
            dimensions = ?datum.dimensions,
            timestamp = %datum.timestamp,
            value = datum.value,
            "Dry run, metric not published"
        );
        Ok(())
    }
}
