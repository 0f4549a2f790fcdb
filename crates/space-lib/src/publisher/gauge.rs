//! Prometheus gauge publisher for the local exporter

use super::{async_trait, MetricsPublisher};
use crate::error::EstimateResult;
use crate::models::MetricDatum;
use crate::observability::EstimatorMetrics;

/// Records each data point in the process-wide schedulable gauge
#[derive(Clone, Default)]
pub struct PrometheusPublisher {
    metrics: EstimatorMetrics,
}

impl PrometheusPublisher {
    pub fn new(metrics: EstimatorMetrics) -> Self {
        Self { metrics }
    }
}

/// Dimension values joined in name order, used as the gauge label
fn series_label(datum: &MetricDatum) -> String {
    datum
        .dimensions
        .values()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl MetricsPublisher for PrometheusPublisher {
    async fn publish(&self, datum: &MetricDatum) -> EstimateResult<()> {
        self.metrics
            .set_published_value(&datum.metric_name, &series_label(datum), datum.value);
        Ok(())
    }
}
