//! Resolve, estimate and publish for one cluster
//!
//! One invocation makes a strictly sequential pass:
//! 1. resolve the largest container footprint from the cluster's services
//! 2. read remaining resources of every ACTIVE container instance
//! 3. estimate the schedulable count
//! 4. publish exactly one data point
//!
//! Any failure before step 4 aborts the invocation and nothing is published.


use crate::capacity::estimate_schedulable;
use crate::config::Settings;
use crate::error::EstimateResult;
use crate::footprint::resolve_largest_footprint;
use crate::models::{CapacityEstimate, InvocationInput, MetricDatum, ResourceFootprint};
use crate::observability::{EstimatorMetrics, StructuredLogger};
use crate::orchestrator::Orchestrator;
use crate::publisher::MetricsPublisher;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// The space metric job with its collaborators wired in
#[derive(Clone)]
pub struct SpaceMetric {
    orchestrator: Arc<dyn Orchestrator>,
    publisher: Arc<dyn MetricsPublisher>,
    settings: Settings,
    metrics: EstimatorMetrics,
}

impl SpaceMetric {
    pub fn new(
        orchestrator: Arc<dyn Orchestrator>,
        publisher: Arc<dyn MetricsPublisher>,
        settings: Settings,
    ) -> Self {
        Self {
            orchestrator,
            publisher,
            settings,
            metrics: EstimatorMetrics::new(),
        }
    }

    pub async fn footprint(&self, cluster: &str) -> EstimateResult<ResourceFootprint> {
        resolve_largest_footprint(self.orchestrator.as_ref(), cluster).await
    }

    /// Resolve and estimate without publishing
    pub async fn estimate(&self, cluster: &str) -> EstimateResult<CapacityEstimate> {
        let logger = StructuredLogger::new(cluster);

        let footprint = self.footprint(cluster).await?;
        logger.log_footprint(&footprint);

        let refs = self.orchestrator.list_active_instances(cluster).await?;
        let headroom = self.orchestrator.describe_instances(cluster, &refs).await?;

        let estimate = estimate_schedulable(footprint, &headroom);
        for capacity in &estimate.instances {
            logger.log_instance_capacity(capacity);
        }
        if estimate.degenerate {
            logger.log_degenerate_footprint(estimate.instances.len());
        }
        logger.log_estimate(&estimate);

        Ok(estimate)
    }

    /// The data point describing an estimate, stamped with the current time
    pub fn datum(&self, cluster: &str, estimate: &CapacityEstimate) -> MetricDatum {
        MetricDatum {
            namespace: self.settings.namespace.clone(),
            metric_name: self.settings.metric_name.clone(),
            dimensions: BTreeMap::from([(
                self.settings.dimension_name.clone(),
                cluster.to_string(),
            )]),
            timestamp: Utc::now(),
            value: estimate.total as f64,
        }
    }

    /// Run one full invocation
    pub async fn run(&self, input: &InvocationInput) -> EstimateResult<CapacityEstimate> {
        let logger = StructuredLogger::new(&input.cluster);
        let start = Instant::now();
        self.metrics.inc_invocations();
        logger.log_invocation_start();

        let result = self.run_inner(&input.cluster, &logger).await;
        self.metrics
            .observe_invocation_latency(start.elapsed().as_secs_f64());

        match &result {
            Ok(estimate) => self.metrics.record_estimate(&input.cluster, estimate),
            Err(e) => {
                self.metrics.inc_failures(e.kind());
                logger.log_failure(e);
            }
        }

        result
    }

    async fn run_inner(
        &self,
        cluster: &str,
        logger: &StructuredLogger,
    ) -> EstimateResult<CapacityEstimate> {
        let estimate = self.estimate(cluster).await?;

        let datum = self.datum(cluster, &estimate);
        self.publisher.publish(&datum).await?;
        logger.log_published(&datum);

        Ok(estimate)
    }
}
