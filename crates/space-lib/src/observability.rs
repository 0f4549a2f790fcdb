//! Observability infrastructure for the space metric
//!
//! Provides:
//! - Prometheus metrics (invocation latency, failures, last estimate per cluster)
//! - Structured JSON logging with tracing

use crate::config::LogFormat;
use crate::error::EstimateError;
use crate::models::{CapacityEstimate, InstanceCapacity, MetricDatum, ResourceFootprint};
use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_counter_vec,
    register_int_gauge_vec, GaugeVec, Histogram, IntCounter, IntCounterVec, IntGaugeVec,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Histogram buckets for invocation latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

/// Install the global tracing subscriber, writing to stderr
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<EstimatorMetricsInner> = OnceLock::new();

struct EstimatorMetricsInner {
    invocation_latency_seconds: Histogram,
    invocations: IntCounter,
    failures: IntCounterVec,
    degenerate_footprints: IntCounter,
    schedulable_containers: IntGaugeVec,
    instances_observed: IntGaugeVec,
    published_value: GaugeVec,
}

impl EstimatorMetricsInner {
    fn new() -> Self {
        Self {
            invocation_latency_seconds: register_histogram!(
                "space_metric_invocation_latency_seconds",
                "Time spent on one resolve-estimate-publish invocation",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register invocation_latency_seconds"),

            invocations: register_int_counter!(
                "space_metric_invocations_total",
                "Total number of invocations started"
            )
            .expect("Failed to register invocations_total"),

            failures: register_int_counter_vec!(
                "space_metric_failures_total",
                "Total number of failed invocations by error kind",
                &["kind"]
            )
            .expect("Failed to register failures_total"),

            degenerate_footprints: register_int_counter!(
                "space_metric_degenerate_footprints_total",
                "Invocations where no container reserved CPU or memory"
            )
            .expect("Failed to register degenerate_footprints_total"),

            schedulable_containers: register_int_gauge_vec!(
                "space_metric_schedulable_containers",
                "Last estimated number of schedulable containers",
                &["cluster"]
            )
            .expect("Failed to register schedulable_containers"),

            instances_observed: register_int_gauge_vec!(
                "space_metric_instances_observed",
                "Active container instances seen in the last estimate",
                &["cluster"]
            )
            .expect("Failed to register instances_observed"),

            published_value: register_gauge_vec!(
                "space_metric_published_value",
                "Last value handed to the Prometheus publisher",
                &["metric", "series"]
            )
            .expect("Failed to register published_value"),
        }
    }
}

/// Estimator metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct EstimatorMetrics {
    _private: (),
}

impl Default for EstimatorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EstimatorMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(EstimatorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &EstimatorMetricsInner {
        GLOBAL_METRICS.get_or_init(EstimatorMetricsInner::new)
    }

    pub fn observe_invocation_latency(&self, duration_secs: f64) {
        self.inner().invocation_latency_seconds.observe(duration_secs);
    }

    pub fn inc_invocations(&self) {
        self.inner().invocations.inc();
    }

    pub fn inc_failures(&self, kind: &str) {
        self.inner().failures.with_label_values(&[kind]).inc();
    }

    /// Record the outcome of a successful estimate
    pub fn record_estimate(&self, cluster: &str, estimate: &CapacityEstimate) {
        let inner = self.inner();
        inner
            .schedulable_containers
            .with_label_values(&[cluster])
            .set(i64::try_from(estimate.total).unwrap_or(i64::MAX));
        inner
            .instances_observed
            .with_label_values(&[cluster])
            .set(estimate.instances.len() as i64);
        if estimate.degenerate {
            inner.degenerate_footprints.inc();
        }
    }

    pub fn schedulable(&self, cluster: &str) -> i64 {
        self.inner()
            .schedulable_containers
            .with_label_values(&[cluster])
            .get()
    }

    pub fn set_published_value(&self, metric: &str, series: &str, value: f64) {
        self.inner()
            .published_value
            .with_label_values(&[metric, series])
            .set(value);
    }

    pub fn published_value(&self, metric: &str, series: &str) -> f64 {
        self.inner()
            .published_value
            .with_label_values(&[metric, series])
            .get()
    }
}

/// Structured logger for invocation events
///
/// Every event carries the cluster so one invocation can be followed
/// across log lines.
#[derive(Clone)]
pub struct StructuredLogger {
    cluster: String,
}

impl StructuredLogger {
    pub fn new(cluster: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
        }
    }

    pub fn log_invocation_start(&self) {
        info!(
            event = "invocation_started",
            cluster = %self.cluster,
            "Estimating schedulable containers"
        );
    }

    pub fn log_footprint(&self, footprint: &ResourceFootprint) {
        info!(
            event = "footprint_resolved",
            cluster = %self.cluster,
            cpu = footprint.cpu,
            memory = footprint.memory,
            "Resolved largest container footprint"
        );
    }

    /// Per-instance breakdown, one line per instance
    pub fn log_instance_capacity(&self, capacity: &InstanceCapacity) {
        info!(
            event = "instance_capacity",
            cluster = %self.cluster,
            instance_id = %capacity.instance_id,
            by_cpu = ?capacity.by_cpu,
            by_memory = ?capacity.by_memory,
            schedulable = capacity.schedulable,
            "Containers that could be scheduled on instance"
        );
    }

    pub fn log_degenerate_footprint(&self, instances: usize) {
        warn!(
            event = "degenerate_footprint",
            cluster = %self.cluster,
            instances = instances,
            "No container reserves CPU or memory, reporting 0 schedulable"
        );
    }

    pub fn log_estimate(&self, estimate: &CapacityEstimate) {
        info!(
            event = "capacity_estimated",
            cluster = %self.cluster,
            instances = estimate.instances.len(),
            schedulable = estimate.total,
            "Estimated fleet capacity"
        );
    }

    pub fn log_published(&self, datum: &MetricDatum) {
        info!(
            event = "metric_published",
            cluster = %self.cluster,
            namespace = %datum.namespace,
            metric_name = %datum.metric_name,
            value = datum.value,
            "Published schedulable container metric"
        );
    }

    pub fn log_failure(&self, err: &EstimateError) {
        error!(
            event = "invocation_failed",
            cluster = %self.cluster,
            kind = err.kind(),
            error = %err,
            "Invocation aborted, nothing published"
        );
    }
}
