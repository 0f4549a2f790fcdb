//! Schedulable-capacity library for ECS clusters
//!
//! This crate provides the core functionality for:
//! - Resolving the largest container footprint defined on a cluster
//! - Estimating how many more copies fit in the fleet's remaining headroom
//! - Querying ECS and publishing the result to CloudWatch
//! - Configuration, structured logging and process metrics

pub mod capacity;
pub mod config;
pub mod error;
pub mod footprint;
pub mod models;
pub mod observability;
pub mod orchestrator;
pub mod pipeline;
pub mod publisher;
pub mod session;

pub use capacity::{estimate_count, estimate_schedulable};
pub use crate::config::{LogFormat, Settings};
pub use error::{EstimateError, EstimateResult};
pub use footprint::{largest_footprint, resolve_largest_footprint};
pub use models::*;
pub use observability::{init_tracing, EstimatorMetrics, StructuredLogger};
pub use orchestrator::{EcsOrchestrator, InMemoryOrchestrator, Orchestrator};
pub use pipeline::SpaceMetric;
pub use publisher::{CloudWatchPublisher, DryRunPublisher, MetricsPublisher, PrometheusPublisher};
pub use session::{AwsClients, SessionConfig};
