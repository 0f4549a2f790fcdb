//! Container orchestrator queries
//!
//! The estimator only needs five read-only lookups from the orchestrator.
//! `EcsOrchestrator` serves them from the ECS API; `InMemoryOrchestrator`
//! serves them from a JSON cluster snapshot for offline runs and tests.

mod ecs;
mod memory;

pub use ecs::EcsOrchestrator;
pub use memory::{ClusterSnapshot, InMemoryOrchestrator, ServiceSnapshot};

use crate::error::EstimateResult;
use crate::models::{InstanceHeadroom, WorkloadTemplate};

pub use async_trait::async_trait;

/// Read-only view of a cluster's services and instances
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// List service references running on the cluster
    async fn list_services(&self, cluster: &str) -> EstimateResult<Vec<String>>;

    /// Resolve the task definition reference used by a service
    async fn describe_service(&self, cluster: &str, service: &str) -> EstimateResult<String>;

    /// Load the containers declared by a task definition
    async fn describe_workload_template(&self, reference: &str) -> EstimateResult<WorkloadTemplate>;

    /// List references of the cluster's ACTIVE container instances
    async fn list_active_instances(&self, cluster: &str) -> EstimateResult<Vec<String>>;

    /// Load remaining CPU and memory for the given instances
    async fn describe_instances(
        &self,
        cluster: &str,
        instances: &[String],
    ) -> EstimateResult<Vec<InstanceHeadroom>>;
}
