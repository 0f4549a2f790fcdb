//! Core data models for the space metric

use crate::error::{EstimateError, EstimateResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Estimated number of additional workload units the fleet can host
pub type SchedulableCount = u64;

/// Resource demand of one representative workload unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFootprint {
    /// CPU units (1024 = one vCPU)
    pub cpu: u64,
    /// Memory in MiB
    pub memory: u64,
}

impl ResourceFootprint {
    pub fn new(cpu: u64, memory: u64) -> Self {
        Self { cpu, memory }
    }

    /// True when no container consumes either resource
    pub fn is_degenerate(&self) -> bool {
        self.cpu == 0 && self.memory == 0
    }
}

/// A single container's declared reservation within a task definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub cpu: u64,
    pub memory: u64,
}

impl ContainerSpec {
    pub fn new(cpu: u64, memory: u64) -> Self {
        Self { cpu, memory }
    }
}

/// A task definition and the containers it declares
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadTemplate {
    /// Task definition ARN or `family:revision`
    pub reference: String,
    pub containers: Vec<ContainerSpec>,
}

/// Unreserved resources on one container instance at observation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceHeadroom {
    pub instance_id: String,
    pub available_cpu: u64,
    pub available_memory: u64,
}

impl InstanceHeadroom {
    pub fn new(instance_id: impl Into<String>, available_cpu: u64, available_memory: u64) -> Self {
        Self {
            instance_id: instance_id.into(),
            available_cpu,
            available_memory,
        }
    }
}

/// How many footprints fit on one instance, per dimension and combined
///
/// `None` means the dimension imposes no limit because the footprint
/// does not consume that resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceCapacity {
    pub instance_id: String,
    pub by_cpu: Option<u64>,
    pub by_memory: Option<u64>,
    pub schedulable: SchedulableCount,
}

/// Fleet-wide result of a capacity estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityEstimate {
    pub footprint: ResourceFootprint,
    pub instances: Vec<InstanceCapacity>,
    pub total: SchedulableCount,
    /// Both footprint dimensions were zero, so nothing could be estimated
    pub degenerate: bool,
}

/// Invocation record delivered by the trigger
///
/// Only `Cluster` is read; every other key is ignored. Deserializing goes
/// through [`InvocationInput::new`], so a blank cluster never gets through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInvocationInput")]
pub struct InvocationInput {
    #[serde(rename = "Cluster")]
    pub cluster: String,
}

#[derive(Deserialize)]
struct RawInvocationInput {
    #[serde(rename = "Cluster")]
    cluster: String,
}

impl TryFrom<RawInvocationInput> for InvocationInput {
    type Error = EstimateError;

    fn try_from(raw: RawInvocationInput) -> EstimateResult<Self> {
        Self::new(raw.cluster)
    }
}

impl InvocationInput {
    /// Build an input for the given cluster, rejecting blank names
    pub fn new(cluster: impl Into<String>) -> EstimateResult<Self> {
        let cluster = cluster.into();
        if cluster.trim().is_empty() {
            return Err(EstimateError::InvalidInput(
                "Cluster must not be empty".to_string(),
            ));
        }
        Ok(Self { cluster })
    }

    /// Parse a raw JSON event
    pub fn from_value(value: serde_json::Value) -> EstimateResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| EstimateError::InvalidInput(format!("invalid invocation record: {e}")))
    }
}

/// A single data point handed to the metrics publisher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDatum {
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: BTreeMap<String, String>,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}
