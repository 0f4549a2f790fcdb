//! ECS-backed orchestrator

use super::{async_trait, Orchestrator};
use crate::error::{EstimateError, EstimateResult};
use crate::models::{ContainerSpec, InstanceHeadroom, WorkloadTemplate};
use aws_sdk_ecs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ecs::types::{ContainerDefinition, ContainerInstance, ContainerInstanceStatus, Failure};
use aws_sdk_ecs::Client;
use std::collections::HashMap;
use tracing::{debug, warn};

const CPU_RESOURCE: &str = "CPU";
const MEMORY_RESOURCE: &str = "MEMORY";
const MISSING_REASON: &str = "MISSING";

/// Orchestrator that queries the ECS API
#[derive(Clone)]
pub struct EcsOrchestrator {
    client: Client,
}

impl EcsOrchestrator {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Map an SDK failure onto the estimator's error taxonomy
fn query_error<E, R>(operation: &str, cluster: &str, err: SdkError<E, R>) -> EstimateError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if err.code() == Some("ClusterNotFoundException") {
        return EstimateError::cluster_not_found(cluster);
    }
    EstimateError::TransientQuery(format!("{operation}: {}", DisplayErrorContext(&err)))
}

/// ECS reports integer resources as i32; negative values are clamped to zero
fn non_negative(value: i32, field: &str, owner: &str) -> u64 {
    u64::try_from(value).unwrap_or_else(|_| {
        warn!(field = %field, owner = %owner, value = value, "Negative resource value, treating as 0");
        0
    })
}

/// `DescribeTaskDefinition` answers an unknown reference with a client error
fn template_error<E, R>(reference: &str, err: SdkError<E, R>) -> EstimateError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if err.code() == Some("ClientException") {
        return EstimateError::task_definition_not_found(reference);
    }
    query_error("DescribeTaskDefinition", reference, err)
}

fn missing_failure(failures: &[Failure]) -> Option<&Failure> {
    failures
        .iter()
        .find(|f| f.reason() == Some(MISSING_REASON))
}

fn container_spec(container: &ContainerDefinition, task_definition: &str) -> ContainerSpec {
    let owner = container.name().unwrap_or(task_definition);
    // hard limit first, then the soft reservation
    let memory = container
        .memory()
        .or(container.memory_reservation())
        .map(|m| non_negative(m, "memory", owner))
        .unwrap_or(0);

    ContainerSpec::new(non_negative(container.cpu(), "cpu", owner), memory)
}

fn instance_headroom(instance: &ContainerInstance) -> EstimateResult<InstanceHeadroom> {
    let instance_id = instance
        .ec2_instance_id()
        .or(instance.container_instance_arn())
        .unwrap_or_default()
        .to_string();

    let remaining: HashMap<&str, i32> = instance
        .remaining_resources()
        .iter()
        .filter_map(|r| r.name().map(|name| (name, r.integer_value())))
        .collect();

    let lookup = |name: &str| {
        remaining.get(name).copied().ok_or_else(|| {
            EstimateError::MalformedResponse(format!(
                "instance {instance_id} has no remaining {name} resource"
            ))
        })
    };

    let cpu = lookup(CPU_RESOURCE)?;
    let memory = lookup(MEMORY_RESOURCE)?;

    Ok(InstanceHeadroom {
        available_cpu: non_negative(cpu, "remaining_cpu", &instance_id),
        available_memory: non_negative(memory, "remaining_memory", &instance_id),
        instance_id,
    })
}

#[async_trait]
impl Orchestrator for EcsOrchestrator {
    async fn list_services(&self, cluster: &str) -> EstimateResult<Vec<String>> {
        let output = self
            .client
            .list_services()
            .cluster(cluster)
            .send()
            .await
            .map_err(|e| query_error("ListServices", cluster, e))?;

        Ok(output.service_arns().to_vec())
    }

    async fn describe_service(&self, cluster: &str, service: &str) -> EstimateResult<String> {
        let output = self
            .client
            .describe_services()
            .cluster(cluster)
            .services(service)
            .send()
            .await
            .map_err(|e| query_error("DescribeServices", cluster, e))?;

        if missing_failure(output.failures()).is_some() {
            return Err(EstimateError::service_not_found(service));
        }

        let detail = output
            .services()
            .first()
            .ok_or_else(|| EstimateError::service_not_found(service))?;

        detail
            .task_definition()
            .map(str::to_string)
            .ok_or_else(|| {
                EstimateError::MalformedResponse(format!("service {service} has no task definition"))
            })
    }

    async fn describe_workload_template(&self, reference: &str) -> EstimateResult<WorkloadTemplate> {
        let output = self
            .client
            .describe_task_definition()
            .task_definition(reference)
            .send()
            .await
            .map_err(|e| template_error(reference, e))?;

        let task_definition = output
            .task_definition()
            .ok_or_else(|| EstimateError::task_definition_not_found(reference))?;

        let containers = task_definition
            .container_definitions()
            .iter()
            .map(|c| container_spec(c, reference))
            .collect();

        Ok(WorkloadTemplate {
            reference: task_definition
                .task_definition_arn()
                .unwrap_or(reference)
                .to_string(),
            containers,
        })
    }

    async fn list_active_instances(&self, cluster: &str) -> EstimateResult<Vec<String>> {
        let output = self
            .client
            .list_container_instances()
            .cluster(cluster)
            .status(ContainerInstanceStatus::Active)
            .send()
            .await
            .map_err(|e| query_error("ListContainerInstances", cluster, e))?;

        let arns = output.container_instance_arns().to_vec();
        debug!(cluster = %cluster, instances = arns.len(), "Listed active container instances");
        Ok(arns)
    }

    async fn describe_instances(
        &self,
        cluster: &str,
        instances: &[String],
    ) -> EstimateResult<Vec<InstanceHeadroom>> {
        if instances.is_empty() {
            return Ok(Vec::new());
        }

        let output = self
            .client
            .describe_container_instances()
            .cluster(cluster)
            .set_container_instances(Some(instances.to_vec()))
            .send()
            .await
            .map_err(|e| query_error("DescribeContainerInstances", cluster, e))?;

        if let Some(failure) = missing_failure(output.failures()) {
            return Err(EstimateError::instance_not_found(
                failure.arn().unwrap_or_default(),
            ));
        }

        output
            .container_instances()
            .iter()
            .map(instance_headroom)
            .collect()
    }
}
