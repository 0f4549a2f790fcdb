//! In-memory orchestrator backed by cluster snapshots

use super::{async_trait, Orchestrator};
use crate::error::{EstimateError, EstimateResult};
use crate::models::{InstanceHeadroom, WorkloadTemplate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A service and the task definition it runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    pub name: String,
    pub task_definition: String,
}

/// Point-in-time description of one cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub cluster: String,
    #[serde(default)]
    pub services: Vec<ServiceSnapshot>,
    #[serde(default)]
    pub task_definitions: Vec<WorkloadTemplate>,
    #[serde(default)]
    pub instances: Vec<InstanceHeadroom>,
}

/// Orchestrator that answers from snapshots held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrchestrator {
    clusters: HashMap<String, ClusterSnapshot>,
}

impl InMemoryOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cluster snapshot, replacing any cluster with the same name
    ///
    /// Task definitions are resolved from every held snapshot, so a replaced
    /// snapshot's task definitions stop resolving along with it.
    pub fn with_cluster(mut self, snapshot: ClusterSnapshot) -> Self {
        self.clusters.insert(snapshot.cluster.clone(), snapshot);
        self
    }

    /// Load a single cluster snapshot from a JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: ClusterSnapshot = serde_json::from_str(&content)?;
        Ok(Self::new().with_cluster(snapshot))
    }

    /// Names of the clusters held
    pub fn cluster_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.clusters.keys().cloned().collect();
        names.sort();
        names
    }

    fn cluster(&self, name: &str) -> EstimateResult<&ClusterSnapshot> {
        self.clusters
            .get(name)
            .ok_or_else(|| EstimateError::cluster_not_found(name))
    }
}

#[async_trait]
impl Orchestrator for InMemoryOrchestrator {
    async fn list_services(&self, cluster: &str) -> EstimateResult<Vec<String>> {
        Ok(self
            .cluster(cluster)?
            .services
            .iter()
            .map(|s| s.name.clone())
            .collect())
    }

    async fn describe_service(&self, cluster: &str, service: &str) -> EstimateResult<String> {
        self.cluster(cluster)?
            .services
            .iter()
            .find(|s| s.name == service)
            .map(|s| s.task_definition.clone())
            .ok_or_else(|| EstimateError::service_not_found(service))
    }

    async fn describe_workload_template(&self, reference: &str) -> EstimateResult<WorkloadTemplate> {
        self.clusters
            .values()
            .flat_map(|c| c.task_definitions.iter())
            .find(|t| t.reference == reference)
            .cloned()
            .ok_or_else(|| EstimateError::task_definition_not_found(reference))
    }

    async fn list_active_instances(&self, cluster: &str) -> EstimateResult<Vec<String>> {
        Ok(self
            .cluster(cluster)?
            .instances
            .iter()
            .map(|i| i.instance_id.clone())
            .collect())
    }

    async fn describe_instances(
        &self,
        cluster: &str,
        instances: &[String],
    ) -> EstimateResult<Vec<InstanceHeadroom>> {
        let snapshot = self.cluster(cluster)?;

        instances
            .iter()
            .map(|id| {
                snapshot
                    .instances
                    .iter()
                    .find(|i| &i.instance_id == id)
                    .cloned()
                    .ok_or_else(|| EstimateError::instance_not_found(id.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContainerSpec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn snapshot() -> ClusterSnapshot {
        ClusterSnapshot {
            cluster: "staging".to_string(),
            services: vec![ServiceSnapshot {
                name: "web".to_string(),
                task_definition: "web:3".to_string(),
            }],
            task_definitions: vec![WorkloadTemplate {
                reference: "web:3".to_string(),
                containers: vec![ContainerSpec::new(256, 512)],
            }],
            instances: vec![InstanceHeadroom::new("i-0abc", 2048, 4096)],
        }
    }

    #[tokio::test]
    async fn test_lookups() {
        let orchestrator = InMemoryOrchestrator::new().with_cluster(snapshot());

        assert_eq!(orchestrator.list_services("staging").await.unwrap(), vec!["web"]);
        assert_eq!(
            orchestrator.describe_service("staging", "web").await.unwrap(),
            "web:3"
        );
        let template = orchestrator.describe_workload_template("web:3").await.unwrap();
        assert_eq!(template.containers.len(), 1);

        let refs = orchestrator.list_active_instances("staging").await.unwrap();
        let headroom = orchestrator.describe_instances("staging", &refs).await.unwrap();
        assert_eq!(headroom[0].available_cpu, 2048);
    }

    #[tokio::test]
    async fn test_unknown_cluster() {
        let orchestrator = InMemoryOrchestrator::new().with_cluster(snapshot());

        let err = orchestrator.list_services("prod").await.unwrap_err();
        assert!(matches!(err, EstimateError::NotFound { kind: "cluster", .. }));
    }

    #[tokio::test]
    async fn test_unknown_instance() {
        let orchestrator = InMemoryOrchestrator::new().with_cluster(snapshot());

        let err = orchestrator
            .describe_instances("staging", &["i-missing".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, EstimateError::NotFound { kind: "container instance", .. }));
    }

    #[tokio::test]
    async fn test_replaced_cluster_drops_its_task_definitions() {
        let mut replacement = snapshot();
        replacement.services[0].task_definition = "web:4".to_string();
        replacement.task_definitions[0].reference = "web:4".to_string();

        let orchestrator = InMemoryOrchestrator::new()
            .with_cluster(snapshot())
            .with_cluster(replacement);

        assert!(orchestrator.describe_workload_template("web:4").await.is_ok());
        let err = orchestrator.describe_workload_template("web:3").await.unwrap_err();
        assert!(matches!(err, EstimateError::NotFound { kind: "task definition", .. }));
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "cluster": "batch",
                "services": [{{"name": "worker", "task_definition": "worker:1"}}],
                "task_definitions": [{{"reference": "worker:1", "containers": [{{"cpu": 512, "memory": 1024}}]}}]
            }}"#
        )
        .unwrap();

        let orchestrator = InMemoryOrchestrator::from_json_file(file.path()).unwrap();
        assert_eq!(orchestrator.cluster_names(), vec!["batch"]);
    }
}
