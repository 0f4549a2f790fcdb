//! Integration tests for the invocation handler

use ecs_space_metric::handle;
use serde_json::json;
use space_lib::orchestrator::{ClusterSnapshot, ServiceSnapshot};
use space_lib::publisher::async_trait;
use space_lib::{
    ContainerSpec, EstimateError, EstimateResult, InMemoryOrchestrator, InstanceHeadroom,
    MetricDatum, MetricsPublisher, Settings, SpaceMetric, WorkloadTemplate,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingPublisher {
    published: Mutex<Vec<MetricDatum>>,
}

#[async_trait]
impl MetricsPublisher for RecordingPublisher {
    async fn publish(&self, datum: &MetricDatum) -> EstimateResult<()> {
        self.published.lock().unwrap().push(datum.clone());
        Ok(())
    }
}

fn setup() -> (SpaceMetric, Arc<RecordingPublisher>) {
    let snapshot = ClusterSnapshot {
        cluster: "web-cluster".to_string(),
        services: vec![ServiceSnapshot {
            name: "frontend".to_string(),
            task_definition: "frontend:12".to_string(),
        }],
        task_definitions: vec![WorkloadTemplate {
            reference: "frontend:12".to_string(),
            containers: vec![ContainerSpec::new(512, 1024), ContainerSpec::new(128, 128)],
        }],
        instances: vec![
            InstanceHeadroom::new("i-aaa", 2048, 3072),
            InstanceHeadroom::new("i-bbb", 1024, 8192),
        ],
    };

    let publisher = Arc::new(RecordingPublisher::default());
    let metric = SpaceMetric::new(
        Arc::new(InMemoryOrchestrator::new().with_cluster(snapshot)),
        publisher.clone(),
        Settings::default(),
    );
    (metric, publisher)
}

#[tokio::test]
async fn test_handler_acknowledges_with_empty_object() {
    let (metric, publisher) = setup();

    let response = handle(&metric, json!({ "Cluster": "web-cluster" })).await.unwrap();

    assert_eq!(response, json!({}));
    let published = publisher.published.lock().unwrap();
    assert_eq!(published.len(), 1);
    // min(4, 3) + min(2, 8)
    assert_eq!(published[0].value, 5.0);
}

#[tokio::test]
async fn test_handler_ignores_extra_event_fields() {
    let (metric, publisher) = setup();

    let event = json!({
        "Cluster": "web-cluster",
        "version": "0",
        "detail-type": "Scheduled Event",
        "resources": ["arn:aws:events:eu-west-1:123456789012:rule/every-5-min"]
    });
    handle(&metric, event).await.unwrap();

    assert_eq!(publisher.published.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_handler_rejects_missing_cluster() {
    let (metric, publisher) = setup();

    let err = handle(&metric, json!({ "detail": {} })).await.unwrap_err();

    assert!(matches!(err, EstimateError::InvalidInput(_)));
    assert!(publisher.published.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_handler_surfaces_unknown_cluster() {
    let (metric, publisher) = setup();

    let err = handle(&metric, json!({ "Cluster": "other" })).await.unwrap_err();

    assert!(matches!(err, EstimateError::NotFound { .. }));
    assert!(publisher.published.lock().unwrap().is_empty());
}
