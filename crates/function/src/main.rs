//! ECS space metric - Lambda function
//!
//! Publishes the number of additional copies of the largest container
//! that still fit on a cluster's container instances.

use anyhow::Result;
use ecs_space_metric::handle;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use space_lib::{init_tracing, AwsClients, Settings, SpaceMetric};
use std::sync::Arc;
use tracing::info;

const FUNCTION_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;
    init_tracing(settings.log_format);

    info!(
        version = FUNCTION_VERSION,
        namespace = %settings.namespace,
        metric_name = %settings.metric_name,
        "Starting ecs-space-metric"
    );

    // Clients are built once per container and reused across invocations
    let session = settings.session()?;
    let clients = AwsClients::connect(&session).await;
    let metric = SpaceMetric::new(
        Arc::new(clients.orchestrator()),
        Arc::new(clients.publisher()),
        settings,
    );

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let metric = metric.clone();
        async move {
            handle(&metric, event.payload)
                .await
                .map_err(lambda_runtime::Error::from)
        }
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}
