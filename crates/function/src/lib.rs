//! Scheduled entrypoint for the schedulable-containers metric
//!
//! Each trigger delivers a record like `{"Cluster": "prod"}`. The handler
//! runs one resolve-estimate-publish pass for that cluster and acknowledges
//! with an empty object.

use serde_json::{json, Value};
use space_lib::{EstimateResult, InvocationInput, SpaceMetric};

/// Handle one invocation record
pub async fn handle(metric: &SpaceMetric, event: Value) -> EstimateResult<Value> {
    let input = InvocationInput::from_value(event)?;
    metric.run(&input).await?;
    Ok(json!({}))
}
