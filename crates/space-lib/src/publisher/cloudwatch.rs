//! CloudWatch `PutMetricData` publisher

use super::{async_trait, MetricsPublisher};
use crate::error::{EstimateError, EstimateResult};
use crate::models::MetricDatum as Datum;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Dimension, MetricDatum, StandardUnit};
use aws_sdk_cloudwatch::Client;

/// Publishes data points as CloudWatch custom metrics
#[derive(Clone)]
pub struct CloudWatchPublisher {
    client: Client,
}

impl CloudWatchPublisher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn build_datum(datum: &Datum) -> EstimateResult<MetricDatum> {
    let mut builder = MetricDatum::builder()
        .metric_name(&datum.metric_name)
        .timestamp(DateTime::from_millis(datum.timestamp.timestamp_millis()))
        .value(datum.value)
        .unit(StandardUnit::Count);

    for (name, value) in &datum.dimensions {
        let dimension = Dimension::builder()
            .name(name)
            .value(value)
            .build();
        builder = builder.dimensions(dimension);
    }

    Ok(builder.build())
}

#[async_trait]
impl MetricsPublisher for CloudWatchPublisher {
    async fn publish(&self, datum: &Datum) -> EstimateResult<()> {
        self.client
            .put_metric_data()
            .namespace(&datum.namespace)
            .metric_data(build_datum(datum)?)
            .send()
            .await
            .map_err(|e| EstimateError::Publish(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}
