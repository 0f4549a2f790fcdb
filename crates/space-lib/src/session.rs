//! AWS session resolution and client construction

use crate::error::{EstimateError, EstimateResult};
use crate::orchestrator::EcsOrchestrator;
use crate::publisher::CloudWatchPublisher;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_ecs::config::Region;
use tracing::info;

/// Which credentials and region context a run uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionConfig {
    /// Whatever the environment provides (Lambda role, env vars, IMDS)
    Ambient,
    /// A named profile and region, for local and test runs
    Explicit { profile: String, region: String },
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl SessionConfig {
    /// Both set gives an explicit session, neither gives the ambient one
    pub fn resolve(profile: Option<String>, region: Option<String>) -> EstimateResult<Self> {
        match (non_blank(profile), non_blank(region)) {
            (Some(profile), Some(region)) => Ok(Self::Explicit { profile, region }),
            (None, None) => Ok(Self::Ambient),
            (Some(_), None) => Err(EstimateError::InvalidConfig(
                "profile given without region".to_string(),
            )),
            (None, Some(_)) => Err(EstimateError::InvalidConfig(
                "region given without profile".to_string(),
            )),
        }
    }

    /// Build the shared SDK configuration
    pub async fn load(&self) -> SdkConfig {
        match self {
            Self::Ambient => aws_config::load_defaults(BehaviorVersion::latest()).await,
            Self::Explicit { profile, region } => {
                info!(profile = %profile, region = %region, "Using explicit session");
                aws_config::defaults(BehaviorVersion::latest())
                    .profile_name(profile)
                    .region(Region::new(region.clone()))
                    .load()
                    .await
            }
        }
    }
}

/// ECS and CloudWatch clients built once per process
#[derive(Clone)]
pub struct AwsClients {
    pub ecs: aws_sdk_ecs::Client,
    pub cloudwatch: aws_sdk_cloudwatch::Client,
}

impl AwsClients {
    pub async fn connect(session: &SessionConfig) -> Self {
        let sdk_config = session.load().await;
        Self {
            ecs: aws_sdk_ecs::Client::new(&sdk_config),
            cloudwatch: aws_sdk_cloudwatch::Client::new(&sdk_config),
        }
    }

    pub fn orchestrator(&self) -> EcsOrchestrator {
        EcsOrchestrator::new(self.ecs.clone())
    }

    pub fn publisher(&self) -> CloudWatchPublisher {
        CloudWatchPublisher::new(self.cloudwatch.clone())
    }
}
