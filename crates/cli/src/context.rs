//! Settings and collaborator wiring for CLI commands

use crate::output::OutputFormat;
use anyhow::{Context as _, Result};
use space_lib::{
    init_tracing, AwsClients, DryRunPublisher, MetricsPublisher, Orchestrator,
    SessionConfig, Settings, SpaceMetric,
};
use std::sync::Arc;

/// Resolved once per CLI process
pub struct Context {
    pub settings: Settings,
    pub session: SessionConfig,
    pub format: OutputFormat,
}

impl Context {
    /// Load settings and let command-line flags override the session
    ///
    /// This is the only place the CLI installs a tracing subscriber, using
    /// the configured log format.
    pub fn new(
        profile: Option<String>,
        region: Option<String>,
        format: OutputFormat,
        tracing: bool,
    ) -> Result<Self> {
        let mut settings = Settings::load().context("Failed to load settings")?;
        if profile.is_some() {
            settings.profile = profile;
        }
        if region.is_some() {
            settings.region = region;
        }

        if tracing {
            init_tracing(settings.log_format);
        }

        let session = settings.session()?;
        Ok(Self {
            settings,
            session,
            format,
        })
    }

    pub async fn clients(&self) -> AwsClients {
        AwsClients::connect(&self.session).await
    }

    /// Wire a job from the given collaborators
    pub fn metric(
        &self,
        orchestrator: Arc<dyn Orchestrator>,
        publisher: Arc<dyn MetricsPublisher>,
    ) -> SpaceMetric {
        SpaceMetric::new(orchestrator, publisher, self.settings.clone())
    }

    /// A job against live ECS that never publishes
    pub async fn read_only_metric(&self) -> SpaceMetric {
        let clients = self.clients().await;
        self.metric(Arc::new(clients.orchestrator()), Arc::new(DryRunPublisher))
    }
}
