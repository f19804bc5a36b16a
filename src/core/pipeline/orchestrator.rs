//! Pipeline orchestrator
//!
//! Sequences one run: parse event, route, read, convert (for `.json`),
//! write, provision, notify. The first failing stage ends the run, but the
//! notification is always sent with whatever outcome was reached.

use crate::adapters::bi::create_bi_service;
use crate::adapters::notification::create_publisher;
use crate::adapters::storage::{create_artifact_store, ArtifactStore};
use crate::config::ReportflowConfig;
use crate::core::ingest::parse_event;
use crate::core::notify::{NotificationDispatcher, NotificationSettings};
use crate::core::provision::{
    resolve_context, DashboardProvisioner, ProvisionLocks, ProvisioningSettings,
};
use crate::core::routing::DestinationRouter;
use crate::core::transform::{convert, to_csv};
use crate::domain::{DashboardDescriptor, PipelineOutcome, Result, SourceFormat, StoredObjectRef};
use crate::{log_error_with_context, log_stage_complete};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// What a run reached before it ended
#[derive(Debug, Default)]
struct RunProgress {
    source: Option<StoredObjectRef>,
    destination: Option<StoredObjectRef>,
    dashboard: Option<DashboardDescriptor>,
}

impl RunProgress {
    fn apply(self, mut outcome: PipelineOutcome) -> PipelineOutcome {
        if let Some(source) = self.source {
            outcome = outcome.with_source(source);
        }
        if let Some(destination) = self.destination {
            outcome = outcome.with_destination(destination);
        }
        if let Some(dashboard) = self.dashboard {
            outcome = outcome.with_dashboard(dashboard);
        }
        outcome
    }
}

/// Event-driven conversion and provisioning pipeline
///
/// Holds no per-run state, so one instance can serve concurrent runs.
///
/// # Example
///
/// ```rust,no_run
/// use reportflow::config::load_config;
/// use reportflow::core::pipeline::Pipeline;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("reportflow.toml")?;
/// let pipeline = Pipeline::from_config(&config)?;
///
/// let event: serde_json::Value = serde_json::from_str(r#"{"Records": []}"#)?;
/// let outcome = pipeline.run(&event).await;
/// println!("{}", serde_json::to_string(&outcome.response())?);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    store: Arc<dyn ArtifactStore>,
    router: DestinationRouter,
    provisioner: DashboardProvisioner,
    dispatcher: NotificationDispatcher,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        router: DestinationRouter,
        provisioner: DashboardProvisioner,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            store,
            router,
            provisioner,
            dispatcher,
        }
    }

    /// Builds every collaborator from configuration
    ///
    /// Identifiers and the provisioning context are validated here, once.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid identifiers or backends.
    pub fn from_config(config: &ReportflowConfig) -> Result<Self> {
        let context = resolve_context(&config.provisioning)?;
        let settings = ProvisioningSettings::from_config(&config.provisioning)?;
        let notification = NotificationSettings::from_config(&config.notification, &context)?;

        let store = create_artifact_store(&config.storage)?;
        let router = DestinationRouter::from_config(&config.storage, &config.routing)?;
        let provisioner = DashboardProvisioner::new(
            create_bi_service(&config.provisioning)?,
            context,
            settings,
            Arc::new(ProvisionLocks::new()),
        );
        let dispatcher =
            NotificationDispatcher::new(create_publisher(&config.notification)?, notification);

        tracing::info!(
            storage = store.backend_name(),
            topic = %dispatcher.topic(),
            dataset_id = %provisioner.settings().dataset_id,
            "Pipeline ready"
        );

        Ok(Self::new(store, router, provisioner, dispatcher))
    }

    /// Runs the pipeline for one trigger event
    ///
    /// Never fails: every error becomes a failed [`PipelineOutcome`]. The
    /// notification is published before returning.
    pub async fn run(&self, event: &Value) -> PipelineOutcome {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline_run", %run_id);

        async move {
            let started = Instant::now();
            let mut progress = RunProgress::default();

            let outcome = match self.execute(event, &mut progress).await {
                Ok(detail) => PipelineOutcome::success(run_id, detail),
                Err(e) => {
                    log_error_with_context!(&e, "Pipeline run failed");
                    PipelineOutcome::failure(run_id, &e)
                }
            };
            let outcome = progress.apply(outcome);

            self.dispatcher.notify(&outcome).await;

            tracing::info!(
                status = %outcome.status,
                kind = ?outcome.error_kind,
                duration_ms = started.elapsed().as_millis() as u64,
                "Pipeline run finished"
            );
            outcome
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, event: &Value, progress: &mut RunProgress) -> Result<String> {
        let request = parse_event(event)?;
        let route = self.router.route(&request)?;
        let source = StoredObjectRef::new(
            request.source_location().clone(),
            request.object_key().clone(),
        );
        progress.source = Some(source.clone());

        let started = Instant::now();
        let raw = self
            .store
            .read(request.source_location(), request.object_key())
            .await?;
        log_stage_complete!("read", started.elapsed(), source = %source, bytes = raw.len());

        let bytes = match request.format() {
            SourceFormat::Json => {
                let started = Instant::now();
                let artifact = convert(&raw)?;
                let csv = to_csv(&artifact)?;
                log_stage_complete!("transform", started.elapsed(), rows = artifact.len());
                csv
            }
            SourceFormat::Csv => {
                tracing::debug!(source = %source, "Forwarding CSV unchanged");
                raw
            }
        };

        let started = Instant::now();
        let destination = &route.destination;
        let stored = self
            .store
            .write(&destination.location, &destination.key, bytes)
            .await?;
        log_stage_complete!("write", started.elapsed(), destination = %stored);
        progress.destination = Some(stored.clone());

        if !route.provision {
            tracing::info!(destination = %stored, "Archived without provisioning");
            return Ok(format!("{source} archived to {stored}"));
        }

        let dashboard = self.provisioner.provision(&stored).await?;
        let detail = format!(
            "{source} published to {stored}, dashboard {} refreshed",
            dashboard.dashboard_id
        );
        progress.dashboard = Some(dashboard);
        Ok(detail)
    }
}
