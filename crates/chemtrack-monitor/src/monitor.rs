//! The chemical status check: scan, evaluate, aggregate, dispatch.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use chemtrack_core::config::AppConfig;
use chemtrack_core::result::AppResult;
use chemtrack_core::traits::{NotificationTransport, RecordStore};
use chemtrack_core::types::Document;
use chemtrack_entity::{AlertCondition, ChemicalRecord};
use chemtrack_notify::{AlertDispatcher, AlertFormatter, DeliverySummary};

use crate::evaluator::ThresholdEvaluator;
use crate::report::{CycleOutcome, CycleReport};
use crate::resolver::RecipientResolver;

/// How one organization's alert went.
#[derive(Debug)]
enum OrganizationOutcome {
    Delivered(DeliverySummary),
    NoRecipients,
    ResolveFailed,
    Empty,
}

/// Runs monitoring cycles against a record store and a transport.
///
/// At most one cycle runs at a time; a trigger that arrives while a cycle
/// is in progress is skipped.
#[derive(Debug)]
pub struct ChemicalMonitor {
    store: Arc<dyn RecordStore>,
    resolver: RecipientResolver,
    evaluator: ThresholdEvaluator,
    formatter: AlertFormatter,
    dispatcher: AlertDispatcher,
    chemicals_collection: String,
    organization_concurrency: usize,
    running: Mutex<()>,
}

impl ChemicalMonitor {
    /// Create a monitor over the given store and transport.
    pub fn new(
        store: Arc<dyn RecordStore>,
        transport: Arc<dyn NotificationTransport>,
        config: &AppConfig,
    ) -> Self {
        Self {
            resolver: RecipientResolver::new(
                Arc::clone(&store),
                config.store.users_collection.clone(),
            ),
            store,
            evaluator: ThresholdEvaluator::new(config.monitor.expiring_window_months),
            formatter: AlertFormatter,
            dispatcher: AlertDispatcher::new(
                transport,
                Duration::from_secs(config.notify.send_timeout_seconds),
            ),
            chemicals_collection: config.store.chemicals_collection.clone(),
            organization_concurrency: config.monitor.organization_concurrency.max(1),
            running: Mutex::new(()),
        }
    }

    /// Run one cycle now, unless one is already running.
    pub async fn trigger(&self) -> AppResult<CycleOutcome> {
        self.trigger_at(Utc::now()).await
    }

    /// Run one cycle evaluated against `now`, unless one is already running.
    ///
    /// A store failure during the chemical scan aborts the cycle before
    /// anything is sent and is returned as the error.
    pub async fn trigger_at(&self, now: DateTime<Utc>) -> AppResult<CycleOutcome> {
        let Ok(_guard) = self.running.try_lock() else {
            warn!("Previous chemical status check still running, skipping trigger");
            return Ok(CycleOutcome::Skipped);
        };

        let cycle_id = Uuid::now_v7();
        let span = info_span!("chemical_check", cycle_id = %cycle_id);

        match self.run_cycle(cycle_id, now).instrument(span).await {
            Ok(report) => Ok(CycleOutcome::Completed(report)),
            Err(e) => {
                error!(cycle_id = %cycle_id, "Chemical status check aborted: {}", e);
                Err(e)
            }
        }
    }

    /// Wait until no cycle is running.
    pub async fn wait_idle(&self) {
        let _guard = self.running.lock().await;
    }

    async fn run_cycle(&self, cycle_id: Uuid, now: DateTime<Utc>) -> AppResult<CycleReport> {
        info!(evaluated_at = %now, "Starting chemical status check");

        let mut report = CycleReport::new(cycle_id, now);
        let documents = self.store.scan_all(&self.chemicals_collection).await?;
        report.documents_scanned = documents.len();

        let batches = self.group_by_organization(&documents, now, &mut report);
        report.organizations_alerted = batches.len();

        let outcomes: Vec<OrganizationOutcome> = stream::iter(batches)
            .map(|(organization, conditions)| self.process_organization(organization, conditions))
            .buffer_unordered(self.organization_concurrency)
            .collect()
            .await;

        for outcome in outcomes {
            match outcome {
                OrganizationOutcome::Delivered(summary) => report.delivery.merge(summary),
                OrganizationOutcome::NoRecipients => report.organizations_without_recipients += 1,
                OrganizationOutcome::ResolveFailed => report.organizations_failed += 1,
                OrganizationOutcome::Empty => {}
            }
        }

        info!(
            documents = report.documents_scanned,
            skipped = report.records_skipped,
            organizations = report.organizations_alerted,
            conditions = report.conditions.total(),
            emails_sent = report.delivery.emails_sent,
            emails_failed = report.delivery.emails_failed,
            pushes_sent = report.delivery.pushes_sent,
            pushes_failed = report.delivery.pushes_failed,
            "Chemical status check finished"
        );
        Ok(report)
    }

    /// Evaluate every parseable chemical and collect conditions per
    /// organization. Organizations without conditions are left out.
    fn group_by_organization(
        &self,
        documents: &[Document],
        now: DateTime<Utc>,
        report: &mut CycleReport,
    ) -> BTreeMap<String, Vec<AlertCondition>> {
        let mut batches: BTreeMap<String, Vec<AlertCondition>> = BTreeMap::new();

        for doc in documents {
            let record = match ChemicalRecord::try_from(doc) {
                Ok(record) => record,
                Err(e) => {
                    debug!(document_id = %doc.id, "Skipping invalid chemical: {}", e);
                    report.records_skipped += 1;
                    continue;
                }
            };

            let conditions = self.evaluator.evaluate(&record, now);
            if conditions.is_empty() {
                continue;
            }
            for condition in &conditions {
                report.conditions.record(condition.kind);
            }
            batches
                .entry(record.organization)
                .or_default()
                .extend(conditions);
        }

        batches
    }

    async fn process_organization(
        &self,
        organization: String,
        conditions: Vec<AlertCondition>,
    ) -> OrganizationOutcome {
        let Some(message) = self.formatter.compose(&organization, &conditions) else {
            return OrganizationOutcome::Empty;
        };

        let recipients = match self.resolver.resolve(&organization).await {
            Ok(recipients) => recipients,
            Err(e) => {
                warn!(organization = %organization, "Failed to resolve alert recipients: {}", e);
                return OrganizationOutcome::ResolveFailed;
            }
        };

        if recipients.is_empty() {
            info!(organization = %organization, "No recipients for chemical alert");
            return OrganizationOutcome::NoRecipients;
        }

        let summary = self.dispatcher.dispatch(&recipients, &message).await;
        info!(
            organization = %organization,
            conditions = conditions.len(),
            emails_sent = summary.emails_sent,
            pushes_sent = summary.pushes_sent,
            failures = summary.failures(),
            "Chemical alert dispatched"
        );
        OrganizationOutcome::Delivered(summary)
    }
}
