//! Tier Reconciler
//!
//! Drives an [`ObjectEnumerator`] over a container, evaluates the tier
//! policy for every listed object and issues one tier change per object.
//! A failed change is recorded and the sweep moves on; only a listing
//! failure or cancellation ends a sweep early.

use futures::future::join_all;
use std::sync::Arc;
use tier_core::{
    ObjectDescriptor, RotationPolicy, TierPolicy, TierTransitionOutcome,
    TierTransitionRequest, TransitionAck,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use super::report::{SweepEntry, SweepInterruption, SweepMode, SweepReport};
use crate::backend::TierContainer;
use crate::config::SweepOptions;
use crate::enumerator::ObjectEnumerator;
use crate::error::StorageResult;
use crate::telemetry::SweepMetrics;

/// Tier reconciler
pub struct TierReconciler<C: TierContainer + ?Sized> {
    /// Container being swept
    container: Arc<C>,
    /// Target tier policy
    policy: Arc<dyn TierPolicy>,
    /// Optional process-wide counters
    metrics: Option<Arc<SweepMetrics>>,
}

impl<C: TierContainer + ?Sized> TierReconciler<C> {
    /// Create a reconciler with the rotation policy
    pub fn new(container: Arc<C>) -> Self {
        Self::with_policy(container, Arc::new(RotationPolicy))
    }

    /// Create with a custom policy
    pub fn with_policy(container: Arc<C>, policy: Arc<dyn TierPolicy>) -> Self {
        Self {
            container,
            policy,
            metrics: None,
        }
    }

    /// Record every finished sweep into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<SweepMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Get the policy name
    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    /// List every object and its tier without changing anything
    pub async fn display(&self, cancel: &CancellationToken) -> SweepReport {
        self.run(SweepMode::DisplayOnly, 1, cancel).await
    }

    /// Move every object to its policy target, one at a time
    pub async fn rotate(&self, cancel: &CancellationToken) -> SweepReport {
        self.run(SweepMode::Mutate, 1, cancel).await
    }

    /// Run a sweep with explicit options
    ///
    /// Fails only when the options are invalid; listing and mutation
    /// failures are reported inside the [`SweepReport`].
    pub async fn reconcile(
        &self,
        options: &SweepOptions,
        cancel: &CancellationToken,
    ) -> StorageResult<SweepReport> {
        options.validate()?;
        Ok(self.run(options.mode, options.concurrency, cancel).await)
    }

    async fn run(&self, mode: SweepMode, concurrency: usize, cancel: &CancellationToken) -> SweepReport {
        let mut report = SweepReport::begin(self.container.container_name(), mode, self.policy.name());
        let span = info_span!(
            "sweep",
            sweep_id = %report.sweep_id,
            container = %report.container,
            mode = mode.as_str(),
        );

        async {
            if let Some(metrics) = &self.metrics {
                metrics.sweeps_started.inc();
            }

            info!(
                backend = %self.container.backend_type(),
                policy = self.policy.name(),
                concurrency,
                "Starting sweep"
            );

            let interruption = self.sweep(mode, concurrency.max(1), cancel, &mut report).await;
            report.finish(interruption);

            let summary = report.summary();
            info!(
                completed_fully = report.completed_fully,
                pages = report.pages_fetched,
                total = summary.total,
                applied = summary.applied,
                pending = summary.pending,
                no_op = summary.no_op,
                failed = summary.failed,
                unvisited = report.unvisited,
                "Sweep finished"
            );

            if let Some(metrics) = &self.metrics {
                metrics.record_report(&report);
            }
        }
        .instrument(span)
        .await;

        report
    }

    async fn sweep(
        &self,
        mode: SweepMode,
        concurrency: usize,
        cancel: &CancellationToken,
        report: &mut SweepReport,
    ) -> Option<SweepInterruption> {
        let mut enumerator =
            ObjectEnumerator::new(self.container.clone()).with_cancellation(cancel.clone());
        let mut batch: Vec<ObjectDescriptor> = Vec::with_capacity(concurrency);
        let mut interruption = None;

        loop {
            match enumerator.next().await {
                Some(Ok(descriptor)) => match mode {
                    SweepMode::DisplayOnly => report.entries.push(SweepEntry::listed(descriptor)),
                    SweepMode::Mutate => {
                        batch.push(descriptor);
                        if batch.len() >= concurrency && self.flush(&mut batch, cancel, report).await {
                            interruption = Some(SweepInterruption::Cancelled);
                            break;
                        }
                    }
                },
                Some(Err(error)) => {
                    interruption = Some(if error.is_cancelled() {
                        SweepInterruption::Cancelled
                    } else {
                        warn!(error = %error, "Listing failed, remainder of container not visited");
                        SweepInterruption::EnumerationFailed { error }
                    });
                    break;
                }
                None => break,
            }
        }

        // Trailing partial batch
        if !batch.is_empty() && self.flush(&mut batch, cancel, report).await && interruption.is_none() {
            interruption = Some(SweepInterruption::Cancelled);
        }

        report.unvisited += enumerator.buffered();
        report.pages_fetched = enumerator.pages_fetched();
        if report.unvisited > 0 {
            warn!(unvisited = report.unvisited, "Listed objects left unprocessed");
        }
        interruption
    }

    /// Submit a batch of listed objects, returns true if cancellation cut it short
    ///
    /// A cancelled batch is never sent; it only adds to `report.unvisited`.
    async fn flush(
        &self,
        batch: &mut Vec<ObjectDescriptor>,
        cancel: &CancellationToken,
        report: &mut SweepReport,
    ) -> bool {
        if cancel.is_cancelled() {
            report.unvisited += batch.len();
            batch.clear();
            return true;
        }

        let requests: Vec<_> = batch
            .iter()
            .map(|d| TierTransitionRequest::for_object(d, self.policy.next_tier(d.current_tier)))
            .collect();

        let outcomes = join_all(requests.iter().map(|request| self.apply(request))).await;

        for ((descriptor, request), outcome) in batch.drain(..).zip(requests).zip(outcomes) {
            report
                .entries
                .push(SweepEntry::transitioned(descriptor, request.to_tier, outcome));
        }

        false
    }

    async fn apply(&self, request: &TierTransitionRequest) -> TierTransitionOutcome {
        if request.is_noop() {
            debug!(object = %request.object_name, tier = %request.to_tier, "Already at target tier");
            return TierTransitionOutcome::NoOp;
        }

        if let Err(error) = request.validate() {
            warn!(object = %request.object_name, error = %error, "Request not sendable");
            return TierTransitionOutcome::failed(error.to_string());
        }

        debug!(
            object = %request.object_name,
            from = %request.from_tier,
            to = %request.to_tier,
            "Setting tier"
        );

        match self
            .container
            .set_tier(&request.object_name, request.to_tier)
            .await
        {
            // Leaving Archive only becomes visible once rehydration finishes
            Ok(TransitionAck::Applied) if request.is_rehydration() => TierTransitionOutcome::Pending,
            Ok(ack) => ack.into(),
            Err(error) => {
                warn!(object = %request.object_name, error = %error, "Tier change failed");
                TierTransitionOutcome::failed(error.to_string())
            }
        }
    }
}
