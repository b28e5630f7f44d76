//! Run Barrier use case
//!
//! Builds the full channel mesh, hands each participant its pruned view,
//! runs every worker on its own task and the controller on the calling
//! task, then collects all results.

use super::run_controller::RunControllerUseCase;
use super::run_worker::{RunWorkerUseCase, WorkerReport};
use crate::config::{BarrierParams, ConfigError};
use crate::error::BarrierError;
use crate::ports::reporter::{BarrierReporter, NoReporter};
use crate::transport::ChannelTopology;
#[cfg(test)]
use crate::transport::{Endpoints, Inbound};
use barrier_domain::ParticipantId;
#[cfg(test)]
use std::collections::BTreeSet;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that prevent the process group from starting
#[derive(Error, Debug)]
pub enum RunBarrierError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to set up channels: {0}")]
    Setup(#[source] BarrierError),
}

/// What every participant ended with
#[derive(Debug)]
pub struct BarrierOutcome {
    /// Workers polled successfully, or why the controller stopped
    pub controller: Result<Vec<ParticipantId>, BarrierError>,
    /// Per-worker results; a worker whose task panicked is absent
    pub workers: BTreeMap<ParticipantId, Result<WorkerReport, BarrierError>>,
}

impl BarrierOutcome {
    /// The run succeeded if the controller did; worker results do not
    /// affect it.
    pub fn is_success(&self) -> bool {
        self.controller.is_ok()
    }

    pub fn failed_workers(&self) -> Vec<ParticipantId> {
        self.workers
            .iter()
            .filter(|(_, result)| result.is_err())
            .map(|(worker, _)| *worker)
            .collect()
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }
}

/// Use case for running one controller and `W` workers to completion
pub struct RunBarrierUseCase {
    params: BarrierParams,
    reporter: Arc<dyn BarrierReporter>,
    /// Workers whose incoming channels are held but never read
    #[cfg(test)]
    stalled: BTreeSet<ParticipantId>,
}

impl RunBarrierUseCase {
    pub fn new(params: BarrierParams) -> Self {
        Self {
            params,
            reporter: Arc::new(NoReporter),
            #[cfg(test)]
            stalled: BTreeSet::new(),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn BarrierReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    #[cfg(test)]
    fn with_stalled_worker(mut self, worker: ParticipantId) -> Self {
        self.stalled.insert(worker);
        self
    }

    /// Detach a stalled worker's read ends so its loop sees nothing, while
    /// keeping them open so writers to it do not observe a hang-up.
    #[cfg(test)]
    fn stall(
        &self,
        worker: ParticipantId,
        mut endpoints: Endpoints,
    ) -> (Endpoints, BTreeMap<ParticipantId, Inbound>) {
        let held = if self.stalled.contains(&worker) {
            std::mem::take(&mut endpoints.incoming)
        } else {
            BTreeMap::new()
        };
        (endpoints, held)
    }

    pub async fn execute(&self) -> Result<BarrierOutcome, RunBarrierError> {
        self.params.validate()?;
        let membership = self.params.membership();

        info!(
            workers = membership.workers(),
            timeout_ms = self.params.timeout.as_millis() as u64,
            "Starting barrier"
        );

        let mut topology =
            ChannelTopology::for_membership(membership, self.params.channel_capacity)
                .map_err(|e| RunBarrierError::Setup(BarrierError::system("creating channels", e)))?;

        let controller_endpoints = topology
            .prune(ParticipantId::CONTROLLER)
            .map_err(|e| RunBarrierError::Setup(BarrierError::system("releasing channel ends", e)))?;

        let mut join_set = JoinSet::new();
        for worker in membership.worker_ids() {
            let endpoints = topology.prune(worker).map_err(|e| {
                RunBarrierError::Setup(BarrierError::system("releasing channel ends", e))
            })?;
            #[cfg(test)]
            let (endpoints, held) = self.stall(worker, endpoints);
            let use_case = RunWorkerUseCase::new(
                worker,
                membership,
                self.params.timeout,
                Arc::clone(&self.reporter),
            );
            join_set.spawn(async move {
                #[cfg(test)]
                let _held = held;
                (worker, use_case.execute(endpoints).await)
            });
        }

        debug!(open_ends = topology.open_ends(), "All participants spawned");
        drop(topology);

        let controller = RunControllerUseCase::new(membership, Arc::clone(&self.reporter))
            .execute(controller_endpoints)
            .await;

        let mut workers = BTreeMap::new();
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((worker, outcome)) => {
                    workers.insert(worker, outcome);
                }
                Err(e) => {
                    warn!("Worker task join error: {}", e);
                }
            }
        }

        self.reporter.on_complete();

        let outcome = BarrierOutcome {
            controller,
            workers,
        };
        info!(
            success = outcome.is_success(),
            failed_workers = outcome.failed_workers().len(),
            "Barrier finished"
        );
        Ok(outcome)
    }
}
