//! Run Controller use case
//!
//! Polls workers one at a time, in ascending order, and waits for each to
//! confirm quorum before moving on. Once every worker has confirmed, `Die`
//! is broadcast.

use crate::error::BarrierError;
use crate::ports::reporter::{BarrierReporter, Direction};
use crate::transport::Endpoints;
use barrier_domain::{Membership, Message, ParticipantId};
use std::sync::Arc;
use tracing::{debug, error, info};

const CONTROLLER: ParticipantId = ParticipantId::CONTROLLER;

/// Use case for driving the barrier from the controller
pub struct RunControllerUseCase {
    membership: Membership,
    reporter: Arc<dyn BarrierReporter>,
}

impl RunControllerUseCase {
    pub fn new(membership: Membership, reporter: Arc<dyn BarrierReporter>) -> Self {
        Self {
            membership,
            reporter,
        }
    }

    /// Run the poll sequence on the controller's pruned endpoints.
    ///
    /// Returns the workers whose poll succeeded, in order. Reads have no
    /// deadline: a worker that never answers blocks the controller until
    /// its channel is dropped.
    pub async fn execute(
        &self,
        mut endpoints: Endpoints,
    ) -> Result<Vec<ParticipantId>, BarrierError> {
        let result = self.drive(&mut endpoints).await;
        if let Err(e) = &result {
            error!(operation = e.operation(), "Controller failed: {}", e);
            self.reporter.on_failure(CONTROLLER, e);
        }
        result
    }

    async fn drive(&self, endpoints: &mut Endpoints) -> Result<Vec<ParticipantId>, BarrierError> {
        let mut polled = Vec::with_capacity(self.membership.workers());

        for worker in self.membership.worker_ids() {
            self.send(endpoints, worker, Message::Poll).await?;
            self.await_confirmation(endpoints, worker).await?;

            info!(%worker, "Poll #{} succeeded", worker);
            self.reporter.on_poll_success(worker);
            polled.push(worker);
        }

        debug!("Broadcasting {}", Message::Die);
        for worker in self.membership.worker_ids() {
            self.send(endpoints, worker, Message::Die).await?;
        }

        Ok(polled)
    }

    async fn send(
        &self,
        endpoints: &mut Endpoints,
        worker: ParticipantId,
        message: Message,
    ) -> Result<(), BarrierError> {
        endpoints
            .outbound(worker)
            .map_err(|e| BarrierError::system("writing to channel", e))?
            .write(message.encode())
            .await
            .map_err(|e| BarrierError::system("writing to channel", e))?;
        self.reporter
            .on_message(CONTROLLER, Direction::Sent, message.token());
        Ok(())
    }

    async fn await_confirmation(
        &self,
        endpoints: &mut Endpoints,
        worker: ParticipantId,
    ) -> Result<(), BarrierError> {
        let frame = endpoints
            .inbound(worker)
            .map_err(|e| BarrierError::system("reading from channel", e))?
            .read()
            .await
            .map_err(|e| BarrierError::system("reading from channel", e))?;

        let reply = frame
            .token()
            .map_err(|e| BarrierError::protocol("awaiting poll reply", e.to_string()))?;
        self.reporter.on_message(CONTROLLER, Direction::Received, reply);

        if reply != Message::Confirm.token() {
            return Err(BarrierError::protocol(
                "awaiting poll reply",
                format!("Incorrect worker answer \"{}\" from worker {}", reply, worker),
            ));
        }
        Ok(())
    }
}
