//! Run Worker use case
//!
//! Drives one worker's message loop until `Die` arrives or a fatal
//! condition occurs:
//!
//! ```text
//! loop {
//!     wait(readable = every incoming channel,
//!          writable = peers with a pending queue)   ── timeout ─▶ OperationTimeout
//!     for each readable: decode, report, dispatch   ── bad token ─▶ ProtocolViolation
//!     for each writable: dequeue one, write, report ── write error ─▶ SystemCallFailure
//! }
//! ```

use crate::error::BarrierError;
use crate::ports::reporter::{BarrierReporter, Direction};
use crate::transport::{Endpoints, Multiplexer};
use barrier_domain::{Membership, ParticipantId, WorkerMachine, WorkerState};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, trace};

/// Summary of a worker that finished successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker: ParticipantId,
    /// Times this worker reported quorum to the controller
    pub quorums_reached: usize,
}

/// Use case for running a single worker
pub struct RunWorkerUseCase {
    id: ParticipantId,
    membership: Membership,
    multiplexer: Multiplexer,
    reporter: Arc<dyn BarrierReporter>,
}

impl RunWorkerUseCase {
    pub fn new(
        id: ParticipantId,
        membership: Membership,
        timeout: Duration,
        reporter: Arc<dyn BarrierReporter>,
    ) -> Self {
        Self {
            id,
            membership,
            multiplexer: Multiplexer::new(timeout),
            reporter,
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    /// Run the loop on this worker's pruned endpoints.
    ///
    /// Succeeds only once `Die` is received. On failure, queued messages
    /// are left undelivered and the endpoints are dropped.
    pub async fn execute(&self, mut endpoints: Endpoints) -> Result<WorkerReport, BarrierError> {
        debug!(worker = %self.id, "Worker started");
        let mut machine = WorkerMachine::new(self.id, self.membership);

        match self.run_loop(&mut machine, &mut endpoints).await {
            Ok(()) => {
                info!(
                    worker = %self.id,
                    quorums = machine.quorums_reached(),
                    "Worker done"
                );
                Ok(WorkerReport {
                    worker: self.id,
                    quorums_reached: machine.quorums_reached(),
                })
            }
            Err(e) => {
                machine.fail();
                error!(
                    worker = %self.id,
                    operation = e.operation(),
                    undelivered = machine.queues().total_pending(),
                    "Worker failed: {}",
                    e
                );
                self.reporter.on_failure(self.id, &e);
                Err(e)
            }
        }
    }

    async fn run_loop(
        &self,
        machine: &mut WorkerMachine,
        endpoints: &mut Endpoints,
    ) -> Result<(), BarrierError> {
        loop {
            let write_set = machine.pending_peers();
            let readiness = self.multiplexer.wait(endpoints, &write_set).await?;

            for (peer, frame) in readiness.readable {
                let Some(frame) = frame else {
                    debug!(worker = %self.id, %peer, "Peer hung up");
                    endpoints.hang_up(peer);
                    continue;
                };

                if let Ok(token) = frame.token() {
                    self.reporter.on_message(self.id, Direction::Received, token);
                }

                let message = machine
                    .receive(peer, &frame)
                    .map_err(|e| BarrierError::from_domain("dispatching message", e))?;
                trace!(worker = %self.id, %peer, %message, "Dispatched message");

                if machine.state() == WorkerState::Done {
                    return Ok(());
                }
            }

            for peer in readiness.writable {
                let message = machine
                    .next_outbound(peer)
                    .map_err(|e| BarrierError::from_domain("dequeuing message", e))?;
                endpoints
                    .outbound(peer)
                    .and_then(|outbound| outbound.write_reserved(message.encode()))
                    .map_err(|e| BarrierError::system("writing to channel", e))?;
                self.reporter
                    .on_message(self.id, Direction::Sent, message.token());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingReporter;
    use crate::transport::{ChannelError, ChannelTopology};
    use barrier_domain::{Frame, MAX_FRAME_LEN, Message};

    fn id(n: usize) -> ParticipantId {
        ParticipantId::new(n)
    }

    async fn send(endpoints: &mut Endpoints, to: usize, frame: Frame) {
        endpoints.outbound(id(to)).unwrap().write(frame).await.unwrap();
    }

    async fn recv(endpoints: &mut Endpoints, from: usize) -> Message {
        let frame = endpoints.inbound(id(from)).unwrap().read().await.unwrap();
        Message::decode(&frame).unwrap()
    }

    fn worker(
        n: usize,
        workers: usize,
        timeout: Duration,
        reporter: Arc<RecordingReporter>,
    ) -> RunWorkerUseCase {
        RunWorkerUseCase::new(id(n), Membership::new(workers), timeout, reporter)
    }

    #[tokio::test]
    async fn test_quorum_round_then_die() {
        let mut topology = ChannelTopology::new(4, 4).unwrap();
        let mut controller = topology.prune(id(0)).unwrap();
        let endpoints = topology.prune(id(1)).unwrap();
        let mut two = topology.prune(id(2)).unwrap();
        let mut three = topology.prune(id(3)).unwrap();

        let reporter = Arc::new(RecordingReporter::default());
        let use_case = worker(1, 3, Duration::from_secs(2), reporter.clone());
        let handle = tokio::spawn(async move { use_case.execute(endpoints).await });

        send(&mut controller, 1, Message::Poll.encode()).await;
        assert_eq!(recv(&mut two, 1).await, Message::Request);
        assert_eq!(recv(&mut three, 1).await, Message::Request);

        send(&mut two, 1, Message::Confirm.encode()).await;
        send(&mut three, 1, Message::Confirm.encode()).await;
        assert_eq!(recv(&mut controller, 1).await, Message::Confirm);

        send(&mut controller, 1, Message::Die.encode()).await;
        let report = handle.await.unwrap().unwrap();
        assert_eq!(report.quorums_reached, 1);

        assert_eq!(
            reporter.tokens(id(1), Direction::Sent),
            vec!["::REQUEST::", "::REQUEST::", "::CONFIRMATION::"]
        );
        assert!(reporter.failures().is_empty());
    }

    #[tokio::test]
    async fn test_request_is_confirmed_to_sender() {
        let mut topology = ChannelTopology::new(3, 4).unwrap();
        let mut controller = topology.prune(id(0)).unwrap();
        let endpoints = topology.prune(id(2)).unwrap();
        let mut one = topology.prune(id(1)).unwrap();

        let reporter = Arc::new(RecordingReporter::default());
        let use_case = worker(2, 2, Duration::from_secs(2), reporter);
        let handle = tokio::spawn(async move { use_case.execute(endpoints).await });

        send(&mut one, 2, Message::Request.encode()).await;
        assert_eq!(recv(&mut one, 2).await, Message::Confirm);

        send(&mut controller, 2, Message::Die.encode()).await;
        let report = handle.await.unwrap().unwrap();
        assert_eq!(report.quorums_reached, 0);
    }

    #[tokio::test]
    async fn test_silent_peer_leads_to_timeout() {
        let mut topology = ChannelTopology::new(3, 4).unwrap();
        let mut controller = topology.prune(id(0)).unwrap();
        let endpoints = topology.prune(id(1)).unwrap();
        let mut two = topology.prune(id(2)).unwrap();

        let reporter = Arc::new(RecordingReporter::default());
        let use_case = worker(1, 2, Duration::from_millis(50), reporter.clone());
        let handle = tokio::spawn(async move { use_case.execute(endpoints).await });

        send(&mut controller, 1, Message::Poll.encode()).await;
        assert_eq!(recv(&mut two, 1).await, Message::Request);

        let error = handle.await.unwrap().unwrap_err();
        assert!(error.is_timeout());
        assert_eq!(reporter.failures(), vec![(id(1), error)]);
        assert_eq!(
            controller.inbound(id(1)).unwrap().try_read(),
            Err(ChannelError::HungUp { peer: id(1) })
        );
    }

    #[tokio::test]
    async fn test_unknown_token_stops_all_processing() {
        let mut topology = ChannelTopology::new(3, 4).unwrap();
        let mut controller = topology.prune(id(0)).unwrap();
        let endpoints = topology.prune(id(1)).unwrap();
        let mut two = topology.prune(id(2)).unwrap();

        send(&mut controller, 1, Frame::from_token("::HELLO::").unwrap()).await;
        send(&mut controller, 1, Message::Poll.encode()).await;

        let reporter = Arc::new(RecordingReporter::default());
        let use_case = worker(1, 2, Duration::from_secs(2), reporter.clone());
        let error = use_case.execute(endpoints).await.unwrap_err();

        assert!(error.is_protocol_violation());
        assert_eq!(error.operation(), "dispatching message");
        assert_eq!(
            reporter.tokens(id(1), Direction::Received),
            vec!["::HELLO::"]
        );
        assert!(reporter.tokens(id(1), Direction::Sent).is_empty());
        assert_eq!(
            two.inbound(id(1)).unwrap().try_read(),
            Err(ChannelError::HungUp { peer: id(1) })
        );
    }

    #[tokio::test]
    async fn test_oversized_frame_is_a_protocol_violation() {
        let mut topology = ChannelTopology::new(2, 4).unwrap();
        let mut controller = topology.prune(id(0)).unwrap();
        let endpoints = topology.prune(id(1)).unwrap();

        let mut raw = vec![b'x'; MAX_FRAME_LEN];
        raw.push(0);
        send(&mut controller, 1, Frame::from_bytes(raw)).await;

        let use_case = worker(1, 1, Duration::from_secs(2), Arc::default());
        let error = use_case.execute(endpoints).await.unwrap_err();
        assert!(error.is_protocol_violation());
    }

    #[tokio::test]
    async fn test_departed_peer_does_not_stop_the_worker() {
        let mut topology = ChannelTopology::new(3, 4).unwrap();
        let mut controller = topology.prune(id(0)).unwrap();
        let endpoints = topology.prune(id(1)).unwrap();
        let two = topology.prune(id(2)).unwrap();
        drop(two);

        let use_case = worker(1, 2, Duration::from_secs(2), Arc::default());
        let handle = tokio::spawn(async move { use_case.execute(endpoints).await });

        send(&mut controller, 1, Message::Die.encode()).await;
        assert!(handle.await.unwrap().is_ok());
    }
}
