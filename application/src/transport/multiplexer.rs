//! Readiness multiplexing over a participant's channel ends.
//!
//! Each call to [`Multiplexer::wait`] watches every incoming channel plus
//! the outgoing channels whose queue is non-empty, and resolves as soon as
//! at least one of them is ready. A frame that arrives on a readable channel
//! is taken in the same poll, so nothing is lost when the wait times out.

use super::endpoints::Endpoints;
use crate::error::BarrierError;
use barrier_domain::{Frame, ParticipantId};
use futures::future::poll_fn;
use std::task::Poll;
use std::time::Duration;
use tracing::trace;

/// Channels that became ready in one wait
#[derive(Debug, Default)]
pub struct Readiness {
    /// Frames read, ascending by peer. `None` means the peer hung up.
    pub readable: Vec<(ParticipantId, Option<Frame>)>,
    /// Peers with a reserved write slot, ascending
    pub writable: Vec<ParticipantId>,
}

impl Readiness {
    pub fn is_empty(&self) -> bool {
        self.readable.is_empty() && self.writable.is_empty()
    }
}

/// Select-style wait with a fixed deadline per call
#[derive(Debug, Clone, Copy)]
pub struct Multiplexer {
    timeout: Duration,
}

impl Multiplexer {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait until an incoming channel is readable or one of `write_set` is
    /// writable.
    ///
    /// Errors: `OperationTimeout` when nothing is ready in time,
    /// `SystemCallFailure` when a peer in `write_set` can no longer be
    /// written to.
    pub async fn wait(
        &self,
        endpoints: &mut Endpoints,
        write_set: &[ParticipantId],
    ) -> Result<Readiness, BarrierError> {
        trace!(
            owner = %endpoints.owner(),
            readable = endpoints.incoming_count(),
            writable = write_set.len(),
            "Waiting for channels"
        );

        let ready = poll_fn(|cx| {
            let mut readiness = Readiness::default();

            for (peer, inbound) in endpoints.incoming.iter_mut() {
                if let Poll::Ready(frame) = inbound.poll_read(cx) {
                    readiness.readable.push((*peer, frame));
                }
            }

            for peer in write_set {
                let outbound = match endpoints.outbound(*peer) {
                    Ok(outbound) => outbound,
                    Err(e) => return Poll::Ready(Err(e)),
                };
                match outbound.poll_writable(cx) {
                    Poll::Ready(Ok(())) => readiness.writable.push(*peer),
                    Poll::Ready(Err(e)) => return Poll::Ready(Err(e)),
                    Poll::Pending => {}
                }
            }

            if readiness.is_empty() {
                Poll::Pending
            } else {
                Poll::Ready(Ok(readiness))
            }
        });

        match tokio::time::timeout(self.timeout, ready).await {
            Ok(Ok(readiness)) => Ok(readiness),
            Ok(Err(e)) => Err(BarrierError::system("waiting for channels", e)),
            Err(_) => Err(BarrierError::OperationTimeout {
                after: self.timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{ChannelError, ChannelTopology};
    use barrier_domain::Message;

    fn id(n: usize) -> ParticipantId {
        ParticipantId::new(n)
    }

    #[tokio::test]
    async fn test_times_out_when_nothing_is_ready() {
        let mut topology = ChannelTopology::new(3, 1).unwrap();
        let mut endpoints = topology.prune(id(1)).unwrap();
        let mux = Multiplexer::new(Duration::from_millis(20));

        let result = mux.wait(&mut endpoints, &[]).await;
        assert_eq!(
            result.unwrap_err(),
            BarrierError::OperationTimeout {
                after: Duration::from_millis(20)
            }
        );
    }

    #[tokio::test]
    async fn test_readable_channel_is_reported_with_its_frame() {
        let mut topology = ChannelTopology::new(3, 1).unwrap();
        let mut controller = topology.prune(id(0)).unwrap();
        let mut worker = topology.prune(id(1)).unwrap();
        let mux = Multiplexer::new(Duration::from_secs(1));

        controller
            .outbound(id(1))
            .unwrap()
            .write(Message::Poll.encode())
            .await
            .unwrap();

        let readiness = mux.wait(&mut worker, &[]).await.unwrap();
        assert_eq!(
            readiness.readable,
            vec![(id(0), Some(Message::Poll.encode()))]
        );
        assert!(readiness.writable.is_empty());
    }

    #[tokio::test]
    async fn test_only_peers_in_write_set_are_writable() {
        let mut topology = ChannelTopology::new(4, 1).unwrap();
        let mut worker = topology.prune(id(1)).unwrap();
        let mux = Multiplexer::new(Duration::from_secs(1));

        let readiness = mux.wait(&mut worker, &[id(3)]).await.unwrap();
        assert_eq!(readiness.writable, vec![id(3)]);
        assert!(readiness.readable.is_empty());
    }

    #[tokio::test]
    async fn test_full_channel_is_not_writable() {
        let mut topology = ChannelTopology::new(3, 1).unwrap();
        let mut worker = topology.prune(id(1)).unwrap();
        let _other = topology.prune(id(2)).unwrap();
        let mux = Multiplexer::new(Duration::from_millis(20));

        worker
            .outbound(id(2))
            .unwrap()
            .write(Message::Request.encode())
            .await
            .unwrap();

        let result = mux.wait(&mut worker, &[id(2)]).await;
        assert!(result.unwrap_err().is_timeout());
    }

    #[tokio::test]
    async fn test_hang_up_is_readable_without_frame() {
        let mut topology = ChannelTopology::new(3, 1).unwrap();
        let controller = topology.prune(id(0)).unwrap();
        let mut worker = topology.prune(id(1)).unwrap();
        let _other = topology.prune(id(2)).unwrap();
        drop(controller);

        let mux = Multiplexer::new(Duration::from_secs(1));
        let readiness = mux.wait(&mut worker, &[]).await.unwrap();
        assert_eq!(readiness.readable, vec![(id(0), None)]);
    }

    #[tokio::test]
    async fn test_write_to_departed_peer_fails() {
        let mut topology = ChannelTopology::new(3, 1).unwrap();
        let mut worker = topology.prune(id(1)).unwrap();
        let other = topology.prune(id(2)).unwrap();
        drop(other);

        let mux = Multiplexer::new(Duration::from_secs(1));
        let error = mux.wait(&mut worker, &[id(2)]).await.unwrap_err();
        assert_eq!(
            error,
            BarrierError::system("waiting for channels", ChannelError::HungUp { peer: id(2) })
        );
    }
}
