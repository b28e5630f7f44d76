//! Channel ends held by a single participant.

use super::{ChannelEnd, ChannelError};
use barrier_domain::{Frame, ParticipantId};
use futures::future::poll_fn;
use std::collections::BTreeMap;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio_util::sync::PollSender;

/// Read end of the channel `peer → owner`
#[derive(Debug)]
pub struct Inbound {
    peer: ParticipantId,
    rx: mpsc::Receiver<Frame>,
}

impl Inbound {
    pub(crate) fn new(peer: ParticipantId, rx: mpsc::Receiver<Frame>) -> Self {
        Self { peer, rx }
    }

    pub fn peer(&self) -> ParticipantId {
        self.peer
    }

    /// Block until a frame arrives
    pub async fn read(&mut self) -> Result<Frame, ChannelError> {
        self.rx
            .recv()
            .await
            .ok_or(ChannelError::HungUp { peer: self.peer })
    }

    /// Read a frame if one is already buffered
    pub fn try_read(&mut self) -> Result<Option<Frame>, ChannelError> {
        match self.rx.try_recv() {
            Ok(frame) => Ok(Some(frame)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ChannelError::HungUp { peer: self.peer }),
        }
    }

    /// `Ready(None)` once the writer is gone and the buffer is drained
    pub fn poll_read(&mut self, cx: &mut Context<'_>) -> Poll<Option<Frame>> {
        self.rx.poll_recv(cx)
    }
}

/// Write end of the channel `owner → peer`
///
/// Writability means a slot in the bounded channel has been reserved; the
/// next [`write_reserved`](Self::write_reserved) consumes it.
pub struct Outbound {
    peer: ParticipantId,
    tx: PollSender<Frame>,
}

impl Outbound {
    pub(crate) fn new(peer: ParticipantId, tx: mpsc::Sender<Frame>) -> Self {
        Self {
            peer,
            tx: PollSender::new(tx),
        }
    }

    pub fn peer(&self) -> ParticipantId {
        self.peer
    }

    /// Reserve room for one frame
    pub fn poll_writable(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), ChannelError>> {
        let peer = self.peer;
        self.tx
            .poll_reserve(cx)
            .map_err(|_| ChannelError::HungUp { peer })
    }

    /// Send into the slot reserved by [`poll_writable`](Self::poll_writable)
    pub fn write_reserved(&mut self, frame: Frame) -> Result<(), ChannelError> {
        let peer = self.peer;
        self.tx.send_item(frame).map_err(|_| {
            if self.tx.is_closed() {
                ChannelError::HungUp { peer }
            } else {
                ChannelError::NotReserved { peer }
            }
        })
    }

    /// Block until there is room, then send
    pub async fn write(&mut self, frame: Frame) -> Result<(), ChannelError> {
        poll_fn(|cx| self.poll_writable(cx)).await?;
        self.write_reserved(frame)
    }
}

impl std::fmt::Debug for Outbound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Outbound")
            .field("peer", &self.peer)
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

/// The pruned view of the topology owned by one participant
///
/// Holds exactly one read end per other participant (incoming) and one
/// write end per other participant (outgoing).
#[derive(Debug)]
pub struct Endpoints {
    owner: ParticipantId,
    pub(crate) incoming: BTreeMap<ParticipantId, Inbound>,
    pub(crate) outgoing: BTreeMap<ParticipantId, Outbound>,
}

impl Endpoints {
    pub(crate) fn new(
        owner: ParticipantId,
        incoming: BTreeMap<ParticipantId, Inbound>,
        outgoing: BTreeMap<ParticipantId, Outbound>,
    ) -> Self {
        Self {
            owner,
            incoming,
            outgoing,
        }
    }

    pub fn owner(&self) -> ParticipantId {
        self.owner
    }

    pub fn incoming_peers(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.incoming.keys().copied()
    }

    pub fn outgoing_peers(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.outgoing.keys().copied()
    }

    pub fn incoming_count(&self) -> usize {
        self.incoming.len()
    }

    pub fn outgoing_count(&self) -> usize {
        self.outgoing.len()
    }

    pub fn inbound(&mut self, peer: ParticipantId) -> Result<&mut Inbound, ChannelError> {
        let owner = self.owner;
        self.incoming.get_mut(&peer).ok_or(ChannelError::NoEndpoint {
            owner,
            peer,
            end: ChannelEnd::Read,
        })
    }

    pub fn outbound(&mut self, peer: ParticipantId) -> Result<&mut Outbound, ChannelError> {
        let owner = self.owner;
        self.outgoing.get_mut(&peer).ok_or(ChannelError::NoEndpoint {
            owner,
            peer,
            end: ChannelEnd::Write,
        })
    }

    /// Drop the read end from `peer` after its writer went away.
    /// Returns whether an end was removed.
    pub fn hang_up(&mut self, peer: ParticipantId) -> bool {
        self.incoming.remove(&peer).is_some()
    }
}
