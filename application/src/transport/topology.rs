//! Full-mesh channel topology

use super::endpoints::{Endpoints, Inbound, Outbound};
use super::{ChannelEnd, ChannelError};
use barrier_domain::{Frame, Membership, ParticipantId};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Both ends of one directed channel, until they are handed out
#[derive(Debug)]
struct ChannelSlot {
    write: Option<mpsc::Sender<Frame>>,
    read: Option<mpsc::Receiver<Frame>>,
}

impl ChannelSlot {
    fn is_released(&self) -> bool {
        self.write.is_none() && self.read.is_none()
    }
}

/// Every directed channel between `N` participants, keyed by `(from, to)`
///
/// # Example
///
/// ```
/// use barrier_application::transport::ChannelTopology;
/// use barrier_domain::ParticipantId;
///
/// let mut topology = ChannelTopology::new(4, 8).unwrap();
/// assert_eq!(topology.channel_count(), 12);
///
/// let endpoints = topology.prune(ParticipantId::new(2)).unwrap();
/// assert_eq!(endpoints.incoming_count(), 3);
/// assert_eq!(endpoints.outgoing_count(), 3);
/// ```
#[derive(Debug)]
pub struct ChannelTopology {
    membership: Membership,
    channel_count: usize,
    slots: HashMap<(ParticipantId, ParticipantId), ChannelSlot>,
}

impl ChannelTopology {
    /// Create `participants · (participants − 1)` bounded channels
    pub fn new(participants: usize, capacity: usize) -> Result<Self, ChannelError> {
        if participants < 2 {
            return Err(ChannelError::TooFewParticipants(participants));
        }
        if capacity == 0 {
            return Err(ChannelError::ZeroCapacity);
        }

        let membership = Membership::new(participants - 1);
        let mut slots = HashMap::with_capacity(participants * (participants - 1));
        for from in membership.participants() {
            for to in membership.others(from) {
                let (tx, rx) = mpsc::channel(capacity);
                slots.insert(
                    (from, to),
                    ChannelSlot {
                        write: Some(tx),
                        read: Some(rx),
                    },
                );
            }
        }

        let channel_count = slots.len();
        debug!(participants, channel_count, capacity, "Channel topology created");

        Ok(Self {
            membership,
            channel_count,
            slots,
        })
    }

    /// Topology sized for a membership
    pub fn for_membership(membership: Membership, capacity: usize) -> Result<Self, ChannelError> {
        Self::new(membership.participant_count(), capacity)
    }

    pub fn membership(&self) -> Membership {
        self.membership
    }

    /// Channels created, whether or not their ends were handed out
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Channel ends still held by the topology
    pub fn open_ends(&self) -> usize {
        self.slots
            .values()
            .map(|slot| usize::from(slot.write.is_some()) + usize::from(slot.read.is_some()))
            .sum()
    }

    /// Hand `owner` the write end of every `(owner, *)` channel and the read
    /// end of every `(*, owner)` channel. Nothing else is visible to it.
    pub fn prune(&mut self, owner: ParticipantId) -> Result<Endpoints, ChannelError> {
        if !self.membership.contains(owner) {
            return Err(ChannelError::UnknownParticipant(owner));
        }

        let mut incoming = BTreeMap::new();
        let mut outgoing = BTreeMap::new();

        for peer in self.membership.others(owner) {
            let tx = self
                .slot(owner, peer)
                .and_then(|slot| slot.write.take())
                .ok_or(ChannelError::AlreadyReleased {
                    from: owner,
                    to: peer,
                    end: ChannelEnd::Write,
                })?;
            outgoing.insert(peer, Outbound::new(peer, tx));

            let rx = self
                .slot(peer, owner)
                .and_then(|slot| slot.read.take())
                .ok_or(ChannelError::AlreadyReleased {
                    from: peer,
                    to: owner,
                    end: ChannelEnd::Read,
                })?;
            incoming.insert(peer, Inbound::new(peer, rx));
        }

        self.slots.retain(|_, slot| !slot.is_released());
        trace!(%owner, remaining = self.open_ends(), "Pruned channel ends");

        Ok(Endpoints::new(owner, incoming, outgoing))
    }

    fn slot(&mut self, from: ParticipantId, to: ParticipantId) -> Option<&mut ChannelSlot> {
        self.slots.get_mut(&(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barrier_domain::Message;

    fn id(n: usize) -> ParticipantId {
        ParticipantId::new(n)
    }

    #[test]
    fn test_channel_count_is_n_times_n_minus_one() {
        for n in 2..7 {
            let topology = ChannelTopology::new(n, 1).unwrap();
            assert_eq!(topology.channel_count(), n * (n - 1));
            assert_eq!(topology.open_ends(), 2 * n * (n - 1));
        }
    }

    #[test]
    fn test_rejects_degenerate_topologies() {
        assert_eq!(
            ChannelTopology::new(1, 4).unwrap_err(),
            ChannelError::TooFewParticipants(1)
        );
        assert_eq!(
            ChannelTopology::new(3, 0).unwrap_err(),
            ChannelError::ZeroCapacity
        );
    }

    #[test]
    fn test_prune_keeps_only_incident_ends() {
        let mut topology = ChannelTopology::new(4, 1).unwrap();
        let endpoints = topology.prune(id(1)).unwrap();

        assert_eq!(endpoints.owner(), id(1));
        assert_eq!(
            endpoints.incoming_peers().collect::<Vec<_>>(),
            vec![id(0), id(2), id(3)]
        );
        assert_eq!(
            endpoints.outgoing_peers().collect::<Vec<_>>(),
            vec![id(0), id(2), id(3)]
        );
        assert_eq!(topology.open_ends(), 24 - 6);
    }

    #[test]
    fn test_pruning_everyone_releases_every_end() {
        let mut topology = ChannelTopology::new(3, 1).unwrap();
        for n in 0..3 {
            topology.prune(id(n)).unwrap();
        }
        assert_eq!(topology.open_ends(), 0);
    }

    #[test]
    fn test_prune_twice_fails() {
        let mut topology = ChannelTopology::new(3, 1).unwrap();
        topology.prune(id(2)).unwrap();
        assert!(matches!(
            topology.prune(id(2)),
            Err(ChannelError::AlreadyReleased { .. })
        ));
    }

    #[test]
    fn test_prune_unknown_participant() {
        let mut topology = ChannelTopology::new(3, 1).unwrap();
        assert_eq!(
            topology.prune(id(3)).unwrap_err(),
            ChannelError::UnknownParticipant(id(3))
        );
    }

    #[tokio::test]
    async fn test_pruned_ends_connect_the_right_pair() {
        let mut topology = ChannelTopology::new(3, 2).unwrap();
        let mut zero = topology.prune(id(0)).unwrap();
        let mut two = topology.prune(id(2)).unwrap();

        zero.outbound(id(2))
            .unwrap()
            .write(Message::Poll.encode())
            .await
            .unwrap();
        let frame = two.inbound(id(0)).unwrap().read().await.unwrap();
        assert_eq!(frame.as_bytes(), b"::POLL::\0");

        assert_eq!(two.inbound(id(1)).unwrap().try_read().unwrap(), None);
    }
}
