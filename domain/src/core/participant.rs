//! Participant identity and group membership

use serde::{Deserialize, Serialize};

/// Identity of a participant in the mesh (Value Object)
///
/// `0` is always the controller; `1..=W` are workers.
///
/// # Example
///
/// ```
/// use barrier_domain::ParticipantId;
///
/// assert!(ParticipantId::CONTROLLER.is_controller());
/// assert!(ParticipantId::new(2).is_worker());
/// assert_eq!(ParticipantId::new(2).to_string(), "2");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ParticipantId(usize);

impl ParticipantId {
    /// The controller's identity
    pub const CONTROLLER: ParticipantId = ParticipantId(0);

    pub const fn new(number: usize) -> Self {
        Self(number)
    }

    pub const fn as_usize(self) -> usize {
        self.0
    }

    pub const fn is_controller(self) -> bool {
        self.0 == 0
    }

    pub const fn is_worker(self) -> bool {
        self.0 != 0
    }

    pub const fn role(self) -> Role {
        if self.is_controller() {
            Role::Controller
        } else {
            Role::Worker
        }
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of actor a participant plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Controller,
    Worker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Controller => "controller",
            Role::Worker => "worker",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The fixed set of participants taking part in one run
///
/// Membership is parameterized by the worker count `W`; the group always
/// has `W + 1` participants numbered `0..=W`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    workers: usize,
}

impl Membership {
    pub const fn new(workers: usize) -> Self {
        Self { workers }
    }

    /// Number of workers (`W`)
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Number of participants including the controller (`N = W + 1`)
    pub const fn participant_count(&self) -> usize {
        self.workers + 1
    }

    /// Confirmations a worker needs from its peers to reach quorum (`W - 1`)
    pub const fn quorum_size(&self) -> usize {
        self.workers.saturating_sub(1)
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        id.as_usize() <= self.workers
    }

    /// All participants, controller first
    pub fn participants(&self) -> impl Iterator<Item = ParticipantId> + use<> {
        (0..=self.workers).map(ParticipantId::new)
    }

    /// Workers in poll order `1..=W`
    pub fn worker_ids(&self) -> impl Iterator<Item = ParticipantId> + use<> {
        (1..=self.workers).map(ParticipantId::new)
    }

    /// Every participant other than `owner`
    pub fn others(&self, owner: ParticipantId) -> impl Iterator<Item = ParticipantId> + use<> {
        self.participants().filter(move |id| *id != owner)
    }

    /// Every worker other than `owner`
    pub fn peer_workers(
        &self,
        owner: ParticipantId,
    ) -> impl Iterator<Item = ParticipantId> + use<> {
        self.worker_ids().filter(move |id| *id != owner)
    }
}
