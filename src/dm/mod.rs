//! Distributed-memory barrier variants: participants are separate processes
//! (possibly on separate machines) coordinating by point-to-point messages
//! over a [`Transport`] (spec §1, DM).

pub mod dissemination;
pub mod linear;
pub mod tournament;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use dissemination::DisseminationBarrier;
pub use linear::LinearBarrier;
pub use tournament::TournamentBarrier;
pub use transport::{MessageTag, Transport};

use crate::error::TransportError;

/// Which distributed-memory algorithm to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmAlgorithm {
    /// Linear chain send-receive pattern (§4.6).
    Linear,
    /// `O(log P)` gossip rounds (§4.7).
    Dissemination,
    /// Fixed-bracket elimination (§4.8).
    Tournament,
}

/// A distributed-memory barrier over transport `T`, dispatched statically
/// over its algorithm via a tagged variant (Design Notes §9).
pub enum DmBarrier<T: Transport> {
    /// See [`LinearBarrier`].
    Linear(LinearBarrier<T>),
    /// See [`DisseminationBarrier`].
    Dissemination(DisseminationBarrier<T>),
    /// See [`TournamentBarrier`].
    Tournament(TournamentBarrier<T>),
}

impl<T: Transport> DmBarrier<T> {
    /// Wrap `transport` in a barrier using `algorithm`.
    #[must_use]
    pub fn new(transport: T, algorithm: DmAlgorithm) -> Self {
        match algorithm {
            DmAlgorithm::Linear => DmBarrier::Linear(LinearBarrier::new(transport)),
            DmAlgorithm::Dissemination => DmBarrier::Dissemination(DisseminationBarrier::new(transport)),
            DmAlgorithm::Tournament => DmBarrier::Tournament(TournamentBarrier::new(transport)),
        }
    }

    /// Block until every rank has called `enter` for this episode.
    pub fn enter(&mut self) -> Result<(), TransportError> {
        match self {
            DmBarrier::Linear(b) => b.enter(),
            DmBarrier::Dissemination(b) => b.enter(),
            DmBarrier::Tournament(b) => b.enter(),
        }
    }
}
