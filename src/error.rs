//! Error types for the distributed-memory (DM) barrier variants.
//!
//! Shared-memory barriers have no recoverable error path (spec §7): a
//! participant that never arrives deadlocks, which is not detected. DM
//! barriers depend on an external transport that can fail, and those
//! failures are fatal and must be reported with enough context to diagnose
//! which rank and round desynchronized.

use std::fmt;

/// Which half of a send/receive pair failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// A `send` call failed.
    Send,
    /// A `recv` call failed.
    Recv,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Send => write!(f, "send"),
            Direction::Recv => write!(f, "recv"),
        }
    }
}

/// A fatal transport failure encountered while running a DM barrier
/// algorithm.
///
/// The barrier makes no attempt to recover: a dropped synchronization
/// message desynchronizes the whole barrier irrecoverably (spec §7), so this
/// error is meant to propagate straight out to the caller.
#[derive(Debug, thiserror::Error)]
#[error("{direction} failed at rank {rank}, round {round} (peer {peer}): {source}")]
pub struct TransportError {
    /// The local rank that observed the failure.
    pub rank: usize,
    /// The peer rank involved in the failed operation.
    pub peer: usize,
    /// Which algorithm round the failure occurred in.
    pub round: u64,
    /// Which half of the exchange failed.
    pub direction: Direction,
    /// The underlying transport error.
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl TransportError {
    /// Construct a `TransportError` with full context.
    pub fn new(
        rank: usize,
        peer: usize,
        round: u64,
        direction: Direction,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        TransportError {
            rank,
            peer,
            round,
            direction,
            source: Box::new(source),
        }
    }
}
