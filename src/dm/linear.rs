//! Linear (chain) counter barrier over a message-passing transport (spec §4.6).
//!
//! One arrival wave and one wakeup wave, both traveling rank 0 -> P-1 -> rank
//! 0. `O(P)` messages, `2*(P-1)` hops of latency — simple and
//! bandwidth-minimal, appropriate for small `P`.
//!
//! Grounded on `examples/original_source/mpi/gtmpi_counter.cpp`.

use crate::dm::transport::{MessageTag, Transport};
use crate::error::{Direction, TransportError};

const ARRIVAL_TAG: MessageTag = MessageTag::new(0);
const WAKEUP_TAG: MessageTag = MessageTag::new(1);

/// A linear counter barrier driven by transport `T`.
pub struct LinearBarrier<T: Transport> {
    transport: T,
    episode: u64,
}

impl<T: Transport> LinearBarrier<T> {
    /// Wrap `transport` in a linear barrier.
    #[must_use]
    pub fn new(transport: T) -> Self {
        LinearBarrier { transport, episode: 0 }
    }

    /// Block until every rank has called `enter` for this episode.
    pub fn enter(&mut self) -> Result<(), TransportError> {
        let rank = self.transport.rank();
        let size = self.transport.size();
        log::trace!("linear barrier[{rank}]: enter (episode={})", self.episode);

        if rank > 0 {
            self.transport
                .recv(rank - 1, ARRIVAL_TAG, &mut [])
                .map_err(|e| TransportError::new(rank, rank - 1, self.episode, Direction::Recv, e))?;
        }
        if rank < size - 1 {
            self.transport
                .send(rank + 1, ARRIVAL_TAG, &[])
                .map_err(|e| TransportError::new(rank, rank + 1, self.episode, Direction::Send, e))?;
        }
        if rank > 0 {
            self.transport
                .send(rank - 1, WAKEUP_TAG, &[])
                .map_err(|e| TransportError::new(rank, rank - 1, self.episode, Direction::Send, e))?;
        }
        if rank < size - 1 {
            self.transport
                .recv(rank + 1, WAKEUP_TAG, &mut [])
                .map_err(|e| TransportError::new(rank, rank + 1, self.episode, Direction::Recv, e))?;
        }

        self.episode += 1;
        log::trace!("linear barrier[{rank}]: released");
        Ok(())
    }
}
