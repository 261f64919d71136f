//! Tournament barrier over a message-passing transport (spec §4.8).
//!
//! Arrival phase climbs a fixed elimination bracket; a rank that wins a
//! round records the distance of the opponent it just beat and keeps
//! climbing, until it either loses a round or runs out of opponents
//! (champion). It then unwinds its own recorded wins in reverse, waking
//! each defeated opponent in turn — the same "remember the path up, retrace
//! it on the way down" shape as the combining tree's [`crate::sm::tree`]
//! barrier. A rank that is eliminated early still owes wakeups to whichever
//! opponents it personally beat before that; only a rank that lost its very
//! first round owes nobody anything.
//!
//! Two distinct message tags guard against a loser's two consecutive
//! messages to the same peer being reordered by a transport that only
//! guarantees FIFO within a single `(src, dst, tag)` triple.
//!
//! Grounded on `examples/original_source/mpi/gtmpi_tournament.cpp`.

use crate::dm::transport::{MessageTag, Transport};
use crate::error::{Direction, TransportError};
use crate::topology::{self, Role};

const LOSER_ARRIVAL: MessageTag = MessageTag::new(1);
const WINNER_WAKEUP: MessageTag = MessageTag::new(2);

/// A tournament barrier driven by transport `T`.
pub struct TournamentBarrier<T: Transport> {
    transport: T,
    episode: u64,
    won_distances: Vec<usize>,
}

impl<T: Transport> TournamentBarrier<T> {
    /// Wrap `transport` in a tournament barrier.
    #[must_use]
    pub fn new(transport: T) -> Self {
        TournamentBarrier {
            transport,
            episode: 0,
            won_distances: Vec::new(),
        }
    }

    /// Block until every rank has called `enter` for this episode.
    pub fn enter(&mut self) -> Result<(), TransportError> {
        let rank = self.transport.rank();
        let size = self.transport.size();
        log::trace!("tournament barrier[{rank}]: enter (episode={})", self.episode);

        self.won_distances.clear();
        let mut round: u32 = 1;

        // Arrival phase: climb toward the champion, remembering each
        // opponent beaten along the way.
        loop {
            let distance = 1usize << (round - 1);
            match topology::tournament_role(rank, round, size) {
                Role::Winner => {
                    let opponent = rank + distance;
                    self.transport
                        .recv(opponent, LOSER_ARRIVAL, &mut [])
                        .map_err(|e| TransportError::new(rank, opponent, round as u64, Direction::Recv, e))?;
                    self.won_distances.push(distance);
                    round += 1;
                }
                Role::Bye => {
                    round += 1;
                }
                Role::Loser => {
                    let opponent = rank - distance;
                    self.transport
                        .send(opponent, LOSER_ARRIVAL, &[])
                        .map_err(|e| TransportError::new(rank, opponent, round as u64, Direction::Send, e))?;
                    self.transport
                        .recv(opponent, WINNER_WAKEUP, &mut [])
                        .map_err(|e| TransportError::new(rank, opponent, round as u64, Direction::Recv, e))?;
                    break;
                }
                Role::Champion => {
                    break;
                }
            }
        }

        // Wakeup phase: unwind the bracket, most recent win first, waking
        // every opponent this rank personally beat.
        for &distance in self.won_distances.iter().rev() {
            let target = rank + distance;
            debug_assert!(target < size, "a recorded win always has an in-range opponent");
            self.transport
                .send(target, WINNER_WAKEUP, &[])
                .map_err(|e| TransportError::new(rank, target, distance as u64, Direction::Send, e))?;
        }

        self.episode += 1;
        log::trace!("tournament barrier[{rank}]: released");
        Ok(())
    }
}
