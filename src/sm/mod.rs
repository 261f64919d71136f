//! Shared-memory barrier variants: participants are threads in a single
//! address space coordinating through atomic memory locations (spec §1, SM).

pub mod counter;
pub mod mcs;
pub mod tree;

pub use counter::CounterBarrier;
pub use mcs::McsBarrier;
pub use tree::TreeBarrier;

/// Which shared-memory algorithm to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmAlgorithm {
    /// Centralized sense-reversing counter (§4.3).
    Counter,
    /// Software combining tree (§4.4).
    Tree,
    /// MCS arrival/wakeup tree with default fan-in/fan-out (§4.5).
    Mcs,
    /// MCS arrival/wakeup tree with explicit arrival fan-in / wakeup fan-out.
    McsWithFanout {
        /// Arrival tree fan-in (`K_a`).
        arrival_fanin: usize,
        /// Wakeup tree fan-out (`K_w`).
        wakeup_fanout: usize,
    },
}

/// A shared-memory barrier, dispatched statically over its algorithm via a
/// tagged variant rather than a trait object (Design Notes §9: "the hot path
/// must not pay a virtual-call penalty").
pub enum SmBarrier {
    /// See [`CounterBarrier`].
    Counter(CounterBarrier),
    /// See [`TreeBarrier`].
    Tree(TreeBarrier),
    /// See [`McsBarrier`].
    Mcs(McsBarrier),
}

impl SmBarrier {
    /// Construct a barrier for `participants` participants using `algorithm`.
    ///
    /// The returned handle is bound to participant index 0; use
    /// [`SmBarrier::for_participant`] to obtain handles for the others.
    #[must_use]
    pub fn new(participants: usize, algorithm: SmAlgorithm) -> Self {
        debug_assert!(participants >= 1, "barrier requires at least one participant");
        match algorithm {
            SmAlgorithm::Counter => SmBarrier::Counter(CounterBarrier::new(participants)),
            SmAlgorithm::Tree => SmBarrier::Tree(TreeBarrier::new(participants)),
            SmAlgorithm::Mcs => SmBarrier::Mcs(McsBarrier::new(participants)),
            SmAlgorithm::McsWithFanout {
                arrival_fanin,
                wakeup_fanout,
            } => SmBarrier::Mcs(McsBarrier::with_fanin_fanout(
                participants,
                arrival_fanin,
                wakeup_fanout,
            )),
        }
    }

    /// Bind a handle to participant index `i` (`0 <= i < participants`).
    ///
    /// For the counter barrier, which assigns no fixed role to a
    /// participant index, this is equivalent to [`Clone`]; it is provided
    /// uniformly across variants so callers do not need to match on the
    /// algorithm to distribute handles to threads.
    #[must_use]
    pub fn for_participant(&self, i: usize) -> Self {
        match self {
            SmBarrier::Counter(c) => SmBarrier::Counter(c.clone()),
            SmBarrier::Tree(t) => SmBarrier::Tree(t.for_participant(i)),
            SmBarrier::Mcs(m) => SmBarrier::Mcs(m.for_participant(i)),
        }
    }

    /// Block until every participant has called `enter` for this episode.
    pub fn enter(&mut self) {
        match self {
            SmBarrier::Counter(c) => {
                c.enter();
            }
            SmBarrier::Tree(t) => t.enter(),
            SmBarrier::Mcs(m) => m.enter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    fn run(algorithm: SmAlgorithm, participants: usize, iters: usize) {
        let root = SmBarrier::new(participants, algorithm);
        let workspace: Vec<_> = (0..participants).map(|_| AtomicUsize::new(0)).collect();
        let workspace = Arc::new(workspace);

        let handles: Vec<_> = (0..participants)
            .map(|i| {
                let mut b = root.for_participant(i);
                let ws = workspace.clone();
                thread::spawn(move || {
                    for _ in 0..iters {
                        ws[i].fetch_add(1, Ordering::Relaxed);
                        b.enter();
                        assert_eq!(
                            ws[i].load(Ordering::Relaxed),
                            ws[(i + 1) % participants].load(Ordering::Relaxed)
                        );
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn all_algorithms_p4() {
        run(SmAlgorithm::Counter, 4, 2048);
        run(SmAlgorithm::Tree, 4, 2048);
        run(SmAlgorithm::Mcs, 4, 2048);
    }

    #[test]
    fn all_algorithms_p7_non_power_of_two() {
        run(SmAlgorithm::Counter, 7, 1024);
        run(SmAlgorithm::Tree, 7, 1024);
        run(SmAlgorithm::Mcs, 7, 1024);
    }

    #[test]
    fn s2_single_participant_all_algorithms() {
        for algorithm in [SmAlgorithm::Counter, SmAlgorithm::Tree, SmAlgorithm::Mcs] {
            let root = SmBarrier::new(1, algorithm);
            let mut b = root.for_participant(0);
            for _ in 0..100 {
                b.enter();
            }
        }
    }
}
