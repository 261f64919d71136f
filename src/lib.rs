//! Barrier synchronization primitives for bulk-synchronous parallel
//! computation, over both shared memory and a message-passing transport.
//!
//! A barrier is a rendezvous point: every participant that calls `enter`
//! blocks until all `P` participants have called it, after which all are
//! released together. This crate offers six interchangeable algorithms
//! behind the same three-operation lifecycle — construct for `P`
//! participants, `enter()` any number of times, drop — drawn from
//! Mellor-Crummey and Scott's [Algorithms for scalable synchronization on
//! shared-memory multiprocessors][1] (1991):
//!
//! - [`sm::CounterBarrier`] — centralized sense-reversing counter.
//! - [`sm::TreeBarrier`] — software combining tree.
//! - [`sm::McsBarrier`] — MCS arrival/wakeup tree, the local-spinning design
//!   the paper itself recommends at scale.
//! - [`dm::LinearBarrier`] — linear chain send/receive over a
//!   [`dm::Transport`].
//! - [`dm::DisseminationBarrier`] — `O(log P)` gossip rounds.
//! - [`dm::TournamentBarrier`] — fixed-bracket elimination.
//!
//! The shared-memory (SM) family coordinates threads in one address space
//! through atomics; the distributed-memory (DM) family coordinates
//! processes through a caller-supplied [`dm::Transport`] (this crate brings
//! no networking of its own — see §6 of the design notes for why). Every SM
//! barrier is local-spinning: a waiting thread reads only memory on its own
//! node, so contention does not scale with `P`.
//!
//! [`sm::SmBarrier`] and [`dm::DmBarrier`] erase the choice of algorithm
//! behind a single enum dispatched once at construction time, so a caller
//! can select an algorithm at startup without paying a virtual-call cost on
//! the hot `enter()` path. [`process::ProcessBarrier`] then gives a single
//! process one place to hold its barrier instance across an explicit
//! init/finalize lifecycle.
//!
//! # Example
//!
//! ```
//! use bsp_barrier::sm::{SmAlgorithm, SmBarrier};
//! use std::thread;
//!
//! let root = SmBarrier::new(4, SmAlgorithm::Mcs);
//! let handles: Vec<_> = (0..4)
//!     .map(|i| {
//!         let mut b = root.for_participant(i);
//!         thread::spawn(move || {
//!             for _ in 0..1000 {
//!                 b.enter();
//!             }
//!         })
//!     })
//!     .collect();
//! for h in handles {
//!     h.join().unwrap();
//! }
//! ```
//!
//! # Choosing an algorithm
//!
//! For SM: the centralized counter is simplest and fine up to a handful of
//! cores; the combining tree and MCS tree trade extra setup complexity for
//! local spinning, which matters once contention on a single cache line
//! becomes the bottleneck. For DM: the linear barrier is bandwidth-minimal
//! but `O(P)` latency; dissemination and tournament are both `O(log P)`
//! latency, with tournament favoring a fixed, predictable message pattern
//! and dissemination favoring symmetry (no rank is special).
//!
//! [1]: https://dl.acm.org/citation.cfm?doid=103727.103729
#![deny(missing_docs)]

pub mod dm;
pub mod error;
pub mod process;
pub mod sm;
pub mod topology;

pub use dm::{DmAlgorithm, DmBarrier};
pub use error::TransportError;
pub use process::ProcessBarrier;
pub use sm::{SmAlgorithm, SmBarrier};
