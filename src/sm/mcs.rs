//! MCS arrival/wakeup tree barrier (spec §4.5).
//!
//! Two trees are superimposed over the same cache-line-aligned node array:
//! an arrival tree with fan-in `K_a` (children OR their bit into the
//! parent's arrival word) and a wakeup tree with fan-out `K_w` (a node
//! writes its children's sense bit directly). Each participant local-spins
//! only on its own node's two fields, the defining property of MCS-style
//! barriers.
//!
//! Grounded on `examples/original_source/mp/gtmp_mcs.cpp`
//! (`GenericMcsTree<ArriveK, WakeupK>`).

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use crate::topology;

/// Default cache line size in bytes, used to align MCS tree nodes so that no
/// two hot atomic fields from adjacent nodes share a line.
pub const CACHE_LINE: usize = 64;

/// Maximum arrival fan-in supported by the 32-bit arrival word.
pub const MAX_ARRIVAL_FANIN: u32 = u32::BITS;

#[repr(align(64))]
struct Node {
    arrival_word: AtomicU32,
    lock_sense: AtomicBool,
}

fn initial_arrival_word(num_children: usize) -> u32 {
    debug_assert!(num_children as u32 <= MAX_ARRIVAL_FANIN);
    if num_children as u32 == MAX_ARRIVAL_FANIN {
        0
    } else {
        !((1u32 << num_children) - 1)
    }
}

struct Inner {
    nodes: Vec<Node>,
    participants: usize,
    arrival_fanin: usize,
    wakeup_fanout: usize,
}

/// An MCS arrival/wakeup tree barrier for `participants` participants.
pub struct McsBarrier {
    inner: Arc<Inner>,
    index: usize,
    used: bool,
}

impl McsBarrier {
    /// Create a new MCS barrier with the default fan-in (4) and fan-out (2).
    #[must_use]
    pub fn new(participants: usize) -> Self {
        Self::with_fanin_fanout(participants, 4, 2)
    }

    /// Create a new MCS barrier with explicit arrival fan-in `k_a` and
    /// wakeup fan-out `k_w`.
    #[must_use]
    pub fn with_fanin_fanout(participants: usize, k_a: usize, k_w: usize) -> Self {
        debug_assert!(participants >= 1);
        debug_assert!(k_a > 0 && k_a as u32 <= MAX_ARRIVAL_FANIN);
        debug_assert!(k_w > 0);

        let nodes = (0..participants)
            .map(|i| {
                let nchild = topology::num_children(i, k_a, participants);
                Node {
                    arrival_word: AtomicU32::new(initial_arrival_word(nchild)),
                    lock_sense: AtomicBool::new(false),
                }
            })
            .collect();

        McsBarrier {
            inner: Arc::new(Inner {
                nodes,
                participants,
                arrival_fanin: k_a,
                wakeup_fanout: k_w,
            }),
            index: 0,
            used: false,
        }
    }

    /// Number of participants this barrier was created for.
    #[must_use]
    pub fn participants(&self) -> usize {
        self.inner.participants
    }

    /// Bind this handle to participant index `i` (`0 <= i < participants`).
    #[must_use]
    pub fn for_participant(&self, i: usize) -> Self {
        assert!(!self.used, "cannot rebind an MCS barrier after use");
        debug_assert!(i < self.inner.participants);
        McsBarrier {
            inner: self.inner.clone(),
            index: i,
            used: false,
        }
    }

    /// Block until every participant has called `enter` for this episode.
    pub fn enter(&mut self) {
        self.used = true;
        let inner = &self.inner;
        let i = self.index;
        let k_a = inner.arrival_fanin;
        let k_w = inner.wakeup_fanout;
        let p = inner.participants;
        let nodes = &inner.nodes;

        // Step 1: remember the sense we're waiting to see flip.
        let prev_sense = nodes[i].lock_sense.load(Ordering::Relaxed);
        log::trace!("mcs barrier[{i}]: enter (prev_sense={prev_sense})");

        // Step 2: wait for all children to have arrived.
        let mut wait = parking_lot_core::SpinWait::new();
        while nodes[i].arrival_word.load(Ordering::Acquire) != u32::MAX {
            wait.spin();
        }

        // Step 3: reset our arrival word for next episode.
        let nchild = topology::num_children(i, k_a, p);
        nodes[i].arrival_word.store(initial_arrival_word(nchild), Ordering::Relaxed);

        // Step 4: signal our arrival-tree parent, or self-release if root.
        if let Some(parent) = topology::parent(i, k_a) {
            let slot = topology::child_slot(i, k_a);
            nodes[parent].arrival_word.fetch_or(1u32 << slot, Ordering::Release);

            let mut wait = parking_lot_core::SpinWait::new();
            while nodes[i].lock_sense.load(Ordering::Acquire) == prev_sense {
                wait.spin();
            }
        } else {
            nodes[i].lock_sense.store(!prev_sense, Ordering::Release);
        }

        // Step 5: wake up our wakeup-tree children.
        let new_sense = !prev_sense;
        for c in topology::children(i, k_w, p) {
            nodes[c].lock_sense.store(new_sense, Ordering::Release);
        }
        log::trace!("mcs barrier[{i}]: released (sense={new_sense})");
    }
}
