//! Software combining tree barrier (spec §4.4).
//!
//! A binary tree of counters with a sense bit per node. A participant climbs
//! from its assigned leaf toward the root, closing (decrementing to zero)
//! every node on the way until it meets a node some other participant still
//! has to arrive at; release then flows back down the path it closed.
//!
//! Grounded on `examples/original_source/mp/gtmp_tree.cpp`, which expresses
//! the climb-then-release as a recursive function. This port walks the path
//! twice (up, then back down) instead of recursing, which reproduces the
//! same release order without stack depth scaling with tree height.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

struct Node {
    /// Fan-in: how many arrivals this node waits for before it closes.
    k: usize,
    count: AtomicUsize,
    locksense: AtomicBool,
    parent: Option<usize>,
}

struct Inner {
    nodes: Vec<Node>,
    /// Number of leaves; leaf `j` covers participants `i` with `i % leaves == j`.
    leaves: usize,
    /// Absolute index of leaf 0 (`nodes.len() - leaves`).
    first_leaf: usize,
}

fn build_tree(participants: usize) -> Inner {
    debug_assert!(participants >= 1);
    // L = next_power_of_two(P) / 2, clamped to >= 1; N = 2L - 1.
    let v = participants.next_power_of_two().max(2);
    let leaves = (v / 2).max(1);
    let n = 2 * leaves - 1;
    let first_leaf = leaves - 1;

    let mut nodes = Vec::with_capacity(n);
    for i in 0..n {
        let parent = if i == 0 { None } else { Some((i - 1) / 2) };
        let k = if i >= first_leaf {
            // Leaf: k = how many participants map onto it.
            let j = i - first_leaf;
            let count = (j..participants).step_by(leaves).count();
            count.max(1)
        } else {
            2
        };
        nodes.push(Node {
            k,
            count: AtomicUsize::new(k),
            // Complement of the first post-flip `local_sense` (`true`,
            // flipped to `false` on the first `enter`), matching
            // `counter.rs`'s `global_sense` seed — otherwise a
            // non-closing arriver's very first wait condition
            // (`locksense != sense`) is vacuously satisfied and it
            // returns before the node has actually closed.
            locksense: AtomicBool::new(true),
            parent,
        });
    }

    Inner {
        nodes,
        leaves,
        first_leaf,
    }
}

/// A software combining tree barrier for `participants` participants.
pub struct TreeBarrier {
    inner: Arc<Inner>,
    leaf: usize,
    local_sense: bool,
    used: bool,
}

impl TreeBarrier {
    /// Create a new combining tree barrier for `participants` participants.
    #[must_use]
    pub fn new(participants: usize) -> Self {
        let inner = Arc::new(build_tree(participants));
        let leaf = inner.first_leaf + (0 % inner.leaves);
        TreeBarrier {
            inner,
            leaf,
            local_sense: true,
            used: false,
        }
    }

    /// Clone this handle for participant index `i` (`0 <= i < participants`).
    ///
    /// Unlike the counter barrier, a combining-tree handle is bound to a
    /// fixed leaf for its whole lifetime, so the participant index must be
    /// supplied explicitly at clone time rather than inferred.
    #[must_use]
    pub fn for_participant(&self, i: usize) -> Self {
        assert!(!self.used, "cannot rebind a combining-tree barrier after use");
        TreeBarrier {
            inner: self.inner.clone(),
            leaf: self.inner.first_leaf + (i % self.inner.leaves),
            local_sense: self.local_sense,
            used: false,
        }
    }

    /// Block until every participant has called `enter` for this episode.
    pub fn enter(&mut self) {
        self.used = true;
        self.local_sense = !self.local_sense;
        let sense = self.local_sense;
        log::trace!("tree barrier: enter at leaf {} (sense={})", self.leaf, sense);

        let nodes = &self.inner.nodes;
        let mut closed = Vec::new();
        let mut idx = self.leaf;
        let mut wait = parking_lot_core::SpinWait::new();
        loop {
            let node = &nodes[idx];
            let prev = node.count.fetch_sub(1, Ordering::AcqRel);
            if prev == 1 {
                closed.push(idx);
                match node.parent {
                    Some(p) => {
                        idx = p;
                        wait = parking_lot_core::SpinWait::new();
                        continue;
                    }
                    None => break,
                }
            } else {
                while node.locksense.load(Ordering::Acquire) != sense {
                    wait.spin();
                }
                break;
            }
        }

        // Unwind: reseed count before publishing locksense, root-most
        // closed node first, down to our own leaf.
        for &n in closed.iter().rev() {
            let node = &nodes[n];
            node.count.store(node.k, Ordering::Relaxed);
            node.locksense.store(sense, Ordering::Release);
        }
        log::trace!("tree barrier: released at leaf {}", self.leaf);
    }
}
