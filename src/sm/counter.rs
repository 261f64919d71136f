//! Centralized sense-reversing counter barrier (spec §4.3).
//!
//! A shared decrementing counter plus a global sense bit. The last arriver
//! re-seeds the counter and flips the sense; everyone else local-spins on
//! the sense bit. Directly descended from `hurdles::Barrier`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

struct Inner {
    global_sense: AtomicBool,
    count: AtomicUsize,
    participants: usize,
}

/// A centralized counter barrier for `participants` participants.
///
/// Clone this handle once per thread before spawning (each clone carries its
/// own local sense); `wait` (renamed `enter` at the crate root) blocks the
/// calling thread until every clone has called it for the current episode.
pub struct CounterBarrier {
    inner: Arc<Inner>,
    local_sense: bool,
    used: bool,
}

impl CounterBarrier {
    /// Create a new counter barrier for `participants` participants.
    ///
    /// `participants` must be at least 1.
    #[must_use]
    pub fn new(participants: usize) -> Self {
        debug_assert!(participants >= 1, "barrier requires at least one participant");
        CounterBarrier {
            used: false,
            local_sense: true,
            inner: Arc::new(Inner {
                global_sense: AtomicBool::new(true),
                count: AtomicUsize::new(participants),
                participants,
            }),
        }
    }

    /// Number of participants this barrier was created for.
    #[must_use]
    pub fn participants(&self) -> usize {
        self.inner.participants
    }

    /// Block until every participant has called `enter` for this episode.
    ///
    /// Returns `true` for exactly one (arbitrary) participant per episode —
    /// the "last arriver" that performed the re-seed.
    pub fn enter(&mut self) -> bool {
        self.used = true;
        self.local_sense = !self.local_sense;
        log::trace!("counter barrier: enter (sense={})", self.local_sense);

        // The pre-decrement value being 1 means we were the last arriver.
        if self.inner.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.count.store(self.inner.participants, Ordering::Relaxed);
            // Release: publish the new sense only after the count has been
            // re-seeded, so a subsequent episode's first arriver never
            // observes a stale zero count.
            self.inner.global_sense.store(self.local_sense, Ordering::Release);
            log::trace!("counter barrier: last arriver, released");
            true
        } else {
            let mut wait = parking_lot_core::SpinWait::new();
            while self.inner.global_sense.load(Ordering::Acquire) != self.local_sense {
                wait.spin();
            }
            log::trace!("counter barrier: released");
            false
        }
    }
}

impl Clone for CounterBarrier {
    fn clone(&self) -> Self {
        assert!(!self.used, "cannot clone a counter barrier after it has been used");
        CounterBarrier {
            used: false,
            local_sense: self.local_sense,
            inner: self.inner.clone(),
        }
    }
}
