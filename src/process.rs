//! Process-wide barrier handle (Design Notes §9: "process-wide singleton").
//!
//! The public contract is three operations — `init(P)`, `enter()`,
//! `finalize()` — but something has to own the barrier state they operate
//! on between calls. Rather than placement-new re-initialization tricks,
//! [`ProcessBarrier`] models the slot explicitly: `init` constructs and
//! stores a barrier, `finalize` takes it back out and drops it, and
//! re-`init`-ing over a still-occupied slot is the undefined case spec §5
//! calls out — caught here with an assertion instead of silently clobbering
//! live state.
//!
//! This type mediates *lifecycle*, not the hot path. For shared-memory
//! barriers, pull a [`crate::sm::SmBarrier::for_participant`] handle for
//! each thread once at spawn time and let each thread call `enter` on its
//! own owned copy from then on — routing every `enter` call back through
//! this cell's mutex would serialize the very concurrency the SM
//! algorithms exist to avoid. For distributed barriers, where exactly one
//! thread per process ever calls `enter`, holding the handle here for the
//! whole lifetime is the natural and only use.

use std::sync::{Mutex, MutexGuard};

/// An explicit init/finalize slot for a process-wide barrier instance of
/// type `B` (an [`crate::sm::SmBarrier`] or a [`crate::dm::DmBarrier`]).
pub struct ProcessBarrier<B> {
    slot: Mutex<Option<B>>,
}

impl<B> ProcessBarrier<B> {
    /// An empty slot, ready for [`ProcessBarrier::init`].
    #[must_use]
    pub const fn uninit() -> Self {
        ProcessBarrier { slot: Mutex::new(None) }
    }

    /// Install `barrier` as the process's active barrier instance.
    ///
    /// # Panics
    ///
    /// Panics if the slot is already occupied — re-init without an
    /// intervening `finalize` is undefined per spec §5.
    pub fn init(&self, barrier: B) {
        let mut slot = self.slot.lock().unwrap();
        assert!(slot.is_none(), "re-init without finalize is undefined (spec §5)");
        *slot = Some(barrier);
    }

    /// Borrow the active barrier instance.
    ///
    /// # Panics
    ///
    /// Panics if called before `init` or after `finalize` — both are
    /// undefined per spec §5.
    pub fn handle(&self) -> ProcessBarrierGuard<'_, B> {
        let guard = self.slot.lock().unwrap();
        assert!(guard.is_some(), "use before init or after finalize is undefined (spec §5)");
        ProcessBarrierGuard(guard)
    }

    /// Tear down the process's active barrier instance, returning it.
    ///
    /// # Panics
    ///
    /// Panics if there is no matching `init` — undefined per spec §5.
    pub fn finalize(&self) -> B {
        self.slot
            .lock()
            .unwrap()
            .take()
            .expect("finalize without a matching init is undefined (spec §5)")
    }
}

impl<B> Default for ProcessBarrier<B> {
    fn default() -> Self {
        Self::uninit()
    }
}

/// A locked, dereferenceable view of a [`ProcessBarrier`]'s contents.
pub struct ProcessBarrierGuard<'a, B>(MutexGuard<'a, Option<B>>);

impl<B> std::ops::Deref for ProcessBarrierGuard<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.0.as_ref().expect("checked non-empty in ProcessBarrier::handle")
    }
}

impl<B> std::ops::DerefMut for ProcessBarrierGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.0.as_mut().expect("checked non-empty in ProcessBarrier::handle")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sm::{SmAlgorithm, SmBarrier};

    #[test]
    fn init_handle_finalize_cycle() {
        let process: ProcessBarrier<SmBarrier> = ProcessBarrier::uninit();
        process.init(SmBarrier::new(1, SmAlgorithm::Counter));
        process.handle().enter();
        process.handle().enter();
        let _ = process.finalize();
    }

    #[test]
    #[should_panic(expected = "re-init without finalize")]
    fn double_init_panics() {
        let process: ProcessBarrier<SmBarrier> = ProcessBarrier::uninit();
        process.init(SmBarrier::new(1, SmAlgorithm::Counter));
        process.init(SmBarrier::new(1, SmAlgorithm::Counter));
    }

    #[test]
    #[should_panic(expected = "before init or after finalize")]
    fn handle_before_init_panics() {
        let process: ProcessBarrier<SmBarrier> = ProcessBarrier::uninit();
        let _ = process.handle();
    }

    #[test]
    #[should_panic(expected = "without a matching init")]
    fn double_finalize_panics() {
        let process: ProcessBarrier<SmBarrier> = ProcessBarrier::uninit();
        process.init(SmBarrier::new(1, SmAlgorithm::Counter));
        let _ = process.finalize();
        let _ = process.finalize();
    }
}
