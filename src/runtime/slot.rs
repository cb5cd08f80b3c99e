//! The shared, nullable slot the environment publishes the runtime into.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use super::handle::TypesetRuntime;
use super::preload::PreloadConfig;

/// Process-wide nullable reference to the typesetting runtime.
///
/// The slot is owned by the environment; the gate only observes it. Each
/// [`install`](HandleSlot::install) bumps a generation counter, and the
/// first-apply guard ([`mark_applied`](HandleSlot::mark_applied)) makes
/// "configure at most once per handle generation" hold even when the gate
/// is started twice in one lifetime.
#[derive(Default)]
pub struct HandleSlot {
    current: RwLock<Option<(Arc<dyn TypesetRuntime>, u64)>>,
    next_generation: AtomicU64,
    applied_generation: AtomicU64,
    preload: Mutex<Option<PreloadConfig>>,
}

impl HandleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment side: publish a runtime handle. Returns the generation
    /// assigned to it.
    pub fn install(&self, handle: Arc<dyn TypesetRuntime>) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let mut slot = self.current.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some((handle, generation));
        generation
    }

    /// Current handle together with its generation, if one is published.
    pub fn snapshot(&self) -> Option<(Arc<dyn TypesetRuntime>, u64)> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_occupied(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// First-apply guard. Returns true exactly once per generation; later
    /// callers (duplicate injection, repeated runs) get false and must
    /// skip the configuration calls.
    pub fn mark_applied(&self, generation: u64) -> bool {
        let mut seen = self.applied_generation.load(Ordering::Acquire);
        loop {
            if seen >= generation {
                return false;
            }
            match self.applied_generation.compare_exchange(
                seen,
                generation,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => seen = actual,
            }
        }
    }

    /// Pre-load mode: stash configuration hooks for the runtime to pick up
    /// when it loads. Refused (returns false) once a handle is already
    /// published, so an in-progress initialization is never clobbered.
    pub fn install_preload(&self, config: PreloadConfig) -> bool {
        if self.is_occupied() {
            return false;
        }
        let mut preload = self.preload.lock().unwrap_or_else(|e| e.into_inner());
        *preload = Some(config);
        true
    }

    /// Runtime side: consume the pre-load hooks, if any were installed.
    pub fn take_preload(&self) -> Option<PreloadConfig> {
        self.preload
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::simulated::SimulatedRuntime;

    #[test]
    fn test_generations_are_monotonic() {
        let slot = HandleSlot::new();
        assert!(slot.snapshot().is_none());

        let g1 = slot.install(Arc::new(SimulatedRuntime::bare()));
        let g2 = slot.install(Arc::new(SimulatedRuntime::bare()));
        assert!(g2 > g1);

        let (_, current) = slot.snapshot().unwrap();
        assert_eq!(current, g2);
    }

    #[test]
    fn test_mark_applied_fires_once_per_generation() {
        let slot = HandleSlot::new();
        let g1 = slot.install(Arc::new(SimulatedRuntime::bare()));
        assert!(slot.mark_applied(g1));
        assert!(!slot.mark_applied(g1));

        // A re-published handle is a fresh generation and may apply again.
        let g2 = slot.install(Arc::new(SimulatedRuntime::bare()));
        assert!(slot.mark_applied(g2));
        assert!(!slot.mark_applied(g1));
    }

    #[test]
    fn test_preload_refused_once_occupied() {
        let slot = HandleSlot::new();
        assert!(slot.install_preload(PreloadConfig::accessible()));
        assert!(slot.take_preload().is_some());
        assert!(slot.take_preload().is_none());

        slot.install(Arc::new(SimulatedRuntime::bare()));
        assert!(!slot.install_preload(PreloadConfig::accessible()));
    }
}
