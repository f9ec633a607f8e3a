use crate::view_model::BridgeView;
use crate::{HandleId, Snapshot};

/// Diagnostic counters for one bridge instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BridgeStats {
    /// Triggers that installed a new operation.
    pub started: u64,
    /// Triggers ignored because an operation was pending.
    pub suppressed: u64,
    /// Settlements dropped because their handle was no longer current.
    pub stale: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Current<T, E> {
    handle: HandleId,
    snapshot: Snapshot<T, E>,
}

/// State owned by one bridge instance.
///
/// `current` is `None` until the first accepted trigger and never returns to
/// `None` afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeState<T, E> {
    current: Option<Current<T, E>>,
    next_handle: HandleId,
    stats: BridgeStats,
}

impl<T, E> Default for BridgeState<T, E> {
    fn default() -> Self {
        Self {
            current: None,
            next_handle: HandleId::FIRST,
            stats: BridgeStats::default(),
        }
    }
}

impl<T, E> BridgeState<T, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reentrancy guard: a real operation is current and still pending.
    pub fn is_loading(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| current.snapshot.is_pending())
    }

    pub fn snapshot(&self) -> Option<&Snapshot<T, E>> {
        self.current.as_ref().map(|current| &current.snapshot)
    }

    pub fn current_handle(&self) -> Option<HandleId> {
        self.current.as_ref().map(|current| current.handle)
    }

    pub fn stats(&self) -> BridgeStats {
        self.stats
    }

    pub(crate) fn install_pending(&mut self) -> HandleId {
        let handle = self.next_handle;
        self.next_handle = handle.next();
        self.current = Some(Current {
            handle,
            snapshot: Snapshot::Pending,
        });
        self.stats.started += 1;
        handle
    }

    /// Applies `outcome` if `handle` is current and pending. Returns whether it was applied.
    pub(crate) fn settle(&mut self, handle: HandleId, outcome: Result<T, E>) -> bool {
        match self.current.as_mut() {
            Some(current) if current.handle == handle && current.snapshot.is_pending() => {
                current.snapshot = Snapshot::from_outcome(outcome);
                true
            }
            _ => {
                self.stats.stale += 1;
                false
            }
        }
    }

    pub(crate) fn record_suppressed(&mut self) {
        self.stats.suppressed += 1;
    }
}

impl<T: Clone, E: Clone> BridgeState<T, E> {
    pub fn view(&self) -> BridgeView<T, E> {
        BridgeView {
            snapshot: self.snapshot().cloned(),
            handle: self.current_handle(),
            is_loading: self.is_loading(),
            stats: self.stats,
        }
    }
}
