use std::fmt;
use std::sync::Arc;

use async_bridge_core::HandleId;

use crate::bridge::Shared;

/// What a trigger call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Started(HandleId),
    /// An operation was already pending; nothing changed.
    Suppressed,
}

/// Starts the bridged operation unless one is already pending.
///
/// Two triggers are equal when they come from the same bridge and the same
/// memoized render key.
pub struct Trigger<A, T, E> {
    shared: Arc<Shared<A, T, E>>,
    epoch: u64,
}

impl<A, T, E> Trigger<A, T, E>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    pub(crate) fn new(shared: Arc<Shared<A, T, E>>, epoch: u64) -> Self {
        Self { shared, epoch }
    }

    /// Never blocks and never fails; failures show up in the snapshot.
    pub fn call(&self, args: A) -> Dispatch {
        self.shared.trigger(args)
    }
}

impl<A, T, E> Trigger<A, T, E> {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

impl<A, T, E> Clone for Trigger<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            epoch: self.epoch,
        }
    }
}

impl<A, T, E> PartialEq for Trigger<A, T, E> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared) && self.epoch == other.epoch
    }
}

impl<A, T, E> Eq for Trigger<A, T, E> {}

impl<A, T, E> fmt::Debug for Trigger<A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger").field("epoch", &self.epoch).finish()
    }
}
