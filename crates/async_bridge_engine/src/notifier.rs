use std::sync::mpsc;

use async_bridge_core::StateChange;

/// Host re-render request, invoked once per observable state change.
///
/// Called from whichever thread produced the change: the thread calling the
/// trigger for `Pending`, a runtime worker for settlements.
pub trait RenderNotifier: Send + Sync {
    fn notify(&self, change: StateChange);
}

impl<F> RenderNotifier for F
where
    F: Fn(StateChange) + Send + Sync,
{
    fn notify(&self, change: StateChange) {
        (self)(change);
    }
}

/// Forwards changes into a host message channel.
pub struct ChannelNotifier<M> {
    tx: mpsc::Sender<M>,
}

impl<M> ChannelNotifier<M> {
    pub fn new(tx: mpsc::Sender<M>) -> Self {
        Self { tx }
    }
}

impl<M> RenderNotifier for ChannelNotifier<M>
where
    M: From<StateChange> + Send,
{
    fn notify(&self, change: StateChange) {
        // A closed channel means the host is gone; nothing left to re-render.
        let _ = self.tx.send(M::from(change));
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl RenderNotifier for NoopNotifier {
    fn notify(&self, _change: StateChange) {}
}
