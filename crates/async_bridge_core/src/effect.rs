use crate::{HandleId, Status};

/// One host notification: the current operation moved to `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub handle: HandleId,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect<A> {
    /// Run the callback with `args`; report back with `Msg::Settled { handle, .. }`.
    Start { handle: HandleId, args: A },
    /// Ask the host to re-render.
    Notify(StateChange),
}
