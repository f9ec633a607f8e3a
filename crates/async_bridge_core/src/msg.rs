use crate::HandleId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg<A, T, E> {
    /// Host invoked the trigger with these arguments.
    Triggered(A),
    /// An operation finished. Ignored unless `handle` is still current.
    Settled {
        handle: HandleId,
        outcome: Result<T, E>,
    },
}
