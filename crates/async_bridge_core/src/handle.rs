use std::fmt;

/// Generation token naming one accepted operation.
///
/// Tokens are handed out in strictly increasing order by a single
/// [`BridgeState`](crate::BridgeState), so comparing two tokens tells whether a
/// settlement still belongs to the operation that is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandleId(u64);

impl HandleId {
    pub const FIRST: HandleId = HandleId(1);

    pub(crate) fn next(self) -> HandleId {
        HandleId(self.0 + 1)
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
