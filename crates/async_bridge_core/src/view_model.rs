use crate::{BridgeStats, HandleId, Snapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeView<T, E> {
    pub snapshot: Option<Snapshot<T, E>>,
    pub handle: Option<HandleId>,
    pub is_loading: bool,
    pub stats: BridgeStats,
}
