//! Async bridge core: pure state machine behind a trigger/snapshot pair.
mod effect;
mod handle;
mod memo;
mod msg;
mod snapshot;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, StateChange};
pub use handle::HandleId;
pub use memo::Memo;
pub use msg::Msg;
pub use snapshot::{Snapshot, Status};
pub use state::{BridgeState, BridgeStats};
pub use update::update;
pub use view_model::BridgeView;
