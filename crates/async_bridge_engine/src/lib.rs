//! Async bridge engine: runs accepted operations and reports their settlement.
mod bridge;
mod callback;
mod error;
mod notifier;
mod runtime;
mod trigger;

pub use async_bridge_core::{BridgeStats, BridgeView, HandleId, Snapshot, StateChange, Status};
pub use bridge::{AsyncBridge, BridgeSnapshot};
pub use callback::AsyncCallback;
pub use error::{BridgeError, OperationError};
pub use notifier::{ChannelNotifier, NoopNotifier, RenderNotifier};
pub use runtime::{BridgeRuntime, RuntimeSettings};
pub use trigger::{Dispatch, Trigger};
