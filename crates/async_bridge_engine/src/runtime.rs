use std::future::Future;

use tokio::runtime::{Builder, Handle, Runtime};

use crate::BridgeError;

#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub worker_threads: usize,
    pub thread_name: String,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            worker_threads: 2,
            thread_name: "async-bridge-worker".to_string(),
        }
    }
}

/// Where accepted operations run.
///
/// Bridges only keep a [`Handle`]; an owned runtime stays here so it is never
/// dropped from inside one of its own tasks.
pub struct BridgeRuntime {
    handle: Handle,
    _owned: Option<Runtime>,
}

impl BridgeRuntime {
    /// Uses the runtime the calling thread is already inside.
    pub fn current() -> Result<Self, BridgeError> {
        Ok(Self::from_handle(Handle::try_current()?))
    }

    pub fn from_handle(handle: Handle) -> Self {
        Self {
            handle,
            _owned: None,
        }
    }

    /// Builds and owns a dedicated multi-thread runtime.
    pub fn with_settings(settings: &RuntimeSettings) -> Result<Self, BridgeError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(settings.worker_threads.max(1))
            .thread_name(settings.thread_name.clone())
            .enable_all()
            .build()?;
        Ok(Self {
            handle: runtime.handle().clone(),
            _owned: Some(runtime),
        })
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

pub(crate) fn spawn_detached<F>(handle: &Handle, future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    // Operations are never cancelled, so the join handle is not needed.
    drop(handle.spawn(future));
}
