use thiserror::Error;

/// Why an operation ended in the rejected state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError<E> {
    /// The callback returned `Err`.
    #[error("operation failed: {0}")]
    Failed(E),
    /// The callback panicked, either inside `call` before returning its
    /// future or while that future was polled.
    #[error("operation panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no tokio runtime is running on this thread")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
    #[error("failed to build runtime: {0}")]
    RuntimeBuild(#[from] std::io::Error),
}
