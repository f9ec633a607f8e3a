use std::future::Future;

/// Asynchronous operation started by an accepted trigger.
///
/// Closures `Fn(A) -> impl Future<Output = Result<T, E>>` implement this
/// automatically.
#[async_trait::async_trait]
pub trait AsyncCallback<A, T, E>: Send + Sync {
    async fn call(&self, args: A) -> Result<T, E>;
}

#[async_trait::async_trait]
impl<A, T, E, F, Fut> AsyncCallback<A, T, E> for F
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    F: Fn(A) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    async fn call(&self, args: A) -> Result<T, E> {
        (self)(args).await
    }
}
