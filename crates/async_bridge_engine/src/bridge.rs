use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use async_bridge_core::{
    update, BridgeState, BridgeStats, BridgeView, Effect, HandleId, Memo, Msg, Snapshot,
    StateChange,
};
use bridge_logging::{bridge_debug, bridge_trace, bridge_warn};
use futures_util::FutureExt;
use tokio::runtime::Handle;

use crate::runtime::spawn_detached;
use crate::{AsyncCallback, BridgeRuntime, Dispatch, OperationError, RenderNotifier, Trigger};

/// Snapshot type read by the host.
pub type BridgeSnapshot<T, E> = Snapshot<T, OperationError<E>>;

/// One bridge instance per logical consumer.
///
/// `render` is called on every host evaluation and returns the current
/// snapshot together with a trigger whose identity only changes when the
/// dependencies or the loading guard change.
pub struct AsyncBridge<A, T, E, D = ()> {
    shared: Arc<Shared<A, T, E>>,
    memo: Memo<(D, bool), u64>,
    epochs: u64,
}

impl<A, T, E, D> AsyncBridge<A, T, E, D>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn new(
        runtime: &BridgeRuntime,
        callback: impl AsyncCallback<A, T, E> + 'static,
        notifier: impl RenderNotifier + 'static,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(BridgeState::new()),
                outbox: Mutex::new(Outbox::default()),
                callback: Arc::new(callback),
                notifier: Box::new(notifier),
                runtime: runtime.handle().clone(),
            }),
            memo: Memo::new(),
            epochs: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.shared.lock().is_loading()
    }

    pub fn stats(&self) -> BridgeStats {
        self.shared.lock().stats()
    }
}

impl<A, T, E, D> AsyncBridge<A, T, E, D>
where
    A: Send + 'static,
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    D: PartialEq,
{
    /// Evaluates the bridge for one render pass.
    pub fn render(&mut self, deps: D) -> (Option<BridgeSnapshot<T, E>>, Trigger<A, T, E>) {
        let (snapshot, is_loading) = {
            let state = self.shared.lock();
            (state.snapshot().cloned(), state.is_loading())
        };
        let epochs = &mut self.epochs;
        let epoch = *self.memo.get((deps, is_loading), |_| {
            *epochs += 1;
            *epochs
        });
        (snapshot, Trigger::new(Arc::clone(&self.shared), epoch))
    }

    pub fn snapshot(&self) -> Option<BridgeSnapshot<T, E>> {
        self.shared.lock().snapshot().cloned()
    }

    pub fn view(&self) -> BridgeView<T, OperationError<E>> {
        self.shared.lock().view()
    }
}

pub(crate) struct Shared<A, T, E> {
    state: Mutex<BridgeState<T, OperationError<E>>>,
    outbox: Mutex<Outbox>,
    callback: Arc<dyn AsyncCallback<A, T, E>>,
    notifier: Box<dyn RenderNotifier>,
    runtime: Handle,
}

/// Changes waiting for the notifier, in the order `update` produced them.
#[derive(Default)]
struct Outbox {
    queue: VecDeque<StateChange>,
    delivering: bool,
}

fn lock_outbox(outbox: &Mutex<Outbox>) -> MutexGuard<'_, Outbox> {
    outbox.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Releases the delivery slot if the notifier panics mid-drain.
struct DeliveryGuard<'a>(&'a Mutex<Outbox>);

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            lock_outbox(self.0).delivering = false;
        }
    }
}

impl<A, T, E> Shared<A, T, E>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    fn lock(&self) -> MutexGuard<'_, BridgeState<T, OperationError<E>>> {
        // Every update replaces the state wholesale, so a poisoned value is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `update` and queues its notifications while the state lock is
    /// held, so queue order matches state order. Returns the operation to
    /// start, if any, and whether anything was queued.
    fn apply(&self, msg: Msg<A, T, OperationError<E>>) -> (Option<(HandleId, A)>, bool) {
        let mut guard = self.lock();
        let state = std::mem::take(&mut *guard);
        let (state, effects) = update(state, msg);
        *guard = state;

        let mut outbox = lock_outbox(&self.outbox);
        let mut start = None;
        let mut queued = false;
        for effect in effects {
            match effect {
                Effect::Notify(change) => {
                    outbox.queue.push_back(change);
                    queued = true;
                }
                Effect::Start { handle, args } => start = Some((handle, args)),
            }
        }
        (start, queued)
    }

    /// Hands queued changes to the notifier one at a time, without holding
    /// any lock during the call. Only one thread drains at a time; a caller
    /// that finds a drain in progress leaves its changes to that thread.
    fn deliver(&self) {
        {
            let mut outbox = lock_outbox(&self.outbox);
            if outbox.delivering {
                return;
            }
            outbox.delivering = true;
        }
        let _guard = DeliveryGuard(&self.outbox);
        loop {
            let change = {
                let mut outbox = lock_outbox(&self.outbox);
                match outbox.queue.pop_front() {
                    Some(change) => change,
                    None => {
                        outbox.delivering = false;
                        return;
                    }
                }
            };
            self.notifier.notify(change);
        }
    }

    pub(crate) fn trigger(self: &Arc<Self>, args: A) -> Dispatch {
        let (start, _) = self.apply(Msg::Triggered(args));
        let Some((handle, args)) = start else {
            bridge_trace!("Trigger suppressed; operation still pending");
            return Dispatch::Suppressed;
        };
        bridge_debug!("Trigger accepted handle={}", handle);
        // Pending goes out before the operation can possibly settle.
        self.deliver();
        self.start(handle, args);
        Dispatch::Started(handle)
    }

    fn settle(&self, handle: HandleId, outcome: Result<T, OperationError<E>>) {
        if let Err(OperationError::Panicked(message)) = &outcome {
            bridge_warn!("Operation {} panicked: {}", handle, message);
        }
        let (_, queued) = self.apply(Msg::Settled { handle, outcome });
        if queued {
            bridge_debug!("Operation {} settled", handle);
            self.deliver();
        }
    }

    fn start(self: &Arc<Self>, handle: HandleId, args: A) {
        let shared = Arc::clone(self);
        let callback = Arc::clone(&self.callback);
        spawn_detached(&self.runtime, async move {
            let outcome = run_operation(callback, args).await;
            shared.settle(handle, outcome);
        });
    }
}

async fn run_operation<A, T, E>(
    callback: Arc<dyn AsyncCallback<A, T, E>>,
    args: A,
) -> Result<T, OperationError<E>>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    // `call` itself may panic before handing back a future (hand-written
    // impls); closures and `#[async_trait]` bodies only run on first poll and
    // are caught by the second `catch_unwind`.
    let future = match panic::catch_unwind(AssertUnwindSafe(|| callback.call(args))) {
        Ok(future) => future,
        Err(payload) => return Err(OperationError::Panicked(panic_message(payload))),
    };
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result.map_err(OperationError::Failed),
        Err(payload) => Err(OperationError::Panicked(panic_message(payload))),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
