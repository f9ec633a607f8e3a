use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::{Duration, Instant};

use async_bridge_engine::{
    AsyncBridge, AsyncCallback, BridgeRuntime, Dispatch, HandleId, NoopNotifier, OperationError,
    Snapshot, StateChange, Status,
};
use pretty_assertions::assert_eq;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

type Bridge = AsyncBridge<(), String, String>;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(bridge_logging::initialize_for_tests);
}

fn recording_bridge<F, Fut>(callback: F) -> (Bridge, UnboundedReceiver<StateChange>)
where
    F: Fn(()) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, String>> + Send + 'static,
{
    let runtime = BridgeRuntime::current().expect("inside tokio test");
    let (tx, rx) = unbounded_channel();
    let bridge = AsyncBridge::new(&runtime, callback, move |change: StateChange| {
        let _ = tx.send(change);
    });
    (bridge, rx)
}

async fn next_change(rx: &mut UnboundedReceiver<StateChange>) -> StateChange {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("change within timeout")
        .expect("notifier alive")
}

async fn assert_quiet(rx: &mut UnboundedReceiver<StateChange>, window: Duration) {
    let extra = tokio::time::timeout(window, rx.recv()).await;
    assert!(extra.is_err(), "unexpected notification: {extra:?}");
}

fn statuses(changes: &[StateChange]) -> Vec<Status> {
    changes.iter().map(|change| change.status).collect()
}

#[tokio::test]
async fn immediate_resolution_goes_absent_pending_resolved() {
    init_logging();
    let (mut bridge, mut rx) =
        recording_bridge(|_: ()| async { Ok::<_, String>("HELLO THERE".to_string()) });

    let (snapshot, trigger) = bridge.render(());
    assert_eq!(snapshot, None);

    assert_eq!(trigger.call(()), Dispatch::Started(HandleId::FIRST));
    let pending = rx.try_recv().expect("pending notified synchronously");
    assert_eq!(pending.status, Status::Pending);
    assert_eq!(bridge.render(()).0, Some(Snapshot::Pending));

    let settled = next_change(&mut rx).await;
    assert_eq!(
        settled,
        StateChange {
            handle: HandleId::FIRST,
            status: Status::Resolved,
        }
    );
    assert_eq!(
        bridge.render(()).0,
        Some(Snapshot::Resolved("HELLO THERE".to_string()))
    );
}

#[tokio::test]
async fn delayed_rejection_is_captured_and_rearms() {
    init_logging();
    let (mut bridge, mut rx) = recording_bridge(|_: ()| async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Err::<String, _>("General kenobi".to_string())
    });

    let started_at = Instant::now();
    let (_, trigger) = bridge.render(());
    trigger.call(());
    assert_eq!(next_change(&mut rx).await.status, Status::Pending);
    assert!(bridge.is_loading());

    assert_eq!(next_change(&mut rx).await.status, Status::Rejected);
    assert!(started_at.elapsed() >= Duration::from_millis(50));
    assert_eq!(
        bridge.snapshot(),
        Some(Snapshot::Rejected(OperationError::Failed(
            "General kenobi".to_string()
        )))
    );
    assert!(!bridge.is_loading());

    let (_, trigger) = bridge.render(());
    assert!(matches!(
        trigger.call(()),
        Dispatch::Started(handle) if handle > HandleId::FIRST
    ));
}

#[tokio::test]
async fn second_click_while_pending_changes_nothing() {
    init_logging();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let (mut bridge, mut rx) = recording_bridge(move |_: ()| {
        let counter = Arc::clone(&counter);
        async move {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, String>(format!("You're a bold one #{n}"))
        }
    });

    let (_, trigger) = bridge.render(());
    assert_eq!(trigger.call(()), Dispatch::Started(HandleId::FIRST));
    assert_eq!(next_change(&mut rx).await.status, Status::Pending);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let (snapshot, trigger) = bridge.render(());
    assert_eq!(snapshot, Some(Snapshot::Pending));
    assert_eq!(trigger.call(()), Dispatch::Suppressed);
    assert!(rx.try_recv().is_err());

    let settled = next_change(&mut rx).await;
    assert_eq!(settled.handle, HandleId::FIRST);
    assert_eq!(settled.status, Status::Resolved);
    assert_eq!(
        bridge.snapshot(),
        Some(Snapshot::Resolved("You're a bold one #1".to_string()))
    );
    assert_quiet(&mut rx, Duration::from_millis(100)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let stats = bridge.stats();
    assert_eq!(stats.started, 1);
    assert_eq!(stats.suppressed, 1);
}

#[tokio::test]
async fn sequential_calls_run_two_full_cycles() {
    init_logging();
    let (mut bridge, mut rx) = recording_bridge(|_: ()| async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok::<_, String>("again".to_string())
    });

    let mut changes = Vec::new();
    for _ in 0..2 {
        let (_, trigger) = bridge.render(());
        assert!(matches!(trigger.call(()), Dispatch::Started(_)));
        changes.push(next_change(&mut rx).await);
        changes.push(next_change(&mut rx).await);
        assert_eq!(
            bridge.render(()).0,
            Some(Snapshot::Resolved("again".to_string()))
        );
    }

    assert_eq!(
        statuses(&changes),
        vec![
            Status::Pending,
            Status::Resolved,
            Status::Pending,
            Status::Resolved,
        ]
    );
    assert_eq!(changes[0].handle, changes[1].handle);
    assert_eq!(changes[2].handle, changes[3].handle);
    assert!(changes[2].handle > changes[1].handle);
}

fn explode_on_first_poll(_: ()) -> std::future::Ready<Result<String, String>> {
    panic!("sync boom")
}

/// Panics inside `call` itself, before any future exists.
struct ExplodesBeforeFuture;

impl AsyncCallback<(), String, String> for ExplodesBeforeFuture {
    fn call<'life0, 'async_trait>(
        &'life0 self,
        _args: (),
    ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'async_trait>>
    where
        'life0: 'async_trait,
        Self: 'async_trait,
    {
        panic!("eager boom")
    }
}

async fn explode_later(_: ()) -> Result<String, String> {
    tokio::time::sleep(Duration::from_millis(5)).await;
    panic!("async boom")
}

#[tokio::test]
async fn panic_in_closure_body_becomes_rejection() {
    init_logging();
    let (mut bridge, mut rx) = recording_bridge(explode_on_first_poll);

    let (_, trigger) = bridge.render(());
    assert_eq!(trigger.call(()), Dispatch::Started(HandleId::FIRST));
    assert_eq!(next_change(&mut rx).await.status, Status::Pending);
    assert_eq!(next_change(&mut rx).await.status, Status::Rejected);

    assert_eq!(
        bridge.snapshot(),
        Some(Snapshot::Rejected(OperationError::Panicked(
            "sync boom".to_string()
        )))
    );
    assert!(!bridge.is_loading());
}

#[tokio::test]
async fn panic_while_polling_becomes_rejection() {
    init_logging();
    let (mut bridge, mut rx) = recording_bridge(explode_later);

    let (_, trigger) = bridge.render(());
    trigger.call(());
    assert_eq!(next_change(&mut rx).await.status, Status::Pending);
    assert_eq!(next_change(&mut rx).await.status, Status::Rejected);

    let snapshot = bridge.snapshot().expect("operation started");
    assert_eq!(
        snapshot.error(),
        Some(&OperationError::Panicked("async boom".to_string()))
    );
}

#[tokio::test]
async fn panic_before_future_is_returned_becomes_rejection() {
    init_logging();
    let runtime = BridgeRuntime::current().expect("inside tokio test");
    let (tx, mut rx) = unbounded_channel();
    let notifier = move |change: StateChange| {
        let _ = tx.send(change);
    };
    let mut bridge: Bridge = AsyncBridge::new(&runtime, ExplodesBeforeFuture, notifier);

    let (_, trigger) = bridge.render(());
    assert_eq!(trigger.call(()), Dispatch::Started(HandleId::FIRST));
    assert_eq!(next_change(&mut rx).await.status, Status::Pending);
    assert_eq!(next_change(&mut rx).await.status, Status::Rejected);

    assert_eq!(
        bridge.snapshot(),
        Some(Snapshot::Rejected(OperationError::Panicked(
            "eager boom".to_string()
        )))
    );

    // The bridge is usable again after the panic.
    let (_, trigger) = bridge.render(());
    assert!(matches!(trigger.call(()), Dispatch::Started(_)));
}

#[tokio::test]
async fn trigger_identity_follows_deps_and_guard() {
    init_logging();
    let runtime = BridgeRuntime::current().expect("inside tokio test");
    let mut bridge: AsyncBridge<(), u32, String, u32> = AsyncBridge::new(
        &runtime,
        |_: ()| async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<u32, String>(1)
        },
        NoopNotifier,
    );

    let (_, idle) = bridge.render(1);
    let (_, idle_again) = bridge.render(1);
    assert_eq!(idle, idle_again);

    let (_, other_deps) = bridge.render(2);
    assert_ne!(idle, other_deps);

    other_deps.call(());
    let (_, loading) = bridge.render(2);
    assert_ne!(other_deps, loading);

    // An outdated trigger still respects the guard at call time.
    assert_eq!(other_deps.call(()), Dispatch::Suppressed);

    while bridge.is_loading() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let (snapshot, settled) = bridge.render(2);
    assert_eq!(snapshot, Some(Snapshot::Resolved(1)));
    assert_ne!(loading, settled);
    assert!(settled.epoch() > loading.epoch());
}

#[tokio::test]
async fn view_reports_handle_and_counters() {
    init_logging();
    let (mut bridge, mut rx) =
        recording_bridge(|_: ()| async { Ok::<_, String>("view".to_string()) });

    let view = bridge.view();
    assert_eq!(view.snapshot, None);
    assert_eq!(view.handle, None);
    assert!(!view.is_loading);

    let (_, trigger) = bridge.render(());
    trigger.call(());
    next_change(&mut rx).await;
    next_change(&mut rx).await;

    let view = bridge.view();
    assert_eq!(view.handle, Some(HandleId::FIRST));
    assert_eq!(view.snapshot, Some(Snapshot::Resolved("view".to_string())));
    assert_eq!(view.stats.started, 1);
    assert_eq!(view.stats.stale, 0);
}
