use crate::{BridgeState, Effect, Msg, StateChange, Status};

/// Pure update function: applies a message to state and returns any effects.
///
/// An accepted trigger yields `Notify(Pending)` before `Start`, so a host that
/// runs effects in order always observes the pending state before the
/// settlement of the same handle.
pub fn update<A, T, E>(
    mut state: BridgeState<T, E>,
    msg: Msg<A, T, E>,
) -> (BridgeState<T, E>, Vec<Effect<A>>) {
    let effects = match msg {
        Msg::Triggered(args) => {
            if state.is_loading() {
                state.record_suppressed();
                return (state, Vec::new());
            }
            let handle = state.install_pending();
            vec![
                Effect::Notify(StateChange {
                    handle,
                    status: Status::Pending,
                }),
                Effect::Start { handle, args },
            ]
        }
        Msg::Settled { handle, outcome } => {
            let status = match &outcome {
                Ok(_) => Status::Resolved,
                Err(_) => Status::Rejected,
            };
            if state.settle(handle, outcome) {
                vec![Effect::Notify(StateChange { handle, status })]
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}
