use std::io::Write;
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError, Weak};

use anyhow::Context;
use async_bridge_engine::{AsyncBridge, BridgeRuntime, Dispatch, StateChange, Trigger};
use bridge_logging::{bridge_debug, bridge_info};
use chrono::Utc;

use super::config::DemoConfig;
use super::render::{write_frame, Frame, Row, RowState};
use super::script::{default_script, spawn_script, Button};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMsg {
    /// Scripted user click.
    Click(Button),
    /// A frame was rendered and is ready for output.
    Rendered(Frame),
    /// Script finished.
    Quit,
}

type DemoBridge = AsyncBridge<(), String, String>;
type DemoTrigger = Trigger<(), String, String>;

struct Slot {
    button: Button,
    bridge: DemoBridge,
    /// Trigger handed out by the latest render, like an `onClick` prop.
    trigger: DemoTrigger,
}

/// Everything a render reads. Shared between the host thread and the
/// notifier, which re-renders synchronously on every state change.
struct Screen {
    slots: Vec<Slot>,
    renders: usize,
    msg_tx: mpsc::Sender<HostMsg>,
}

impl Screen {
    fn render(&mut self) {
        self.renders += 1;
        let rows = self
            .slots
            .iter_mut()
            .map(|slot| {
                let (snapshot, trigger) = slot.bridge.render(());
                if trigger != slot.trigger {
                    bridge_debug!("Trigger for {} rebound (epoch {})", slot.button, trigger.epoch());
                    slot.trigger = trigger;
                }
                Row {
                    button: slot.button,
                    state: RowState::from_snapshot(snapshot.as_ref()),
                }
            })
            .collect();
        let frame = Frame {
            index: self.renders,
            rendered_at: Utc::now().to_rfc3339(),
            rows,
        };
        // Sent under the screen lock, so frames arrive in render order.
        let _ = self.msg_tx.send(HostMsg::Rendered(frame));
    }

    fn trigger_for(&self, button: Button) -> Option<DemoTrigger> {
        self.slots
            .iter()
            .find(|slot| slot.button == button)
            .map(|slot| slot.trigger.clone())
    }
}

fn lock(screen: &Mutex<Screen>) -> MutexGuard<'_, Screen> {
    screen.lock().unwrap_or_else(PoisonError::into_inner)
}

fn make_slot(
    runtime: &BridgeRuntime,
    config: &DemoConfig,
    button: Button,
    screen: Weak<Mutex<Screen>>,
) -> Slot {
    let notifier = move |change: StateChange| {
        // The session may already be over while a late operation settles.
        let Some(screen) = screen.upgrade() else {
            return;
        };
        bridge_debug!("Operation {} is {}", change.handle, change.status);
        lock(&screen).render();
    };
    let mut bridge: DemoBridge = match button {
        Button::Resolve => AsyncBridge::new(
            runtime,
            |_: ()| async { Ok::<_, String>("HELLO THERE".to_string()) },
            notifier,
        ),
        Button::Reject => {
            let delay = config.reject_delay();
            AsyncBridge::new(
                runtime,
                move |_: ()| async move {
                    tokio::time::sleep(delay).await;
                    Err::<String, _>("General kenobi".to_string())
                },
                notifier,
            )
        }
        Button::Slow => {
            let delay = config.slow_delay();
            AsyncBridge::new(
                runtime,
                move |_: ()| async move {
                    tokio::time::sleep(delay).await;
                    Ok::<_, String>("You're a bold one".to_string())
                },
                notifier,
            )
        }
    };
    let (_, trigger) = bridge.render(());
    Slot {
        button,
        bridge,
        trigger,
    }
}

pub struct RunSummary {
    pub frames: Vec<Frame>,
    pub suppressed_clicks: usize,
}

/// Runs the scripted session, writing one frame per render to `out`.
pub fn run(config: &DemoConfig, out: &mut dyn Write) -> anyhow::Result<RunSummary> {
    let runtime = BridgeRuntime::with_settings(&config.runtime_settings())
        .context("starting bridge runtime")?;
    let (msg_tx, msg_rx) = mpsc::channel::<HostMsg>();
    let screen = Arc::new_cyclic(|weak: &Weak<Mutex<Screen>>| {
        let slots = Button::ALL
            .into_iter()
            .map(|button| make_slot(&runtime, config, button, weak.clone()))
            .collect();
        Mutex::new(Screen {
            slots,
            renders: 0,
            msg_tx: msg_tx.clone(),
        })
    });
    lock(&screen).render();

    let script = spawn_script(default_script(config), msg_tx);
    let mut frames = Vec::new();
    let mut suppressed_clicks = 0;
    for msg in msg_rx.iter() {
        match msg {
            HostMsg::Click(button) => {
                // Release the screen before calling: the notifier renders under it.
                let trigger = lock(&screen).trigger_for(button);
                let dispatch = trigger.map(|trigger| trigger.call(()));
                bridge_info!("Clicked {}: {:?}", button, dispatch);
                if dispatch == Some(Dispatch::Suppressed) {
                    suppressed_clicks += 1;
                }
            }
            HostMsg::Rendered(frame) => {
                write_frame(out, &frame, config.output)?;
                frames.push(frame);
            }
            HostMsg::Quit => break,
        }
    }

    if script.join().is_err() {
        anyhow::bail!("click script thread panicked");
    }
    Ok(RunSummary {
        frames,
        suppressed_clicks,
    })
}
