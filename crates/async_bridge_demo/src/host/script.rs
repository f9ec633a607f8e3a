use std::fmt;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde::Serialize;

use super::app::HostMsg;
use super::config::DemoConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    /// Resolves right away.
    Resolve,
    /// Rejects after `reject_delay_ms`.
    Reject,
    /// Resolves after `slow_delay_ms`.
    Slow,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Resolve, Button::Reject, Button::Slow];
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Button::Resolve => write!(f, "resolve"),
            Button::Reject => write!(f, "reject"),
            Button::Slow => write!(f, "slow"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Click(Button),
    Wait(Duration),
}

/// Clicks each button once, then clicks the slow one again while it is pending.
pub fn default_script(config: &DemoConfig) -> Vec<Step> {
    let margin = Duration::from_millis(config.settle_margin_ms);
    let gap = Duration::from_millis(config.double_click_gap_ms);
    vec![
        Step::Click(Button::Resolve),
        Step::Wait(margin),
        Step::Click(Button::Reject),
        Step::Wait(config.reject_delay() + margin),
        Step::Click(Button::Slow),
        Step::Wait(gap),
        Step::Click(Button::Slow),
        Step::Wait(config.slow_delay().saturating_sub(gap) + margin),
    ]
}

/// Plays `steps` on a background thread and sends `Quit` when done.
pub fn spawn_script(steps: Vec<Step>, msg_tx: mpsc::Sender<HostMsg>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for step in steps {
            match step {
                Step::Click(button) => {
                    if msg_tx.send(HostMsg::Click(button)).is_err() {
                        return;
                    }
                }
                Step::Wait(duration) => thread::sleep(duration),
            }
        }
        let _ = msg_tx.send(HostMsg::Quit);
    })
}
