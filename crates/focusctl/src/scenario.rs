//! Scripted scenarios and their replay against a simulated host.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use gamefocus::{
    Command, CommandSender, DEFAULT_EXIT_KEY, FocusChange, FocusConfig, FocusCoordinator,
    FocusSnapshot, KeyEvent, SimulatedHost, detached,
};
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum Step {
    /// User requests focus.
    Enable,
    /// User releases focus.
    Disable,
    /// An external system already changed focus to the given state.
    Sync(bool),
    /// Document becomes hidden.
    Hide,
    /// Document becomes visible.
    Show,
    /// Window loses focus.
    Blur,
    /// Window gains focus.
    Focus,
    /// Key event: identifier, trusted, repeat.
    Key(String, bool, bool),
    /// Trusted, non-repeating key press.
    Press(String),
    /// Move input focus into or out of the host UI region.
    HostUiFocus(bool),
    /// Acquire pointer lock.
    LockPointer,
    /// Release pointer lock.
    ReleasePointerLock,
}

impl Step {
    /// Apply the step to a coordinator and its host.
    fn apply(&self, coordinator: &FocusCoordinator, host: &SimulatedHost) {
        match self {
            Self::Enable => {
                coordinator.enable();
            }
            Self::Disable => {
                coordinator.disable();
            }
            Self::Sync(next) => {
                coordinator.sync_state(*next);
            }
            Self::Hide => host.hide(),
            Self::Show => host.show(),
            Self::Blur => host.blur(),
            Self::Focus => host.focus(),
            Self::Key(key, trusted, repeat) => host.key_down(KeyEvent {
                key: key.clone(),
                trusted: *trusted,
                repeat: *repeat,
            }),
            Self::Press(key) => host.press(key),
            Self::HostUiFocus(inside) => host.set_host_ui_focus(*inside),
            Self::LockPointer => host.acquire_pointer_lock(),
            Self::ReleasePointerLock => host.release_pointer_lock(),
        }
    }
}

/// A replayable script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Desired and actual focus before the first step.
    #[serde(default)]
    pub initial_focus: bool,
    /// Exit key; defaults to Escape.
    #[serde(default)]
    pub exit_key: Option<String>,
    /// Steps in order.
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Parse a scenario from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Coordinator configuration implied by the scenario.
    pub fn config(&self) -> FocusConfig {
        FocusConfig {
            initial_focus: self.initial_focus,
            exit_key: self
                .exit_key
                .clone()
                .unwrap_or_else(|| DEFAULT_EXIT_KEY.to_string()),
        }
    }
}

/// Something observed while replaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observed {
    /// A command reached the command sender.
    Command(Command),
    /// A listener saw a transition.
    Change(FocusChange),
}

/// An observation tagged with the index of the step that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    /// Zero-based step index.
    pub step: usize,
    /// What was observed.
    pub observed: Observed,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.observed {
            Observed::Command(cmd) => write!(f, "[{}] command {}", self.step, cmd.as_str()),
            Observed::Change(change) => write!(
                f,
                "[{}] focus={} source={}",
                self.step, change.focused, change.source
            ),
        }
    }
}

/// Result of a replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    /// Observations in the order they happened.
    pub entries: Vec<Entry>,
    /// State after the last step.
    pub final_state: FocusSnapshot,
}

impl Replay {
    /// Number of commands sent.
    pub fn commands(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.observed, Observed::Command(_)))
            .count()
    }

    /// Transitions observed by listeners.
    pub fn changes(&self) -> Vec<FocusChange> {
        self.entries
            .iter()
            .filter_map(|e| match e.observed {
                Observed::Change(c) => Some(c),
                Observed::Command(_) => None,
            })
            .collect()
    }
}

/// Run `scenario` on a fresh coordinator built from `config`.
///
/// The coordinator is private to the replay and never the process-wide one.
pub fn replay(scenario: &Scenario, config: &FocusConfig) -> Result<Replay> {
    let host = SimulatedHost::new();
    let entries = Arc::new(Mutex::new(Vec::new()));
    let current = Arc::new(AtomicUsize::new(0));

    let sender: Arc<dyn CommandSender> = {
        let entries = Arc::clone(&entries);
        let current = Arc::clone(&current);
        Arc::new(move |cmd: Command| {
            entries.lock().push(Entry {
                step: current.load(Ordering::SeqCst),
                observed: Observed::Command(cmd),
            });
        })
    };
    let coordinator = detached(host.clone(), sender, config)?;
    let subscription = {
        let entries = Arc::clone(&entries);
        let current = Arc::clone(&current);
        coordinator.on_change(move |focused, source| {
            entries.lock().push(Entry {
                step: current.load(Ordering::SeqCst),
                observed: Observed::Change(FocusChange::new(focused, source)),
            });
        })
    };

    for (index, step) in scenario.steps.iter().enumerate() {
        current.store(index, Ordering::SeqCst);
        debug!(index, ?step, "replay_step");
        step.apply(&coordinator, &host);
    }
    subscription.unsubscribe();

    let entries = entries.lock().clone();
    Ok(Replay {
        entries,
        final_state: coordinator.snapshot(),
    })
}

#[cfg(test)]
mod tests {
    use gamefocus::FocusSource;

    use super::*;

    fn run(text: &str) -> Replay {
        let scenario = Scenario::from_ron_str(text).expect("scenario parses");
        replay(&scenario, &scenario.config()).expect("replay runs")
    }

    #[test]
    fn visibility_scenario() {
        let r = run(include_str!("../scenarios/visibility.ron"));
        assert_eq!(
            r.changes(),
            vec![
                FocusChange::new(true, FocusSource::Ui),
                FocusChange::new(false, FocusSource::Visibility),
                FocusChange::new(true, FocusSource::Visibility),
                FocusChange::new(false, FocusSource::Ui),
            ]
        );
        let command_steps: Vec<usize> = r
            .entries
            .iter()
            .filter(|e| matches!(e.observed, Observed::Command(_)))
            .map(|e| e.step)
            .collect();
        assert_eq!(command_steps, vec![0, 2, 3]);
        assert_eq!(r.final_state, FocusSnapshot::default());
    }

    #[test]
    fn escape_scenario() {
        let r = run(include_str!("../scenarios/escape.ron"));
        assert_eq!(
            r.changes(),
            vec![
                FocusChange::new(true, FocusSource::Ui),
                FocusChange::new(false, FocusSource::Keyboard),
            ]
        );
        assert_eq!(r.commands(), 1);
        let exit = r
            .entries
            .iter()
            .find(|e| e.observed == Observed::Change(FocusChange::new(false, FocusSource::Keyboard)))
            .map(|e| e.step);
        assert_eq!(exit, Some(5));
        assert_eq!(r.final_state, FocusSnapshot::default());
    }

    #[test]
    fn pointer_lock_scenario() {
        let r = run(include_str!("../scenarios/pointer_lock.ron"));
        assert_eq!(
            r.changes(),
            vec![
                FocusChange::new(false, FocusSource::WindowBlur),
                FocusChange::new(true, FocusSource::WindowFocus),
                FocusChange::new(false, FocusSource::PointerLock),
                FocusChange::new(true, FocusSource::External),
            ]
        );
        assert_eq!(r.commands(), 1);
        assert_eq!(
            r.final_state,
            FocusSnapshot {
                desired: false,
                actual: true
            }
        );
    }

    #[test]
    fn command_precedes_change_within_a_step() {
        let r = run("(steps: [Enable])");
        assert_eq!(
            r.entries.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec![
                "[0] command toggle-game-focus".to_string(),
                "[0] focus=true source=ui".to_string(),
            ]
        );
    }

    #[test]
    fn config_overrides_exit_key() {
        let scenario = Scenario::from_ron_str(r#"(initial_focus: true, steps: [Press("Escape")])"#)
            .expect("scenario parses");
        let cfg = FocusConfig {
            initial_focus: true,
            exit_key: "F12".into(),
        };
        let custom = replay(&scenario, &cfg).expect("replay runs");
        assert!(custom.changes().is_empty());
        let default = replay(&scenario, &scenario.config()).expect("replay runs");
        assert_eq!(default.changes().len(), 1);
    }

    #[test]
    fn bundled_config_parses() {
        let cfg = FocusConfig::from_ron_str(include_str!("../scenarios/f12.config.ron"))
            .expect("config parses");
        assert!(cfg.initial_focus);
        assert_eq!(cfg.exit_key, "F12");
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(Scenario::from_ron_str("(steps: [], extra: 1)").is_err());
        assert!(Scenario::from_ron_str("(steps: [Teleport])").is_err());
    }
}
