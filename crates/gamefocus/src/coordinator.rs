//! The focus state machine and its public handle.

use std::{cell::RefCell, fmt, sync::Arc};

use eventbus::{Bus, Subscription};
use parking_lot::ReentrantMutex;
use tracing::{debug, trace};

use crate::{
    adapter,
    command::{Command, CommandSender},
    config::FocusConfig,
    host::Host,
    source::{FocusChange, FocusSource},
};

/// Handle returned by [`FocusCoordinator::on_change`].
pub type FocusSubscription = Subscription<FocusChange>;

/// Desired and actual focus at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusSnapshot {
    /// Last focus state the user asked for.
    pub desired: bool,
    /// Focus state currently in effect.
    pub actual: bool,
}

/// Whether a transition is echoed to the command sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Echo {
    /// Send the toggle command.
    Send,
    /// The external target already changed; stay silent.
    Skip,
}

/// State shared between the public handle and the host adapters.
pub(crate) struct Core {
    /// Guards the full check + transition + notify sequence. Re-entrant so
    /// listeners may call back into the coordinator.
    state: ReentrantMutex<RefCell<FocusSnapshot>>,
    /// Change observers.
    listeners: Bus<FocusChange>,
    /// External command sink.
    sender: Arc<dyn CommandSender>,
    /// Host queried by the adapters.
    pub(crate) host: Arc<dyn Host>,
    /// Key identifier that exits focus.
    pub(crate) exit_key: String,
}

impl Core {
    /// Current desired/actual pair.
    pub(crate) fn snapshot(&self) -> FocusSnapshot {
        *self.state.lock().borrow()
    }

    /// Run `f` with the transition lock held, so a guard check and the
    /// transition it gates are not interleaved with another thread.
    pub(crate) fn locked<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
        let _guard = self.state.lock();
        f(self)
    }

    /// Record a new user intent.
    pub(crate) fn set_desired(&self, desired: bool) {
        self.state.lock().borrow_mut().desired = desired;
    }

    /// The single place `actual` changes. Returns true if a transition happened.
    pub(crate) fn set_state(&self, next: bool, echo: Echo, source: FocusSource) -> bool {
        let guard = self.state.lock();
        {
            let mut state = guard.borrow_mut();
            if state.actual == next {
                trace!(actual = next, source = %source, "focus_unchanged");
                return false;
            }
            state.actual = next;
        }
        debug!(actual = next, source = %source, echo = ?echo, "focus_transition");
        if echo == Echo::Send {
            self.sender.send(Command::ToggleGameFocus);
        }
        let delivery = self.listeners.notify(&FocusChange::new(next, source));
        trace!(
            delivered = delivery.delivered,
            panicked = delivery.panicked,
            "focus_notified"
        );
        drop(guard);
        true
    }

    /// Drop active focus because of a transient interruption. Intent survives.
    pub(crate) fn suspend(&self, source: FocusSource) -> bool {
        self.locked(|core| core.snapshot().actual && core.set_state(false, Echo::Skip, source))
    }

    /// Restore focus after an interruption if the user still wants it.
    pub(crate) fn resume(&self, source: FocusSource) -> bool {
        self.locked(|core| {
            let s = core.snapshot();
            s.desired && !s.actual && core.set_state(true, Echo::Send, source)
        })
    }

    /// The user left focus through the device itself; forget the intent.
    pub(crate) fn relinquish(&self, source: FocusSource) -> bool {
        self.locked(|core| {
            if !core.snapshot().actual {
                return false;
            }
            core.set_desired(false);
            core.set_state(false, Echo::Skip, source)
        })
    }
}

/// Arbitrates whether the emulated device or the host UI receives input.
///
/// Obtained through [`crate::install`] or [`crate::initialize`]. Cloning yields
/// another handle to the same coordinator.
#[derive(Clone)]
pub struct FocusCoordinator {
    /// Shared state.
    core: Arc<Core>,
}

impl fmt::Debug for FocusCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusCoordinator")
            .field("state", &self.core.snapshot())
            .field("listeners", &self.core.listeners.len())
            .field("exit_key", &self.core.exit_key)
            .finish_non_exhaustive()
    }
}

impl FocusCoordinator {
    /// Create a coordinator with `initial` as both desired and actual focus, and
    /// subscribe it to every host event stream.
    pub(crate) fn new(
        host: Arc<dyn Host>,
        sender: Arc<dyn CommandSender>,
        initial: bool,
    ) -> Self {
        Self::with_config(
            host,
            sender,
            &FocusConfig {
                initial_focus: initial,
                ..FocusConfig::default()
            },
        )
    }

    /// Create a coordinator from a [`FocusConfig`].
    pub(crate) fn with_config(
        host: Arc<dyn Host>,
        sender: Arc<dyn CommandSender>,
        config: &FocusConfig,
    ) -> Self {
        let initial = config.initial_focus;
        let core = Arc::new(Core {
            state: ReentrantMutex::new(RefCell::new(FocusSnapshot {
                desired: initial,
                actual: initial,
            })),
            listeners: Bus::new(),
            sender,
            host,
            exit_key: config.exit_key.clone(),
        });
        adapter::attach(&core);
        debug!(initial, exit_key = %config.exit_key, "focus_coordinator_created");
        Self { core }
    }

    /// Request game focus. Echoes the toggle command if focus changes.
    pub fn enable(&self) -> bool {
        self.core.locked(|core| {
            core.set_desired(true);
            core.set_state(true, Echo::Send, FocusSource::Ui)
        })
    }

    /// Release game focus. Echoes the toggle command if focus changes.
    pub fn disable(&self) -> bool {
        self.core.locked(|core| {
            core.set_desired(false);
            core.set_state(false, Echo::Send, FocusSource::Ui)
        })
    }

    /// Reconcile local state after an external system already changed focus.
    /// Never echoes a command and leaves the desired state alone.
    pub fn sync_state(&self, next: bool) -> bool {
        self.sync_state_from(next, FocusSource::External)
    }

    /// Like [`Self::sync_state`] with an explicit source tag.
    pub fn sync_state_from(&self, next: bool, source: FocusSource) -> bool {
        self.core.set_state(next, Echo::Skip, source)
    }

    /// Active focus state.
    pub fn is_enabled(&self) -> bool {
        self.core.snapshot().actual
    }

    /// Last user-requested focus state.
    pub fn is_desired(&self) -> bool {
        self.core.snapshot().desired
    }

    /// Desired and actual focus together.
    pub fn snapshot(&self) -> FocusSnapshot {
        self.core.snapshot()
    }

    /// Observe every transition of the active focus state.
    pub fn on_change<F>(&self, callback: F) -> FocusSubscription
    where
        F: Fn(bool, FocusSource) + Send + Sync + 'static,
    {
        self.core
            .listeners
            .subscribe(move |change: &FocusChange| callback(change.focused, change.source))
    }

    /// Number of registered change observers.
    pub fn listener_count(&self) -> usize {
        self.core.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc, OnceLock,
            atomic::{AtomicUsize, Ordering},
        },
        thread,
    };

    use super::*;
    use crate::test_support::{Recorder, fixture};

    #[test]
    fn starts_from_initial_state() {
        let (coord, _host, sender) = fixture(true);
        assert_eq!(
            coord.snapshot(),
            FocusSnapshot {
                desired: true,
                actual: true
            }
        );
        assert_eq!(sender.count(), 0);
        let (coord, _host, _sender) = fixture(false);
        assert!(!coord.is_enabled());
        assert!(!coord.is_desired());
    }

    #[test]
    fn enable_then_disable() {
        let (coord, _host, sender) = fixture(false);
        let rec = Recorder::attach(&coord);
        assert!(coord.enable());
        assert!(coord.disable());
        assert_eq!(coord.snapshot(), FocusSnapshot::default());
        assert_eq!(
            rec.changes(),
            vec![
                FocusChange::new(true, FocusSource::Ui),
                FocusChange::new(false, FocusSource::Ui)
            ]
        );
        assert_eq!(sender.count(), 2);
    }

    #[test]
    fn enable_is_idempotent() {
        let (coord, _host, sender) = fixture(false);
        coord.enable();
        let rec = Recorder::attach(&coord);
        assert!(!coord.enable());
        assert!(rec.changes().is_empty());
        assert_eq!(sender.count(), 1);
    }

    #[test]
    fn disable_when_off_still_clears_intent() {
        let (coord, host, sender) = fixture(false);
        coord.enable();
        host.hide();
        assert!(coord.is_desired());
        assert!(!coord.disable());
        assert!(!coord.is_desired());
        host.show();
        assert!(!coord.is_enabled());
        assert_eq!(sender.count(), 1);
    }

    #[test]
    fn sync_state_does_not_echo_or_touch_intent() {
        let (coord, _host, sender) = fixture(false);
        let rec = Recorder::attach(&coord);
        assert!(coord.sync_state(true));
        assert!(coord.is_enabled());
        assert!(!coord.is_desired());
        assert!(!coord.sync_state(true));
        assert_eq!(sender.count(), 0);
        assert_eq!(
            rec.changes(),
            vec![FocusChange::new(true, FocusSource::External)]
        );
        coord.sync_state_from(false, FocusSource::Keyboard);
        assert_eq!(rec.last(), Some(FocusChange::new(false, FocusSource::Keyboard)));
    }

    #[test]
    fn listener_sees_committed_state() {
        let (coord, _host, _sender) = fixture(false);
        let seen = Arc::new(OnceLock::new());
        let inner = coord.clone();
        let s = seen.clone();
        let _sub = coord.on_change(move |focused, _| {
            s.set((focused, inner.is_enabled(), inner.is_desired())).ok();
        });
        coord.enable();
        assert_eq!(seen.get(), Some(&(true, true, true)));
    }

    #[test]
    fn reentrant_listener_calls_are_allowed() {
        let (coord, _host, sender) = fixture(false);
        let inner = coord.clone();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let _sub = coord.on_change(move |focused, _| {
            c.fetch_add(1, Ordering::SeqCst);
            if focused {
                inner.disable();
            }
        });
        coord.enable();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!coord.is_enabled());
        assert!(!coord.is_desired());
        assert_eq!(sender.count(), 2);
    }

    #[test]
    fn panicking_listener_is_isolated() {
        let (coord, _host, _sender) = fixture(false);
        let _bad = coord.on_change(|_, _| panic!("listener failure"));
        let rec = Recorder::attach(&coord);
        coord.enable();
        assert!(coord.is_enabled());
        assert_eq!(rec.changes(), vec![FocusChange::new(true, FocusSource::Ui)]);
        coord.disable();
        assert_eq!(rec.changes().len(), 2);
    }

    #[test]
    fn transitions_are_serialized_across_threads() {
        let (coord, _host, sender) = fixture(false);
        let rec = Recorder::attach(&coord);
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let c = coord.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        if i % 2 == 0 {
                            c.enable();
                        } else {
                            c.disable();
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("worker thread");
        }
        let changes = rec.changes();
        assert_eq!(changes.len(), sender.count());
        for pair in changes.windows(2) {
            assert_ne!(pair[0].focused, pair[1].focused);
        }
        assert_eq!(changes.last().map(|c| c.focused), Some(coord.is_enabled()));
    }
}
