//! Test support utilities for gamefocus unit and integration tests.
//! These helpers are public so integration tests and downstream crates can use
//! them; they carry no platform state. Fixtures refuse to build once the
//! process-wide coordinator exists.

use std::{mem, sync::Arc};

use parking_lot::Mutex;

use crate::{
    Command, CommandSender, FocusChange, FocusConfig, FocusCoordinator, FocusSubscription,
    SimulatedHost, detached,
};

/// Command sink that records every command it receives.
#[derive(Debug, Default)]
pub struct RecordingSender {
    /// Commands in arrival order.
    sent: Mutex<Vec<Command>>,
}

impl RecordingSender {
    /// Create an empty recorder.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of commands received.
    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Commands received so far.
    pub fn sent(&self) -> Vec<Command> {
        self.sent.lock().clone()
    }
}

impl CommandSender for RecordingSender {
    fn send(&self, command: Command) {
        self.sent.lock().push(command);
    }
}

/// Listener that records every focus change it observes.
#[derive(Debug)]
pub struct Recorder {
    /// Observed changes in order.
    changes: Arc<Mutex<Vec<FocusChange>>>,
    /// Subscription backing the recorder.
    subscription: FocusSubscription,
}

impl Recorder {
    /// Subscribe a new recorder to `coordinator`.
    pub fn attach(coordinator: &FocusCoordinator) -> Self {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        let subscription = coordinator.on_change(move |focused, source| {
            sink.lock().push(FocusChange::new(focused, source));
        });
        Self {
            changes,
            subscription,
        }
    }

    /// Changes observed so far.
    pub fn changes(&self) -> Vec<FocusChange> {
        self.changes.lock().clone()
    }

    /// Most recent change.
    pub fn last(&self) -> Option<FocusChange> {
        self.changes.lock().last().copied()
    }

    /// Return and clear the observed changes.
    pub fn take(&self) -> Vec<FocusChange> {
        mem::take(&mut *self.changes.lock())
    }

    /// Stop recording.
    pub fn detach(&self) -> bool {
        self.subscription.unsubscribe()
    }
}

/// A coordinator wired to a fresh simulated host and recording sender.
pub fn fixture(initial: bool) -> (FocusCoordinator, Arc<SimulatedHost>, Arc<RecordingSender>) {
    fixture_with_config(&FocusConfig {
        initial_focus: initial,
        ..FocusConfig::default()
    })
}

/// Like [`fixture`], configured from `config`.
///
/// Panics when the process-wide coordinator already exists.
pub fn fixture_with_config(
    config: &FocusConfig,
) -> (FocusCoordinator, Arc<SimulatedHost>, Arc<RecordingSender>) {
    let host = SimulatedHost::new();
    let sender = RecordingSender::new();
    let coordinator = detached(host.clone(), sender.clone(), config)
        .expect("fixture built alongside the process-wide coordinator");
    (coordinator, host, sender)
}
