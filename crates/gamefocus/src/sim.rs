//! An in-memory [`Host`] for headless embedding, replay and tests.
//!
//! Driver methods update the simulated document/window state first and then
//! dispatch the matching event, mirroring the order a real host uses.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;
use tracing::trace;

use crate::host::{Host, HostEvent, HostEventKind, HostHandler, KeyEvent, Visibility};

/// Shared handler as stored by the simulator.
type SharedHandler = Arc<dyn Fn(&HostEvent) -> bool + Send + Sync>;

/// A registered handler.
struct Registration {
    /// Registration key, unique per host.
    id: u64,
    /// Event kind the handler listens to.
    kind: HostEventKind,
    /// The handler itself.
    handler: SharedHandler,
}

/// Observable state of the simulated host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimState {
    /// Document visibility.
    pub visibility: Visibility,
    /// Whether pointer lock is held.
    pub pointer_locked: bool,
    /// Whether input focus is inside the host UI region.
    pub host_ui_focus: bool,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            visibility: Visibility::Visible,
            pointer_locked: false,
            host_ui_focus: false,
        }
    }
}

/// Simulated host document and window.
#[derive(Default)]
pub struct SimulatedHost {
    /// Current simulated state.
    state: Mutex<SimState>,
    /// Registered handlers in subscription order.
    handlers: Mutex<Vec<Registration>>,
    /// Next registration id.
    next_id: AtomicU64,
}

impl fmt::Debug for SimulatedHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedHost")
            .field("state", &*self.state.lock())
            .field("handlers", &self.handlers.lock().len())
            .finish()
    }
}

impl SimulatedHost {
    /// A visible document, no pointer lock, focus on the game surface.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Current simulated state.
    pub fn state(&self) -> SimState {
        *self.state.lock()
    }

    /// Number of handlers registered for `kind`.
    pub fn handler_count(&self, kind: HostEventKind) -> usize {
        self.handlers.lock().iter().filter(|r| r.kind == kind).count()
    }

    /// Deliver `event` to every handler registered for its kind.
    ///
    /// Handlers are snapshotted first so they may drive the simulator again.
    /// Handlers that report their subscriber gone are removed afterwards.
    pub fn emit(&self, event: &HostEvent) {
        let kind = event.kind();
        let targets: Vec<(u64, SharedHandler)> = self
            .handlers
            .lock()
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| (r.id, Arc::clone(&r.handler)))
            .collect();
        trace!(?kind, handlers = targets.len(), "sim_emit");
        let dead: Vec<u64> = targets
            .into_iter()
            .filter_map(|(id, handler)| (!handler(event)).then_some(id))
            .collect();
        if !dead.is_empty() {
            self.handlers.lock().retain(|r| !dead.contains(&r.id));
            trace!(?kind, pruned = dead.len(), "sim_prune");
        }
    }

    /// Hide the document.
    pub fn hide(&self) {
        self.state.lock().visibility = Visibility::Hidden;
        self.emit(&HostEvent::VisibilityChange);
    }

    /// Show the document.
    pub fn show(&self) {
        self.state.lock().visibility = Visibility::Visible;
        self.emit(&HostEvent::VisibilityChange);
    }

    /// The window loses focus.
    pub fn blur(&self) {
        self.emit(&HostEvent::WindowBlur);
    }

    /// The window gains focus.
    pub fn focus(&self) {
        self.emit(&HostEvent::WindowFocus);
    }

    /// Deliver a key-down event.
    pub fn key_down(&self, event: KeyEvent) {
        self.emit(&HostEvent::KeyDown(event));
    }

    /// A trusted, non-repeating press of `key`.
    pub fn press(&self, key: &str) {
        self.key_down(KeyEvent::pressed(key));
    }

    /// Move input focus into (`true`) or out of the host UI region.
    pub fn set_host_ui_focus(&self, inside: bool) {
        self.state.lock().host_ui_focus = inside;
    }

    /// Acquire pointer lock.
    pub fn acquire_pointer_lock(&self) {
        self.state.lock().pointer_locked = true;
        self.emit(&HostEvent::PointerLockChange);
    }

    /// Release pointer lock.
    pub fn release_pointer_lock(&self) {
        self.state.lock().pointer_locked = false;
        self.emit(&HostEvent::PointerLockChange);
    }
}

impl Host for SimulatedHost {
    fn subscribe(&self, kind: HostEventKind, handler: HostHandler) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers.lock().push(Registration {
            id,
            kind,
            handler: Arc::from(handler),
        });
    }

    fn visibility(&self) -> Visibility {
        self.state.lock().visibility
    }

    fn pointer_lock_active(&self) -> bool {
        self.state.lock().pointer_locked
    }

    fn input_focus_in_host_ui(&self) -> bool {
        self.state.lock().host_ui_focus
    }
}
