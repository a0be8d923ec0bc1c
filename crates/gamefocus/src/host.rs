//! The host environment the coordinator listens to.
//!
//! A [`Host`] delivers five kinds of events and answers three queries about its
//! current state. The coordinator subscribes once per [`HostEventKind`] at
//! construction. Handlers report whether their subscriber still exists, and a
//! host may drop those that no longer do.

/// Key identifier that exits game focus unless configured otherwise.
pub const DEFAULT_EXIT_KEY: &str = "Escape";

/// Visibility of the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// The document is on screen.
    Visible,
    /// The document is hidden (background tab, minimized window).
    Hidden,
}

/// A key-down event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key identifier, e.g. `"Escape"`.
    pub key: String,
    /// False when the event was synthesized programmatically.
    pub trusted: bool,
    /// True for OS auto-repeat events while the key is held.
    pub repeat: bool,
}

impl KeyEvent {
    /// A trusted, non-repeating press of `key`.
    pub fn pressed(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            trusted: true,
            repeat: false,
        }
    }

    /// Mark the event as an auto-repeat.
    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// Mark the event as synthesized rather than produced by hardware.
    #[must_use]
    pub fn synthetic(mut self) -> Self {
        self.trusted = false;
        self
    }
}

/// Kinds of host events the coordinator subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEventKind {
    /// Key pressed.
    KeyDown,
    /// Document visibility changed.
    VisibilityChange,
    /// Window lost focus.
    WindowBlur,
    /// Window gained focus.
    WindowFocus,
    /// Pointer lock acquired or released.
    PointerLockChange,
}

impl HostEventKind {
    /// Every kind, in subscription order.
    pub const ALL: [Self; 5] = [
        Self::KeyDown,
        Self::VisibilityChange,
        Self::WindowBlur,
        Self::WindowFocus,
        Self::PointerLockChange,
    ];
}

/// A host event. Only key events carry a payload; state for the other kinds is
/// read back from the [`Host`] when the event is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Key pressed.
    KeyDown(KeyEvent),
    /// Document visibility changed.
    VisibilityChange,
    /// Window lost focus.
    WindowBlur,
    /// Window gained focus.
    WindowFocus,
    /// Pointer lock acquired or released.
    PointerLockChange,
}

impl HostEvent {
    /// The subscription kind this event is delivered under.
    pub const fn kind(&self) -> HostEventKind {
        match self {
            Self::KeyDown(_) => HostEventKind::KeyDown,
            Self::VisibilityChange => HostEventKind::VisibilityChange,
            Self::WindowBlur => HostEventKind::WindowBlur,
            Self::WindowFocus => HostEventKind::WindowFocus,
            Self::PointerLockChange => HostEventKind::PointerLockChange,
        }
    }
}

/// Callback registered against a host event stream. Returns false once its
/// subscriber is gone; the host may then discard it.
pub type HostHandler = Box<dyn Fn(&HostEvent) -> bool + Send + Sync>;

/// Event source and state queries provided by the embedding application.
pub trait Host: Send + Sync {
    /// Register `handler` for events of `kind` until it reports its subscriber
    /// gone.
    fn subscribe(&self, kind: HostEventKind, handler: HostHandler);

    /// Current document visibility.
    fn visibility(&self) -> Visibility;

    /// True while some element holds pointer lock.
    fn pointer_lock_active(&self) -> bool;

    /// True when the element with input focus lies inside the host UI region
    /// (menus, overlays) rather than the game surface.
    fn input_focus_in_host_ui(&self) -> bool;
}
