//! Focus transition triggers and change records.

use std::fmt;

/// The trigger that caused a focus transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusSource {
    /// Explicit enable/disable request.
    Ui,
    /// Document visibility changed.
    Visibility,
    /// The host window lost focus.
    WindowBlur,
    /// The host window regained focus.
    WindowFocus,
    /// The exit key was pressed.
    Keyboard,
    /// Pointer lock was released.
    PointerLock,
    /// Another system changed focus; local state is only being reconciled.
    External,
}

impl FocusSource {
    /// Every source, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Ui,
        Self::Visibility,
        Self::WindowBlur,
        Self::WindowFocus,
        Self::Keyboard,
        Self::PointerLock,
        Self::External,
    ];

    /// Stable tag delivered to observers.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ui => "ui",
            Self::Visibility => "visibility",
            Self::WindowBlur => "window-blur",
            Self::WindowFocus => "window-focus",
            Self::Keyboard => "keyboard",
            Self::PointerLock => "pointer-lock",
            Self::External => "external",
        }
    }
}

impl fmt::Display for FocusSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single observed transition of the active focus state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    /// New active focus state.
    pub focused: bool,
    /// What caused the change.
    pub source: FocusSource,
}

impl FocusChange {
    /// Shorthand constructor.
    pub const fn new(focused: bool, source: FocusSource) -> Self {
        Self { focused, source }
    }
}
