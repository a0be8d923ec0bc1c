//! Commands echoed to the external input-capture target.

/// Opaque command tokens understood by the external command sink.
///
/// Only a toggle exists; the receiver infers the direction from its own state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Flip game focus on the external target.
    ToggleGameFocus,
}

impl Command {
    /// Wire name of the command.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToggleGameFocus => "toggle-game-focus",
        }
    }
}

/// Fire-and-forget sink for [`Command`]s.
pub trait CommandSender: Send + Sync {
    /// Deliver `command` to the external target.
    fn send(&self, command: Command);
}

impl<F> CommandSender for F
where
    F: Fn(Command) + Send + Sync,
{
    fn send(&self, command: Command) {
        self(command)
    }
}
