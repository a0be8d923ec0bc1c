//! Edge-triggered handlers translating host events into coordinator actions.
//!
//! Handlers hold only a weak reference to the coordinator state. Once the
//! coordinator is gone they ignore everything and report themselves dead.

use std::sync::{Arc, Weak};

use tracing::trace;

use crate::{
    coordinator::Core,
    host::{HostEvent, HostEventKind, KeyEvent, Visibility},
    source::FocusSource,
};

/// How a key-down event is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyVerdict {
    /// Synthesized by script, not hardware.
    Untrusted,
    /// Auto-repeat while the key is held.
    Repeat,
    /// Input focus is in a host menu or overlay.
    HostUi,
    /// Some key other than the exit key.
    NotExit,
    /// A genuine exit-key press aimed at the game surface.
    Exit,
}

/// Classify a key event against the rejection filters, in order.
pub(crate) fn classify_key(event: &KeyEvent, in_host_ui: bool, exit_key: &str) -> KeyVerdict {
    if !event.trusted {
        return KeyVerdict::Untrusted;
    }
    if event.repeat {
        return KeyVerdict::Repeat;
    }
    if in_host_ui {
        return KeyVerdict::HostUi;
    }
    if event.key != exit_key {
        return KeyVerdict::NotExit;
    }
    KeyVerdict::Exit
}

/// Subscribe one handler per host event kind.
pub(crate) fn attach(core: &Arc<Core>) {
    for kind in HostEventKind::ALL {
        let weak: Weak<Core> = Arc::downgrade(core);
        core.host.subscribe(
            kind,
            Box::new(move |event: &HostEvent| {
                let Some(core) = weak.upgrade() else {
                    return false;
                };
                dispatch(&core, event);
                true
            }),
        );
    }
}

/// Route a host event to its handler.
fn dispatch(core: &Core, event: &HostEvent) {
    match event {
        HostEvent::VisibilityChange => match core.host.visibility() {
            Visibility::Hidden => {
                core.suspend(FocusSource::Visibility);
            }
            Visibility::Visible => {
                core.resume(FocusSource::Visibility);
            }
        },
        HostEvent::WindowBlur => {
            core.suspend(FocusSource::WindowBlur);
        }
        HostEvent::WindowFocus => {
            core.resume(FocusSource::WindowFocus);
        }
        HostEvent::KeyDown(key) => on_key_down(core, key),
        HostEvent::PointerLockChange => {
            if core.host.pointer_lock_active() {
                trace!("pointer_lock_acquired");
                return;
            }
            core.relinquish(FocusSource::PointerLock);
        }
    }
}

/// Exit focus on a genuine exit-key press.
fn on_key_down(core: &Core, event: &KeyEvent) {
    let in_host_ui = event.trusted && !event.repeat && core.host.input_focus_in_host_ui();
    match classify_key(event, in_host_ui, &core.exit_key) {
        KeyVerdict::Exit => {
            core.relinquish(FocusSource::Keyboard);
        }
        verdict => trace!(key = %event.key, ?verdict, "key_ignored"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESC: &str = "Escape";

    #[test]
    fn exit_key_from_game_surface_exits() {
        let v = classify_key(&KeyEvent::pressed(ESC), false, ESC);
        assert_eq!(v, KeyVerdict::Exit);
    }

    #[test]
    fn filters_apply_in_order() {
        let both = KeyEvent::pressed(ESC).synthetic().repeated();
        assert_eq!(classify_key(&both, true, ESC), KeyVerdict::Untrusted);
        let rep = KeyEvent::pressed(ESC).repeated();
        assert_eq!(classify_key(&rep, true, ESC), KeyVerdict::Repeat);
        assert_eq!(
            classify_key(&KeyEvent::pressed(ESC), true, ESC),
            KeyVerdict::HostUi
        );
        assert_eq!(
            classify_key(&KeyEvent::pressed("KeyA"), false, ESC),
            KeyVerdict::NotExit
        );
    }

    #[test]
    fn exit_key_is_configurable() {
        let ev = KeyEvent::pressed("F12");
        assert_eq!(classify_key(&ev, false, "F12"), KeyVerdict::Exit);
        assert_eq!(
            classify_key(&KeyEvent::pressed(ESC), false, "F12"),
            KeyVerdict::NotExit
        );
    }
}
