//! Property tests over arbitrary interleavings of host events and API calls.

use gamefocus::{
    KeyEvent,
    test_support::{Recorder, fixture},
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Enable,
    Disable,
    Hide,
    Show,
    Blur,
    Focus,
    Key { escape: bool, trusted: bool, repeat: bool },
    HostUi(bool),
    LockPointer,
    ReleasePointerLock,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Enable),
        Just(Step::Disable),
        Just(Step::Hide),
        Just(Step::Show),
        Just(Step::Blur),
        Just(Step::Focus),
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(escape, trusted, repeat)| {
            Step::Key {
                escape,
                trusted,
                repeat,
            }
        }),
        any::<bool>().prop_map(Step::HostUi),
        Just(Step::LockPointer),
        Just(Step::ReleasePointerLock),
    ]
}

proptest! {
    #[test]
    fn transitions_respect_intent_and_echo_policy(
        initial in any::<bool>(),
        steps in prop::collection::vec(step(), 0..64),
    ) {
        let (coord, host, sender) = fixture(initial);
        let rec = Recorder::attach(&coord);
        let mut before = coord.snapshot();
        for s in &steps {
            let sent_before = sender.count();
            match s {
                Step::Enable => {
                    coord.enable();
                }
                Step::Disable => {
                    coord.disable();
                }
                Step::Hide => host.hide(),
                Step::Show => host.show(),
                Step::Blur => host.blur(),
                Step::Focus => host.focus(),
                Step::Key { escape, trusted, repeat } => host.key_down(KeyEvent {
                    key: if *escape { "Escape".into() } else { "KeyA".into() },
                    trusted: *trusted,
                    repeat: *repeat,
                }),
                Step::HostUi(inside) => host.set_host_ui_focus(*inside),
                Step::LockPointer => host.acquire_pointer_lock(),
                Step::ReleasePointerLock => host.release_pointer_lock(),
            }
            let after = coord.snapshot();
            prop_assert!(!after.actual || after.desired, "{:?} after {:?}", after, s);

            let changed = before.actual != after.actual;
            let notes = rec.take();
            if changed {
                prop_assert_eq!(notes.len(), 1);
                prop_assert_eq!(notes[0].focused, after.actual);
            } else {
                prop_assert!(notes.is_empty());
            }

            let echoed = sender.count() - sent_before;
            let expect_echo = changed
                && matches!(s, Step::Enable | Step::Disable | Step::Show | Step::Focus);
            prop_assert_eq!(echoed, usize::from(expect_echo), "{:?}", s);
            before = after;
        }
    }
}
