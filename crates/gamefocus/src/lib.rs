//! Game-focus arbitration.
//!
//! Decides whether an emulated input device exclusively receives keyboard and
//! pointer input ("game focus") or whether the surrounding host UI does. Five
//! asynchronous signals feed one state machine:
//! - explicit enable/disable requests
//! - document visibility changes
//! - window blur and focus
//! - the exit key (Escape by default)
//! - loss of pointer lock
//!
//! The machine tracks two booleans. *Desired* focus is the last thing the user
//! asked for; *actual* focus is what is in effect. Transient interruptions
//! (hidden document, blurred window) drop actual focus but keep the intent, so
//! focus comes back on its own when the interruption ends. Leaving through the
//! device itself (exit key, pointer-lock release) clears the intent.
//!
//! Transitions the coordinator decides on its own are echoed to a
//! [`CommandSender`] as an opaque [`Command::ToggleGameFocus`]. Transitions
//! imposed from outside are not, since the external target already changed.
//! Every transition is reported to [`FocusCoordinator::on_change`] observers with
//! its [`FocusSource`].
//!
//! The public surface:
//! - [`FocusCoordinator`]: the state machine
//! - [`initialize`], [`install`] and [`instance`]: the process-wide coordinator,
//!   the only way to obtain a [`FocusCoordinator`]
//! - [`Host`] and [`CommandSender`]: the two collaborator seams
//! - [`SimulatedHost`]: an in-memory host for headless use and tests

mod adapter;
mod command;
mod config;
mod coordinator;
mod error;
mod global;
mod host;
mod sim;
mod source;
pub mod test_support;

pub use command::{Command, CommandSender};
pub use config::FocusConfig;
pub use coordinator::{FocusCoordinator, FocusSnapshot, FocusSubscription};
pub use error::{Error, Result};
pub use global::{detached, initialize, install, install_with_config, instance, is_initialized};
pub use host::{
    DEFAULT_EXIT_KEY, Host, HostEvent, HostEventKind, HostHandler, KeyEvent, Visibility,
};
pub use sim::{SimState, SimulatedHost};
pub use source::{FocusChange, FocusSource};
