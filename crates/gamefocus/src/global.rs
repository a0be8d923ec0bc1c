//! The process-wide coordinator.
//!
//! Construction and access are separate: [`install`] creates the instance and
//! refuses to run twice, [`instance`] fetches it and refuses to run first.
//! [`initialize`] is the forgiving form used at startup paths that may run more
//! than once. These are the only public ways to obtain a coordinator.

use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::{CommandSender, Error, FocusConfig, FocusCoordinator, Host, Result};

/// The single process-wide coordinator.
static INSTANCE: OnceLock<FocusCoordinator> = OnceLock::new();

/// Create the process-wide coordinator, or return the existing one unchanged.
///
/// Arguments are dropped without effect when an instance already exists.
pub fn initialize(
    host: Arc<dyn Host>,
    sender: Arc<dyn CommandSender>,
    initial: bool,
) -> &'static FocusCoordinator {
    INSTANCE.get_or_init(|| {
        debug!(initial, "focus_coordinator_initialize");
        FocusCoordinator::new(host, sender, initial)
    })
}

/// Create the process-wide coordinator. Fails if one already exists.
pub fn install(
    host: Arc<dyn Host>,
    sender: Arc<dyn CommandSender>,
    initial: bool,
) -> Result<&'static FocusCoordinator> {
    install_with_config(
        host,
        sender,
        &FocusConfig {
            initial_focus: initial,
            ..FocusConfig::default()
        },
    )
}

/// Like [`install`], taking the initial state and exit key from `config`.
pub fn install_with_config(
    host: Arc<dyn Host>,
    sender: Arc<dyn CommandSender>,
    config: &FocusConfig,
) -> Result<&'static FocusCoordinator> {
    let mut created = false;
    let coordinator = INSTANCE.get_or_init(|| {
        created = true;
        FocusCoordinator::with_config(host, sender, config)
    });
    if created {
        debug!(initial = config.initial_focus, "focus_coordinator_installed");
        Ok(coordinator)
    } else {
        Err(Error::AlreadyInitialized)
    }
}

/// The process-wide coordinator. Fails before [`install`] or [`initialize`].
pub fn instance() -> Result<&'static FocusCoordinator> {
    INSTANCE.get().ok_or(Error::NotInitialized)
}

/// True once the process-wide coordinator exists.
pub fn is_initialized() -> bool {
    INSTANCE.get().is_some()
}

/// Build a throwaway coordinator outside the process-wide slot.
///
/// Scaffolding for test fixtures and offline scenario replay. Refused with
/// [`Error::AlreadyInitialized`] once the process-wide coordinator exists, so a
/// second live coordinator never shares a host with it.
#[doc(hidden)]
pub fn detached(
    host: Arc<dyn Host>,
    sender: Arc<dyn CommandSender>,
    config: &FocusConfig,
) -> Result<FocusCoordinator> {
    if is_initialized() {
        debug!("detached_coordinator_refused");
        return Err(Error::AlreadyInitialized);
    }
    Ok(FocusCoordinator::with_config(host, sender, config))
}
