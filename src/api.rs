// Public API surface for the host runtime
// Thin forwarding functions over the process-wide BridgeContext plus the
// extern "C" exports consumed through the C ABI.

use std::ffi::{c_char, c_void};

use log::error;

use crate::context::BRIDGE;
use crate::engine::{ExitFn, InitFn, RunFn};
use crate::error::{log_bridge_error, BridgeError};
use crate::events::{EventHandlerFn, EventIdFlags, EventType};
use crate::status::Status;

/// Version of the bridge library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// Rust-level wrappers over the process-wide context

/// Install the thread lifecycle hooks with the engine (one-time,
/// process-wide). Repeated calls always forward the same two pointers.
///
/// # Errors
/// - Engine rejected the installation
/// - Lock poisoning on the bridge context
pub fn install_thread_callbacks() -> Result<(), BridgeError> {
    BRIDGE.install_thread_callbacks()
}

/// Register the calling thread with the managed runtime.
///
/// # Errors
/// - Runtime refused the registration (no retry is attempted)
/// - Lock poisoning on the bridge context
pub fn on_thread_start() -> Result<(), BridgeError> {
    BRIDGE.on_thread_start()
}

/// Unregister the calling thread from the managed runtime.
///
/// # Errors
/// - Runtime refused the unregistration
/// - Lock poisoning on the bridge context
pub fn on_thread_stop() -> Result<(), BridgeError> {
    BRIDGE.on_thread_stop()
}

/// Register an event handler with the engine and narrow its delivered
/// sub-IDs. Two-step and non-transactional; see
/// [`crate::context::BridgeContext::add_event_handler`].
///
/// # Errors
/// - Engine rejected the handler (flag step skipped)
/// - Engine rejected the flag update (handler remains registered)
/// - Lock poisoning on the bridge context
pub fn add_event_handler(
    event_type: EventType,
    handler: EventHandlerFn,
    add_flags: EventIdFlags,
    remove_flags: EventIdFlags,
) -> Result<(), BridgeError> {
    BRIDGE.add_event_handler(event_type, handler, add_flags, remove_flags)
}

/// Run the engine's blocking main loop. Returns only after full shutdown;
/// there is no failure channel beyond the callbacks themselves.
pub fn execute(argc: u32, argv: *mut *mut c_char, init: InitFn, run: RunFn, exit: ExitFn) {
    if let Err(err) = BRIDGE.execute(argc, argv, init, run, exit) {
        // The entry point has no status to return; the error is already
        // logged with its code
        error!("execute aborted before reaching the engine: {}", err);
    }
}

// extern "C" exports
//
// These are the symbols the host runtime (and the engine, for the two
// thread hooks) binds against when this crate is loaded as a cdylib.

/// Initialize logging from the environment (`RUST_LOG`).
#[no_mangle]
pub extern "C" fn bridge_init_logging() {
    crate::init_logging();
}

/// Thread-start hook handed to the engine; runs on the engine worker thread
/// itself and registers it with the managed runtime.
#[no_mangle]
pub extern "C" fn bridge_thread_start(_context: *mut c_void) -> Status {
    Status::from_result(&BRIDGE.on_thread_start())
}

/// Thread-stop hook handed to the engine; symmetric unregistration.
#[no_mangle]
pub extern "C" fn bridge_thread_stop(_context: *mut c_void) -> Status {
    Status::from_result(&BRIDGE.on_thread_stop())
}

/// Install both thread hooks with the engine.
#[no_mangle]
pub extern "C" fn bridge_install_thread_callbacks() -> Status {
    Status::from_result(&BRIDGE.install_thread_callbacks())
}

/// Register `handler` for `event_type` and narrow its delivered sub-IDs.
/// Returns a single combined status that does not distinguish which of the
/// two steps failed.
#[no_mangle]
pub extern "C" fn bridge_add_event_handler(
    event_type: u32,
    handler: Option<EventHandlerFn>,
    add_flags: u32,
    remove_flags: u32,
) -> Status {
    let Some(handler) = handler else {
        let err = BridgeError::NullCallback { parameter: "handler" };
        log_bridge_error(&err, "bridge_add_event_handler");
        return Status::Failure;
    };
    Status::from_result(&BRIDGE.add_event_handler(
        EventType(event_type),
        handler,
        EventIdFlags(add_flags),
        EventIdFlags(remove_flags),
    ))
}

/// Blocking execution entry point; forwards `argc`/`argv` and the three
/// lifecycle callbacks to the engine main loop.
#[no_mangle]
pub extern "C" fn bridge_execute(
    argc: u32,
    argv: *mut *mut c_char,
    init: Option<InitFn>,
    run: Option<RunFn>,
    exit: Option<ExitFn>,
) {
    let (Some(init), Some(run), Some(exit)) = (init, run, exit) else {
        let err = BridgeError::NullCallback {
            parameter: "init/run/exit",
        };
        log_bridge_error(&err, "bridge_execute");
        return;
    };
    execute(argc, argv, init, run, exit);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_null_handler_is_rejected() {
        let status = bridge_add_event_handler(0, None, u32::MAX, 0);
        assert_eq!(status, Status::Failure);
    }

    #[cfg(not(feature = "native-engine"))]
    #[test]
    fn test_global_thread_hooks_round_trip() {
        // The default build routes the hooks to the global stub runtime;
        // registration state is keyed off this test's own thread
        assert_eq!(bridge_thread_start(std::ptr::null_mut()), Status::Success);
        assert_eq!(bridge_thread_stop(std::ptr::null_mut()), Status::Success);
    }
}
