//! Engine seam: the four C calls the bridge forwards into.
//!
//! Backends implement [`EngineApi`] one C call per method. The native backend
//! links the real engine library (feature `native-engine`); the stub backend
//! is always compiled so the bridge can be exercised on any host.

use std::ffi::{c_char, c_void};
use std::sync::Arc;

use crate::events::{EventHandlerFn, EventIdFlags, EventType};
use crate::status::Status;

/// Thread lifecycle hook, invoked by the engine on the worker thread itself.
pub type ThreadHookFn = extern "C" fn(context: *mut c_void) -> Status;

/// One-shot bootstrap callback invoked before the engine's main loop.
pub type InitFn = extern "C" fn() -> Status;

/// Per-frame callback; returning `Failure` asks the engine to stop.
pub type RunFn = extern "C" fn() -> Status;

/// Shutdown callback invoked once after the main loop ends.
pub type ExitFn = extern "C" fn();

/// Trait implemented by engine backends.
///
/// Each method mirrors one engine C call; implementations must not add
/// retries or bookkeeping of their own, so the bridge's pass-through
/// semantics hold regardless of backend.
pub trait EngineApi: Send + Sync {
    /// Install the process-wide thread lifecycle hooks.
    ///
    /// The engine invokes `start` on every worker thread it spawns and
    /// `stop` before retiring it, passing `context` through unmodified.
    fn set_thread_callbacks(
        &self,
        start: ThreadHookFn,
        stop: ThreadHookFn,
        context: *mut c_void,
    ) -> Status;

    /// Register `handler` for all events of `event_type`.
    fn add_event_handler(&self, event_type: EventType, handler: EventHandlerFn) -> Status;

    /// Narrow the sub-IDs delivered to `handler` for `event_type` with the
    /// two masks. The engine's object-type slot is always passed as none.
    fn set_handler_id_flags(
        &self,
        handler: EventHandlerFn,
        event_type: EventType,
        add_flags: EventIdFlags,
        remove_flags: EventIdFlags,
    ) -> Status;

    /// Blocking main loop: invokes `init` once, `run` repeatedly until the
    /// engine terminates, then `exit` once. Does not return until the engine
    /// has fully shut down. `argc`/`argv` are passed through verbatim.
    fn execute(&self, argc: u32, argv: *mut *mut c_char, init: InitFn, run: RunFn, exit: ExitFn);
}

cfg_if::cfg_if! {
    if #[cfg(feature = "native-engine")] {
        mod native;
        pub use native::NativeEngine;
    }
}

mod stub;
pub use stub::StubEngine;

cfg_if::cfg_if! {
    if #[cfg(feature = "native-engine")] {
        /// Default engine backend for the process-wide bridge context.
        pub(crate) fn default_engine() -> Arc<dyn EngineApi> {
            Arc::new(NativeEngine::new())
        }
    } else {
        /// Default engine backend for the process-wide bridge context.
        pub(crate) fn default_engine() -> Arc<dyn EngineApi> {
            Arc::new(StubEngine::new())
        }
    }
}
