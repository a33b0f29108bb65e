//! Engine backend linked against the real engine shared library.
//!
//! Pure pass-through: every method is a single C call with no state on this
//! side. Symbols are resolved at load time; see `build.rs` for the link
//! directives.

use std::ffi::{c_char, c_void};

use log::trace;

use super::{EngineApi, ExitFn, InitFn, RunFn, ThreadHookFn};
use crate::events::{EventHandlerFn, EventIdFlags, EventType};
use crate::status::Status;

// Engine C ABI.
extern "C" {
    fn engine_thread_set_callbacks(
        start: ThreadHookFn,
        stop: ThreadHookFn,
        context: *mut c_void,
    ) -> Status;

    fn engine_event_add_handler(event_type: u32, handler: EventHandlerFn) -> Status;

    fn engine_event_set_handler_id_flags(
        handler: EventHandlerFn,
        event_type: u32,
        object_type: u32,
        add_flags: u32,
        remove_flags: u32,
    ) -> Status;

    fn engine_execute(
        argc: u32,
        argv: *mut *mut c_char,
        init: InitFn,
        run: RunFn,
        exit: ExitFn,
    );
}

/// Value of the engine's object-type filter slot meaning "no object type".
const OBJECT_TYPE_NONE: u32 = u32::MAX;

/// Engine backend calling straight into the engine C API.
#[derive(Default)]
pub struct NativeEngine {
    _unit: (),
}

impl NativeEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EngineApi for NativeEngine {
    fn set_thread_callbacks(
        &self,
        start: ThreadHookFn,
        stop: ThreadHookFn,
        context: *mut c_void,
    ) -> Status {
        trace!("engine_thread_set_callbacks");
        // SAFETY: the hook pointers stay valid for the process lifetime and
        // the engine treats `context` as opaque.
        unsafe { engine_thread_set_callbacks(start, stop, context) }
    }

    fn add_event_handler(&self, event_type: EventType, handler: EventHandlerFn) -> Status {
        trace!("engine_event_add_handler type={:?}", event_type);
        // SAFETY: `handler` is a plain extern "C" fn with the engine's
        // expected signature.
        unsafe { engine_event_add_handler(event_type.0, handler) }
    }

    fn set_handler_id_flags(
        &self,
        handler: EventHandlerFn,
        event_type: EventType,
        add_flags: EventIdFlags,
        remove_flags: EventIdFlags,
    ) -> Status {
        trace!(
            "engine_event_set_handler_id_flags type={:?} add={:#x} remove={:#x}",
            event_type,
            add_flags.0,
            remove_flags.0
        );
        // SAFETY: plain value pass-through; the object-type slot is always
        // none for this bridge.
        unsafe {
            engine_event_set_handler_id_flags(
                handler,
                event_type.0,
                OBJECT_TYPE_NONE,
                add_flags.0,
                remove_flags.0,
            )
        }
    }

    fn execute(&self, argc: u32, argv: *mut *mut c_char, init: InitFn, run: RunFn, exit: ExitFn) {
        trace!("engine_execute argc={}", argc);
        // SAFETY: the caller guarantees `argv` points to `argc` valid
        // arguments for the duration of the call; the engine blocks here
        // until shutdown.
        unsafe { engine_execute(argc, argv, init, run, exit) }
    }
}
