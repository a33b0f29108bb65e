//! Runtime backend linked against the host runtime's C library.

use log::trace;

use super::RuntimeThreads;

// Host runtime thread API. Non-zero return means success.
extern "C" {
    fn runtime_thread_register() -> i32;
    fn runtime_thread_unregister() -> i32;
}

/// Runtime backend calling straight into the host runtime C API.
#[derive(Default)]
pub struct NativeRuntime {
    _unit: (),
}

impl NativeRuntime {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RuntimeThreads for NativeRuntime {
    fn register_current_thread(&self) -> bool {
        trace!("runtime_thread_register");
        // SAFETY: no arguments; the runtime keys the registration off the
        // calling thread itself.
        unsafe { runtime_thread_register() != 0 }
    }

    fn unregister_current_thread(&self) -> bool {
        trace!("runtime_thread_unregister");
        // SAFETY: same contract as registration.
        unsafe { runtime_thread_unregister() != 0 }
    }
}
