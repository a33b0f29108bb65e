//! Managed-runtime seam: per-thread registration with the host runtime.
//!
//! The managed runtime's garbage collector and scheduler must be told about
//! OS threads they did not create before managed code may run on them. Both
//! calls affect only the calling thread, so implementations must be safe to
//! invoke concurrently from distinct engine worker threads.

use std::sync::Arc;

/// Thread bookkeeping calls exposed by the managed runtime.
pub trait RuntimeThreads: Send + Sync {
    /// Register the calling OS thread with the runtime. `true` on success.
    fn register_current_thread(&self) -> bool;

    /// Remove the calling OS thread's registration. `true` on success.
    fn unregister_current_thread(&self) -> bool;
}

cfg_if::cfg_if! {
    if #[cfg(feature = "native-engine")] {
        mod native;
        pub use native::NativeRuntime;
    }
}

mod stub;
pub use stub::StubRuntime;

cfg_if::cfg_if! {
    if #[cfg(feature = "native-engine")] {
        /// Default runtime backend for the process-wide bridge context.
        pub(crate) fn default_runtime() -> Arc<dyn RuntimeThreads> {
            Arc::new(NativeRuntime::new())
        }
    } else {
        /// Default runtime backend for the process-wide bridge context.
        pub(crate) fn default_runtime() -> Arc<dyn RuntimeThreads> {
            Arc::new(StubRuntime::new())
        }
    }
}
