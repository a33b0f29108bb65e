// BridgeContext: dependency injection container for the two bridge seams
// Centralizes the runtime/engine backends for testability; the process-wide
// instance backs the extern "C" surface in `api`.

use std::ffi::c_char;
use std::sync::{Arc, RwLock};

use log::{debug, info};
use once_cell::sync::Lazy;

use crate::engine::{default_engine, EngineApi, ExitFn, InitFn, RunFn};
use crate::error::{log_bridge_error, BridgeError};
use crate::events::{EventHandlerFn, EventIdFlags, EventType};
use crate::runtime::{default_runtime, RuntimeThreads};

/// Process-wide bridge instance. The `extern "C"` entry points and the
/// thread hooks handed to the engine all route through this context.
pub static BRIDGE: Lazy<BridgeContext> = Lazy::new(BridgeContext::new);

/// Container for the two backend seams of the bridge.
///
/// Holds no state of its own beyond the backend handles: the thread bridge,
/// event bridge and execution entry point are each a direct pass-through,
/// and a failure of any underlying call propagates upward unchanged.
pub struct BridgeContext {
    runtime: RwLock<Arc<dyn RuntimeThreads>>,
    engine: RwLock<Arc<dyn EngineApi>>,
}

impl BridgeContext {
    /// Create a context with the default backends: native when the
    /// `native-engine` feature is enabled, stubs otherwise.
    pub fn new() -> Self {
        Self {
            runtime: RwLock::new(default_runtime()),
            engine: RwLock::new(default_engine()),
        }
    }

    /// Create a context with explicit backends (tests, diagnostics).
    pub fn with_backends(runtime: Arc<dyn RuntimeThreads>, engine: Arc<dyn EngineApi>) -> Self {
        Self {
            runtime: RwLock::new(runtime),
            engine: RwLock::new(engine),
        }
    }

    /// Swap the runtime backend.
    pub fn set_runtime(&self, runtime: Arc<dyn RuntimeThreads>) -> Result<(), BridgeError> {
        let mut guard = self
            .runtime
            .write()
            .map_err(|_| BridgeError::LockPoisoned { component: "runtime" })?;
        *guard = runtime;
        Ok(())
    }

    /// Swap the engine backend.
    pub fn set_engine(&self, engine: Arc<dyn EngineApi>) -> Result<(), BridgeError> {
        let mut guard = self
            .engine
            .write()
            .map_err(|_| BridgeError::LockPoisoned { component: "engine" })?;
        *guard = engine;
        Ok(())
    }

    // Lock helpers: clone the backend handle out so the lock is never held
    // across an underlying call (execute blocks for the process lifetime).

    fn runtime(&self) -> Result<Arc<dyn RuntimeThreads>, BridgeError> {
        self.runtime
            .read()
            .map(|guard| Arc::clone(&*guard))
            .map_err(|_| BridgeError::LockPoisoned { component: "runtime" })
    }

    fn engine(&self) -> Result<Arc<dyn EngineApi>, BridgeError> {
        self.engine
            .read()
            .map(|guard| Arc::clone(&*guard))
            .map_err(|_| BridgeError::LockPoisoned { component: "engine" })
    }

    // Thread bridge

    /// Register the calling engine thread with the managed runtime so
    /// managed callbacks may subsequently execute on it.
    ///
    /// No retry on failure; the engine decides whether to keep running with
    /// an unregistered thread.
    pub fn on_thread_start(&self) -> Result<(), BridgeError> {
        let runtime = self.runtime().map_err(|err| {
            log_bridge_error(&err, "on_thread_start");
            err
        })?;
        if runtime.register_current_thread() {
            debug!(
                "registered {:?} with the managed runtime",
                std::thread::current().id()
            );
            Ok(())
        } else {
            let err = BridgeError::ThreadRegisterFailed;
            log_bridge_error(&err, "on_thread_start");
            Err(err)
        }
    }

    /// Symmetric unregistration of the calling thread.
    pub fn on_thread_stop(&self) -> Result<(), BridgeError> {
        let runtime = self.runtime().map_err(|err| {
            log_bridge_error(&err, "on_thread_stop");
            err
        })?;
        if runtime.unregister_current_thread() {
            debug!(
                "unregistered {:?} from the managed runtime",
                std::thread::current().id()
            );
            Ok(())
        } else {
            let err = BridgeError::ThreadUnregisterFailed;
            log_bridge_error(&err, "on_thread_stop");
            Err(err)
        }
    }

    /// Install both thread hooks with the engine (one-time, process-wide).
    ///
    /// Always forwards the same two function pointers and a null context;
    /// repeated installation accumulates no state on this side. The engine's
    /// status is propagated.
    pub fn install_thread_callbacks(&self) -> Result<(), BridgeError> {
        let engine = self.engine().map_err(|err| {
            log_bridge_error(&err, "install_thread_callbacks");
            err
        })?;
        let status = engine.set_thread_callbacks(
            crate::api::bridge_thread_start,
            crate::api::bridge_thread_stop,
            std::ptr::null_mut(),
        );
        if status.is_success() {
            info!("thread lifecycle hooks installed with the engine");
            Ok(())
        } else {
            let err = BridgeError::CallbackInstallFailed;
            log_bridge_error(&err, "install_thread_callbacks");
            Err(err)
        }
    }

    // Event bridge

    /// Register `handler` for `event_type`, then narrow delivery to the
    /// sub-IDs selected by `add_flags` excluding those in `remove_flags`.
    ///
    /// Strict two-step sequence, not transactional: if registration fails
    /// the flag step is skipped and that status propagates; if the flag step
    /// fails the handler stays registered and that status propagates. The
    /// caller detects partial registration via the returned status.
    pub fn add_event_handler(
        &self,
        event_type: EventType,
        handler: EventHandlerFn,
        add_flags: EventIdFlags,
        remove_flags: EventIdFlags,
    ) -> Result<(), BridgeError> {
        let engine = self.engine().map_err(|err| {
            log_bridge_error(&err, "add_event_handler");
            err
        })?;

        if engine.add_event_handler(event_type, handler).is_failure() {
            let err = BridgeError::HandlerAddFailed { event_type };
            log_bridge_error(&err, "add_event_handler");
            return Err(err);
        }

        if engine
            .set_handler_id_flags(handler, event_type, add_flags, remove_flags)
            .is_failure()
        {
            let err = BridgeError::IdFlagsFailed { event_type };
            log_bridge_error(&err, "add_event_handler");
            return Err(err);
        }

        debug!(
            "event handler registered for {:?} (add={:#x} remove={:#x})",
            event_type, add_flags.0, remove_flags.0
        );
        Ok(())
    }

    // Execution entry point

    /// Hand control to the engine's blocking main loop.
    ///
    /// Does not return until the engine has fully shut down. The loop has no
    /// failure channel of its own; anything the caller needs to know must
    /// travel through the init/run/exit callbacks.
    pub fn execute(
        &self,
        argc: u32,
        argv: *mut *mut c_char,
        init: InitFn,
        run: RunFn,
        exit: ExitFn,
    ) -> Result<(), BridgeError> {
        let engine = self.engine().map_err(|err| {
            log_bridge_error(&err, "execute");
            err
        })?;
        info!("handing control to the engine main loop");
        engine.execute(argc, argv, init, run, exit);
        info!("engine main loop returned");
        Ok(())
    }
}

impl Default for BridgeContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StubEngine;
    use crate::events::EngineEvent;
    use crate::runtime::StubRuntime;
    use crate::status::Status;

    fn test_context() -> (BridgeContext, Arc<StubRuntime>, Arc<StubEngine>) {
        let runtime = Arc::new(StubRuntime::new());
        let engine = Arc::new(StubEngine::new());
        let ctx = BridgeContext::with_backends(
            Arc::clone(&runtime) as Arc<dyn RuntimeThreads>,
            Arc::clone(&engine) as Arc<dyn EngineApi>,
        );
        (ctx, runtime, engine)
    }

    extern "C" fn noop_handler(_event: *const EngineEvent) -> Status {
        Status::Success
    }

    #[test]
    fn test_thread_start_stop_inverse_pair() {
        let (ctx, runtime, _engine) = test_context();

        assert!(ctx.on_thread_start().is_ok());
        assert!(runtime.is_current_registered());

        assert!(ctx.on_thread_stop().is_ok());
        assert!(!runtime.is_current_registered());
    }

    #[test]
    fn test_thread_start_failure_propagates() {
        let (ctx, runtime, _engine) = test_context();
        runtime.set_fail_register(true);

        assert_eq!(
            ctx.on_thread_start().unwrap_err(),
            BridgeError::ThreadRegisterFailed
        );
        assert!(!runtime.is_current_registered());
    }

    #[test]
    fn test_thread_stop_failure_propagates() {
        let (ctx, runtime, _engine) = test_context();
        assert!(ctx.on_thread_start().is_ok());
        runtime.set_fail_unregister(true);

        assert_eq!(
            ctx.on_thread_stop().unwrap_err(),
            BridgeError::ThreadUnregisterFailed
        );
    }

    #[test]
    fn test_install_thread_callbacks_forwards_same_pointers() {
        let (ctx, _runtime, engine) = test_context();

        assert!(ctx.install_thread_callbacks().is_ok());
        let first = engine
            .installed_thread_callbacks()
            .expect("callbacks must be recorded");

        assert!(ctx.install_thread_callbacks().is_ok());
        let second = engine
            .installed_thread_callbacks()
            .expect("callbacks must be recorded");

        assert_eq!(first, second, "repeated install must forward the same pair");
        assert_eq!(engine.install_count(), 2);
    }

    #[test]
    fn test_install_thread_callbacks_failure_propagates() {
        let (ctx, _runtime, engine) = test_context();
        engine.set_fail_thread_callbacks(true);

        assert_eq!(
            ctx.install_thread_callbacks().unwrap_err(),
            BridgeError::CallbackInstallFailed
        );
    }

    #[test]
    fn test_add_event_handler_short_circuits_on_add_failure() {
        let (ctx, _runtime, engine) = test_context();
        engine.set_fail_add_handler(true);

        let result = ctx.add_event_handler(
            EventType::SYSTEM,
            noop_handler,
            EventIdFlags::ALL,
            EventIdFlags::NONE,
        );

        assert_eq!(
            result.unwrap_err(),
            BridgeError::HandlerAddFailed {
                event_type: EventType::SYSTEM
            }
        );
        // Flag narrowing must not have been attempted
        assert_eq!(engine.set_id_flags_calls(), 0);
        assert_eq!(engine.handler_count(EventType::SYSTEM), 0);
    }

    #[test]
    fn test_add_event_handler_flag_failure_leaves_partial_registration() {
        let (ctx, _runtime, engine) = test_context();
        engine.set_fail_id_flags(true);

        let result = ctx.add_event_handler(
            EventType::SYSTEM,
            noop_handler,
            EventIdFlags::ALL,
            EventIdFlags::NONE,
        );

        assert_eq!(
            result.unwrap_err(),
            BridgeError::IdFlagsFailed {
                event_type: EventType::SYSTEM
            }
        );
        // Non-transactional: the handler stays registered
        assert_eq!(engine.handler_count(EventType::SYSTEM), 1);
    }

    #[test]
    fn test_add_event_handler_success_narrows_flags() {
        let (ctx, _runtime, engine) = test_context();

        let result = ctx.add_event_handler(
            EventType::INPUT,
            noop_handler,
            EventIdFlags(0b0011),
            EventIdFlags::ALL,
        );

        assert!(result.is_ok());
        assert_eq!(
            engine.id_flags(EventType::INPUT, noop_handler),
            Some(EventIdFlags(0b0011))
        );
    }

    #[test]
    fn test_set_engine_swaps_backend() {
        let (ctx, _runtime, _engine) = test_context();
        let replacement = Arc::new(StubEngine::new());
        assert!(ctx.set_engine(Arc::clone(&replacement) as Arc<dyn EngineApi>).is_ok());

        assert!(ctx
            .add_event_handler(
                EventType::SOUND,
                noop_handler,
                EventIdFlags::ALL,
                EventIdFlags::NONE,
            )
            .is_ok());
        assert_eq!(replacement.handler_count(EventType::SOUND), 1);
    }
}
