//! Stub engine backend for desktop testing.
//!
//! Keeps the same interface as the real engine but performs no engine work:
//! installed callbacks, handlers and ID flags are recorded so tests can
//! observe exactly what the bridge forwarded. `execute` runs a minimal main
//! loop with the same lifecycle contract as the real engine, and `deliver`
//! dispatches events honoring the narrowed ID flags.
//!
//! This enables running `cargo test` without the engine or the managed
//! runtime being present.

use std::ffi::{c_char, c_void};
use std::sync::{Mutex, PoisonError};

use log::{debug, warn};

use super::{EngineApi, ExitFn, InitFn, RunFn, ThreadHookFn};
use crate::events::{EngineEvent, EventHandlerFn, EventIdFlags, EventType};
use crate::status::Status;

/// One registered handler with its current delivery filter.
struct HandlerEntry {
    event_type: EventType,
    handler: EventHandlerFn,
    id_flags: EventIdFlags,
}

#[derive(Default)]
struct StubState {
    thread_callbacks: Option<(ThreadHookFn, ThreadHookFn)>,
    install_count: u32,
    handlers: Vec<HandlerEntry>,
    add_handler_calls: u32,
    set_id_flags_calls: u32,
    fail_set_thread_callbacks: bool,
    fail_add_handler: bool,
    fail_set_id_flags: bool,
}

/// Stub engine backend with state tracking and failure injection.
#[derive(Default)]
pub struct StubEngine {
    state: Mutex<StubState>,
}

impl StubEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, StubState> {
        // A panicking test must not wedge the other tests sharing this stub
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Failure injection

    /// Make the next `set_thread_callbacks` calls report failure.
    pub fn set_fail_thread_callbacks(&self, fail: bool) {
        self.state().fail_set_thread_callbacks = fail;
    }

    /// Make the next `add_event_handler` calls report failure.
    pub fn set_fail_add_handler(&self, fail: bool) {
        self.state().fail_add_handler = fail;
    }

    /// Make the next `set_handler_id_flags` calls report failure.
    pub fn set_fail_id_flags(&self, fail: bool) {
        self.state().fail_set_id_flags = fail;
    }

    // Observation helpers

    /// The thread hook pair most recently installed, if any.
    pub fn installed_thread_callbacks(&self) -> Option<(ThreadHookFn, ThreadHookFn)> {
        self.state().thread_callbacks
    }

    /// How many times `set_thread_callbacks` succeeded.
    pub fn install_count(&self) -> u32 {
        self.state().install_count
    }

    /// Registered handler count for an event type.
    pub fn handler_count(&self, event_type: EventType) -> usize {
        self.state()
            .handlers
            .iter()
            .filter(|entry| entry.event_type == event_type)
            .count()
    }

    /// Current delivery filter for a registered handler.
    pub fn id_flags(&self, event_type: EventType, handler: EventHandlerFn) -> Option<EventIdFlags> {
        self.state()
            .handlers
            .iter()
            .find(|entry| entry.event_type == event_type && entry.handler == handler)
            .map(|entry| entry.id_flags)
    }

    /// How many times `add_event_handler` was invoked (including failures).
    pub fn add_handler_calls(&self) -> u32 {
        self.state().add_handler_calls
    }

    /// How many times `set_handler_id_flags` was invoked (including failures).
    pub fn set_id_flags_calls(&self) -> u32 {
        self.state().set_id_flags_calls
    }

    /// Dispatch an event to every registered handler whose filter accepts
    /// its sub-ID, the way the engine's event loop would.
    ///
    /// Returns `Failure` if any handler failed, `Success` otherwise
    /// (including when nothing matched).
    pub fn deliver(&self, event: &EngineEvent) -> Status {
        // Collect first: handlers may call back into this stub
        let matching: Vec<EventHandlerFn> = self
            .state()
            .handlers
            .iter()
            .filter(|entry| entry.event_type == event.event_type && entry.id_flags.accepts(event.id))
            .map(|entry| entry.handler)
            .collect();

        let mut status = Status::Success;
        for handler in matching {
            if handler(event as *const EngineEvent).is_failure() {
                status = Status::Failure;
            }
        }
        status
    }

    /// Simulate one engine worker-thread lifecycle: spawn a thread, invoke
    /// the installed start hook then the stop hook on it, and return both
    /// statuses. `None` if no callbacks are installed or the thread panicked.
    pub fn run_thread_lifecycle(&self) -> Option<(Status, Status)> {
        let (start, stop) = self.state().thread_callbacks?;

        let handle = std::thread::spawn(move || {
            let start_status = start(std::ptr::null_mut());
            let stop_status = stop(std::ptr::null_mut());
            (start_status, stop_status)
        });

        match handle.join() {
            Ok(statuses) => Some(statuses),
            Err(_) => {
                warn!("worker lifecycle thread panicked");
                None
            }
        }
    }
}

impl EngineApi for StubEngine {
    fn set_thread_callbacks(
        &self,
        start: ThreadHookFn,
        stop: ThreadHookFn,
        _context: *mut c_void,
    ) -> Status {
        let mut state = self.state();
        if state.fail_set_thread_callbacks {
            warn!("stub engine: set_thread_callbacks failing by injection");
            return Status::Failure;
        }
        state.thread_callbacks = Some((start, stop));
        state.install_count += 1;
        debug!("stub engine: thread callbacks installed");
        Status::Success
    }

    fn add_event_handler(&self, event_type: EventType, handler: EventHandlerFn) -> Status {
        let mut state = self.state();
        state.add_handler_calls += 1;
        if state.fail_add_handler {
            warn!("stub engine: add_event_handler failing by injection");
            return Status::Failure;
        }
        state.handlers.push(HandlerEntry {
            event_type,
            handler,
            // Engine default: a fresh handler receives every sub-ID
            id_flags: EventIdFlags::ALL,
        });
        debug!("stub engine: handler added for {:?}", event_type);
        Status::Success
    }

    fn set_handler_id_flags(
        &self,
        handler: EventHandlerFn,
        event_type: EventType,
        add_flags: EventIdFlags,
        remove_flags: EventIdFlags,
    ) -> Status {
        let mut state = self.state();
        state.set_id_flags_calls += 1;
        if state.fail_set_id_flags {
            warn!("stub engine: set_handler_id_flags failing by injection");
            return Status::Failure;
        }
        match state
            .handlers
            .iter_mut()
            .find(|entry| entry.event_type == event_type && entry.handler == handler)
        {
            Some(entry) => {
                entry.id_flags = entry.id_flags.apply(add_flags, remove_flags);
                debug!(
                    "stub engine: {:?} id flags now {:#x}",
                    event_type, entry.id_flags.0
                );
                Status::Success
            }
            None => {
                warn!("stub engine: set_handler_id_flags for unregistered handler");
                Status::Failure
            }
        }
    }

    fn execute(&self, _argc: u32, _argv: *mut *mut c_char, init: InitFn, run: RunFn, exit: ExitFn) {
        debug!("stub engine: main loop starting");
        if init().is_failure() {
            warn!("stub engine: init callback failed, skipping main loop");
            return;
        }
        while run().is_success() {}
        exit();
        debug!("stub engine: main loop finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    extern "C" fn noop_handler(_event: *const EngineEvent) -> Status {
        Status::Success
    }

    extern "C" fn failing_handler(_event: *const EngineEvent) -> Status {
        Status::Failure
    }

    #[test]
    fn test_fresh_handler_gets_all_flags() {
        let engine = StubEngine::new();
        assert!(engine
            .add_event_handler(EventType::SYSTEM, noop_handler)
            .is_success());
        assert_eq!(
            engine.id_flags(EventType::SYSTEM, noop_handler),
            Some(EventIdFlags::ALL)
        );
    }

    #[test]
    fn test_set_id_flags_applies_engine_rule() {
        let engine = StubEngine::new();
        engine.add_event_handler(EventType::INPUT, noop_handler);
        assert!(engine
            .set_handler_id_flags(
                noop_handler,
                EventType::INPUT,
                EventIdFlags(0b0110),
                EventIdFlags::ALL,
            )
            .is_success());
        assert_eq!(
            engine.id_flags(EventType::INPUT, noop_handler),
            Some(EventIdFlags(0b0110))
        );
    }

    #[test]
    fn test_set_id_flags_unregistered_handler_fails() {
        let engine = StubEngine::new();
        let status = engine.set_handler_id_flags(
            noop_handler,
            EventType::SYSTEM,
            EventIdFlags::ALL,
            EventIdFlags::NONE,
        );
        assert!(status.is_failure());
    }

    #[test]
    fn test_deliver_reports_handler_failure() {
        let engine = StubEngine::new();
        engine.add_event_handler(EventType::OBJECT, failing_handler);
        let event = EngineEvent::new(EventType::OBJECT, 0);
        assert!(engine.deliver(&event).is_failure());
    }

    #[test]
    fn test_deliver_skips_filtered_ids() {
        let engine = StubEngine::new();
        engine.add_event_handler(EventType::OBJECT, failing_handler);
        engine.set_handler_id_flags(
            failing_handler,
            EventType::OBJECT,
            EventIdFlags(0b0001),
            EventIdFlags::ALL,
        );
        // ID 5 is filtered out, so the failing handler never runs
        let event = EngineEvent::new(EventType::OBJECT, 5);
        assert!(engine.deliver(&event).is_success());
    }

    #[test]
    fn test_failure_injection() {
        let engine = StubEngine::new();
        engine.set_fail_add_handler(true);
        assert!(engine
            .add_event_handler(EventType::SYSTEM, noop_handler)
            .is_failure());
        assert_eq!(engine.handler_count(EventType::SYSTEM), 0);

        engine.set_fail_add_handler(false);
        assert!(engine
            .add_event_handler(EventType::SYSTEM, noop_handler)
            .is_success());
        assert_eq!(engine.handler_count(EventType::SYSTEM), 1);
    }

    static INIT_FAIL_RUN_CALLS: AtomicU32 = AtomicU32::new(0);
    static INIT_FAIL_EXIT_CALLS: AtomicU32 = AtomicU32::new(0);

    extern "C" fn failing_init() -> Status {
        Status::Failure
    }

    extern "C" fn counting_run() -> Status {
        INIT_FAIL_RUN_CALLS.fetch_add(1, Ordering::SeqCst);
        Status::Failure
    }

    extern "C" fn counting_exit() {
        INIT_FAIL_EXIT_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn test_execute_failed_init_skips_run_and_exit() {
        let engine = StubEngine::new();
        engine.execute(
            0,
            std::ptr::null_mut(),
            failing_init,
            counting_run,
            counting_exit,
        );
        assert_eq!(INIT_FAIL_RUN_CALLS.load(Ordering::SeqCst), 0);
        assert_eq!(INIT_FAIL_EXIT_CALLS.load(Ordering::SeqCst), 0);
    }
}
