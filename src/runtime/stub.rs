//! Stub runtime tracking per-thread registrations for tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread::ThreadId;

use log::debug;

use super::RuntimeThreads;

/// Stub managed runtime with per-thread registration bookkeeping and
/// failure injection.
///
/// Mirrors the host runtime's contract: registering an already registered
/// thread is reported as a failed registration, as is unregistering a
/// thread that was never registered.
#[derive(Default)]
pub struct StubRuntime {
    registered: Mutex<HashSet<ThreadId>>,
    fail_register: AtomicBool,
    fail_unregister: AtomicBool,
}

impl StubRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    fn registered(&self) -> std::sync::MutexGuard<'_, HashSet<ThreadId>> {
        self.registered.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next registrations report failure.
    pub fn set_fail_register(&self, fail: bool) {
        self.fail_register.store(fail, Ordering::SeqCst);
    }

    /// Make the next unregistrations report failure.
    pub fn set_fail_unregister(&self, fail: bool) {
        self.fail_unregister.store(fail, Ordering::SeqCst);
    }

    /// Whether the calling thread is currently registered.
    pub fn is_current_registered(&self) -> bool {
        self.registered().contains(&std::thread::current().id())
    }

    /// Number of threads currently registered.
    pub fn registered_count(&self) -> usize {
        self.registered().len()
    }
}

impl RuntimeThreads for StubRuntime {
    fn register_current_thread(&self) -> bool {
        if self.fail_register.load(Ordering::SeqCst) {
            return false;
        }
        let id = std::thread::current().id();
        let inserted = self.registered().insert(id);
        if inserted {
            debug!("stub runtime: registered {:?}", id);
        }
        inserted
    }

    fn unregister_current_thread(&self) -> bool {
        if self.fail_unregister.load(Ordering::SeqCst) {
            return false;
        }
        let id = std::thread::current().id();
        let removed = self.registered().remove(&id);
        if removed {
            debug!("stub runtime: unregistered {:?}", id);
        }
        removed
    }
}
