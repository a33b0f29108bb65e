// Error types for the bridge layer
//
// Exactly one error kind crosses the C boundary: "underlying call failed",
// collapsed to the binary Status. The Rust side keeps a structured enum with
// numeric codes so callers and logs can tell the failure points apart.

use std::fmt;

use log::error;

use crate::events::EventType;
use crate::status::Status;

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages from
/// custom error types, enabling consistent error handling at the FFI edge.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

/// Bridge error code constants
///
/// Single source of truth for the codes emitted in structured log records.
///
/// Error code range: 2001-2007
pub struct BridgeErrorCodes {}

impl BridgeErrorCodes {
    /// Managed runtime refused to register the calling thread
    pub const THREAD_REGISTER_FAILED: i32 = 2001;

    /// Managed runtime refused to unregister the calling thread
    pub const THREAD_UNREGISTER_FAILED: i32 = 2002;

    /// Engine rejected the thread lifecycle hook installation
    pub const CALLBACK_INSTALL_FAILED: i32 = 2003;

    /// Engine rejected the event handler registration
    pub const HANDLER_ADD_FAILED: i32 = 2004;

    /// Engine rejected the ID flag narrowing for a registered handler
    pub const ID_FLAGS_FAILED: i32 = 2005;

    /// A bridge lock was poisoned
    pub const LOCK_POISONED: i32 = 2006;

    /// A required callback pointer was null at the C boundary
    pub const NULL_CALLBACK: i32 = 2007;
}

/// Log a bridge error with structured context before it propagates.
pub fn log_bridge_error(err: &BridgeError, context: &str) {
    error!(
        "Bridge error in {}: code={}, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Bridge-level errors
///
/// Every variant collapses to `Status::Failure` at the C boundary; the
/// variant only records which underlying call failed first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Managed runtime refused to register the calling thread
    ThreadRegisterFailed,

    /// Managed runtime refused to unregister the calling thread
    ThreadUnregisterFailed,

    /// Engine rejected the thread lifecycle hook installation
    CallbackInstallFailed,

    /// Engine rejected the event handler registration (step one)
    HandlerAddFailed { event_type: EventType },

    /// Engine rejected the ID flag narrowing (step two); the handler stays
    /// registered
    IdFlagsFailed { event_type: EventType },

    /// A bridge lock was poisoned
    LockPoisoned { component: &'static str },

    /// A required callback pointer was null at the C boundary
    NullCallback { parameter: &'static str },
}

impl ErrorCode for BridgeError {
    fn code(&self) -> i32 {
        match self {
            BridgeError::ThreadRegisterFailed => BridgeErrorCodes::THREAD_REGISTER_FAILED,
            BridgeError::ThreadUnregisterFailed => BridgeErrorCodes::THREAD_UNREGISTER_FAILED,
            BridgeError::CallbackInstallFailed => BridgeErrorCodes::CALLBACK_INSTALL_FAILED,
            BridgeError::HandlerAddFailed { .. } => BridgeErrorCodes::HANDLER_ADD_FAILED,
            BridgeError::IdFlagsFailed { .. } => BridgeErrorCodes::ID_FLAGS_FAILED,
            BridgeError::LockPoisoned { .. } => BridgeErrorCodes::LOCK_POISONED,
            BridgeError::NullCallback { .. } => BridgeErrorCodes::NULL_CALLBACK,
        }
    }

    fn message(&self) -> String {
        match self {
            BridgeError::ThreadRegisterFailed => {
                "Managed runtime failed to register the calling thread".to_string()
            }
            BridgeError::ThreadUnregisterFailed => {
                "Managed runtime failed to unregister the calling thread".to_string()
            }
            BridgeError::CallbackInstallFailed => {
                "Engine rejected the thread lifecycle hooks".to_string()
            }
            BridgeError::HandlerAddFailed { event_type } => {
                format!("Engine rejected the event handler for {:?}", event_type)
            }
            BridgeError::IdFlagsFailed { event_type } => format!(
                "Engine rejected the ID flag update for {:?}; handler remains registered",
                event_type
            ),
            BridgeError::LockPoisoned { component } => {
                format!("Lock poisoned on {}", component)
            }
            BridgeError::NullCallback { parameter } => {
                format!("Required callback `{}` was null", parameter)
            }
        }
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BridgeError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for BridgeError {}

impl From<&BridgeError> for Status {
    fn from(_err: &BridgeError) -> Self {
        Status::Failure
    }
}
