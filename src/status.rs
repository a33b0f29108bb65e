// Engine status convention shared by every C-boundary call

use std::fmt;

/// Binary status code used throughout the engine's C API.
///
/// Every fallible engine call reports either `Success` or `Failure`; no
/// further detail crosses the boundary. The bridge translates the managed
/// runtime's boolean results into this convention and propagates the first
/// failing sub-call's status upward unchanged.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success = 0,
    Failure = 1,
}

impl Status {
    /// Translate a boolean-like runtime result into the engine convention.
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            Status::Success
        } else {
            Status::Failure
        }
    }

    /// Collapse a bridge-level result into the binary status. The error
    /// detail stays on the Rust side; only success/failure crosses the
    /// C boundary.
    pub fn from_result<T, E>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Status::Success,
            Err(_) => Status::Failure,
        }
    }

    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    pub fn is_failure(self) -> bool {
        self == Status::Failure
    }
}

impl From<bool> for Status {
    fn from(ok: bool) -> Self {
        Status::from_bool(ok)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "SUCCESS"),
            Status::Failure => write!(f, "FAILURE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bool() {
        assert_eq!(Status::from_bool(true), Status::Success);
        assert_eq!(Status::from_bool(false), Status::Failure);
        assert_eq!(Status::from(true), Status::Success);
    }

    #[test]
    fn test_from_result() {
        let ok: Result<(), ()> = Ok(());
        let err: Result<(), ()> = Err(());
        assert_eq!(Status::from_result(&ok), Status::Success);
        assert_eq!(Status::from_result(&err), Status::Failure);
    }

    #[test]
    fn test_predicates() {
        assert!(Status::Success.is_success());
        assert!(!Status::Success.is_failure());
        assert!(Status::Failure.is_failure());
    }

    #[test]
    fn test_display() {
        assert_eq!(Status::Success.to_string(), "SUCCESS");
        assert_eq!(Status::Failure.to_string(), "FAILURE");
    }
}
