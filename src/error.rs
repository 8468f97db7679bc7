//! Internal error type.
//!
//! `vessel` has no exception channel for ordinary data operations (see the crate's
//! Error Handling design): out-of-range reads, type mismatches, and parse failures
//! all resolve to a zero-value or an empty container instead of a `Result`. This
//! type exists only for the narrow set of conditions that are not data failures —
//! an internal invariant that should be unreachable. It never appears in the
//! public signature of a container operation.

use std::fmt;

/// The error type used for the handful of non-data failures in this crate.
#[derive(Debug)]
pub enum VesselError {
    /// An internal invariant was violated. Carries a short description of which one.
    Internal(String),
}

impl VesselError {
    pub(crate) fn internal<S: Into<String>>(message: S) -> Self {
        VesselError::Internal(message.into())
    }
}

impl fmt::Display for VesselError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VesselError::Internal(message) => write!(f, "internal error: {}", message),
        }
    }
}

impl std::error::Error for VesselError {}
