// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for property operations.

use core::fmt;

use thiserror::Error;

use crate::key::Key;
use crate::value::ValueKind;

/// What a failed constraint expected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expected {
    /// A value of this kind.
    Kind(ValueKind),
    /// A value accepted by a callback.
    Callback,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kind(kind) => f.write_str(kind.name()),
            Self::Callback => f.write_str("callback"),
        }
    }
}

/// Errors raised by property stores.
///
/// None of these are transient; retrying the same call fails the same way.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// A non-scalar value was used as a property key.
    #[error("a {kind} value is an invalid name for properties")]
    InvalidKey {
        /// The kind of the rejected key.
        kind: ValueKind,
    },
    /// The property is not currently set.
    #[error("property {key} doesn't exist on this object")]
    NotFound {
        /// The missing key.
        key: Key,
    },
    /// A constraint callback returned something other than a boolean.
    ///
    /// This is a configuration bug and is raised whether or not the store
    /// is strict.
    #[error("constraint callback for property {key} must return a boolean, returned {returned}")]
    InvalidConstraint {
        /// The key being set.
        key: Key,
        /// The kind the callback returned.
        returned: ValueKind,
    },
    /// A strict store rejected a value that failed its constraint.
    #[error("property {key} failed the constraint check: expected {expected}, given {actual}")]
    ConstraintViolation {
        /// The key being set.
        key: Key,
        /// The failed constraint.
        expected: Expected,
        /// The kind of the rejected value.
        actual: ValueKind,
    },
}
