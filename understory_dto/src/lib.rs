// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory DTO: schema-less property bags with change tracking.
//!
//! This crate turns any host object into a lightweight value object: embed a
//! [`PropertyStore`] and the object gains dynamic properties, dirty flags and
//! structural change detection without hand-written accessors.
//!
//! ## Core Concepts
//!
//! ### Property Storage
//!
//! [`PropertyStore`] holds an insertion-ordered map of [`Key`] to [`Value`],
//! plus a dirty flag per key:
//!
//! - the first `set` of a key marks it dirty
//! - a `set` with a different value marks it dirty
//! - a `set` with an equal value leaves the flag as it was
//! - `clean_property` / `clean_all` reset flags without forgetting keys
//!
//! ### Constraints
//!
//! [`ConstrainedPropertyStore`] checks every write against a per-key
//! [`Constraint`] (a [`ValueKind`] or a predicate) supplied by a
//! [`ConstraintSource`]. Rejected values are dropped, or reported as
//! [`PropertyError::ConstraintViolation`] when the source is strict.
//!
//! ### Keys
//!
//! Keys are scalars: null, booleans, numbers and strings. Operations take
//! keys through [`IntoKey`]; passing a list, map or callable [`Value`] fails
//! with [`PropertyError::InvalidKey`] before anything changes.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_dto::{PropertyError, PropertyStore, Value};
//!
//! # fn main() -> Result<(), PropertyError> {
//! let mut store = PropertyStore::new();
//! store.fill([("a", 1), ("b", 2)], false)?;
//! store.fill([("c", 3), ("b", 5)], false)?;
//!
//! assert_eq!(store["b"], Value::Int(5));
//! assert_eq!(store.changed_properties().len(), 3);
//!
//! store.clean_all();
//! assert!(!store.changed("a")?);
//! assert!(store.changed("missing").is_err());
//! # Ok(())
//! # }
//! ```
//!
//! ## Host Objects
//!
//! Stores are plain components. A host owns one and delegates to it:
//!
//! ```rust
//! use understory_dto::{
//!     ConstrainedPropertyStore, Constraints, PropertyError, Value, ValueKind,
//! };
//!
//! struct User {
//!     props: ConstrainedPropertyStore<Constraints>,
//! }
//!
//! impl User {
//!     fn new() -> Self {
//!         let constraints = Constraints::new()
//!             .kind("age", ValueKind::Integer)
//!             .strict_mode(true);
//!         Self { props: ConstrainedPropertyStore::new(constraints) }
//!     }
//!
//!     fn set_age(&mut self, age: impl Into<Value>) -> Result<(), PropertyError> {
//!         self.props.set("age", age).map(|_| ())
//!     }
//! }
//!
//! let mut user = User::new();
//! assert!(user.set_age(28).is_ok());
//! assert!(user.set_age("old").is_err());
//! ```
//!
//! ## Concurrency
//!
//! Stores are synchronous and do no internal locking. Share one across
//! threads behind a mutex.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod constraint;
mod error;
mod key;
mod store;
mod strict;
mod value;

pub use constraint::{Constraint, ConstraintSource, ConstraintTable, Constraints};
pub use error::{Expected, PropertyError};
pub use key::{IntoKey, Key};
pub use store::PropertyStore;
pub use strict::ConstrainedPropertyStore;
pub use value::{Callable, Value, ValueKind, ValueMap};
