// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property storage with per-property constraints.
//!
//! [`ConstrainedPropertyStore`] wraps a [`PropertyStore`] and checks each
//! incoming value against the constraint registered for its key before
//! storing it. What happens to a rejected value depends on the source's
//! strictness:
//!
//! - strict: the call fails with [`PropertyError::ConstraintViolation`]
//! - non-strict: the call succeeds and the value is dropped; nothing is
//!   stored and nothing is marked dirty
//!
//! A callback that returns a non-boolean always fails with
//! [`PropertyError::InvalidConstraint`], strict or not.

use core::ops::Deref;

use tracing::debug;

use crate::constraint::{Constraint, ConstraintSource, ConstraintTable};
use crate::error::PropertyError;
use crate::key::{IntoKey, Key};
use crate::store::{PropertyStore, collect_entries};
use crate::value::Value;

/// A [`PropertyStore`] that enforces constraints on `set`.
///
/// Read operations are available through `Deref<Target = PropertyStore>`.
/// Mutations go through this type so that every write is checked.
///
/// # Example
///
/// ```rust
/// use understory_dto::{
///     ConstrainedPropertyStore, Constraints, PropertyError, Value, ValueKind,
/// };
///
/// # fn main() -> Result<(), PropertyError> {
/// let constraints = Constraints::new().kind("age", ValueKind::Integer);
/// let mut user = ConstrainedPropertyStore::new(constraints);
///
/// // Non-strict: the bad value is ignored.
/// user.set("age", "old")?;
/// assert!(!user.has_property("age")?);
///
/// user.set("age", 28)?;
/// assert_eq!(user["age"], Value::Int(28));
///
/// // Strict: the bad value is an error.
/// user.source_mut().set_strict_mode(true);
/// assert!(matches!(
///     user.set("age", "old"),
///     Err(PropertyError::ConstraintViolation { .. })
/// ));
/// assert_eq!(user["age"], Value::Int(28));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct ConstrainedPropertyStore<S> {
    store: PropertyStore,
    source: S,
}

impl<S: ConstraintSource> ConstrainedPropertyStore<S> {
    /// Creates an empty store checked against `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            store: PropertyStore::new(),
            source,
        }
    }

    /// Returns the constraint source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the constraint source mutably, e.g. to toggle strictness.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    /// Unwraps the underlying store, dropping the constraints.
    #[must_use]
    pub fn into_store(self) -> PropertyStore {
        self.store
    }

    /// Returns the full constraint table.
    #[must_use]
    pub fn constraints(&self) -> &ConstraintTable {
        self.source.constraints()
    }

    /// Returns `true` if a constraint is registered for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidKey`] if `key` is not a scalar.
    pub fn has_constraint(&self, key: impl IntoKey) -> Result<bool, PropertyError> {
        let key = key.into_key()?;
        Ok(self.source.constraints().contains_key(&key))
    }

    /// Returns the constraint registered for `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidKey`] if `key` is not a scalar.
    pub fn property_constraint(
        &self,
        key: impl IntoKey,
    ) -> Result<Option<&Constraint>, PropertyError> {
        let key = key.into_key()?;
        Ok(self.source.constraints().get(&key))
    }

    /// Sets a property if `value` satisfies the key's constraint.
    ///
    /// Keys without a constraint accept any value. A rejected value is
    /// dropped silently unless the source is strict.
    ///
    /// # Errors
    ///
    /// - [`PropertyError::InvalidKey`] if `key` is not a scalar.
    /// - [`PropertyError::InvalidConstraint`] if the key's callback returns
    ///   a non-boolean.
    /// - [`PropertyError::ConstraintViolation`] if the value is rejected and
    ///   the source is strict.
    pub fn set(
        &mut self,
        key: impl IntoKey,
        value: impl Into<Value>,
    ) -> Result<&mut Self, PropertyError> {
        let key = key.into_key()?;
        self.insert(key, value.into())?;
        Ok(self)
    }

    fn insert(&mut self, key: Key, value: Value) -> Result<(), PropertyError> {
        let Some(constraint) = self.source.constraints().get(&key) else {
            self.store.insert(key, value);
            return Ok(());
        };
        if constraint.check(&key, &value)? {
            self.store.insert(key, value);
            return Ok(());
        }

        let expected = constraint.expected();
        let actual = value.kind();
        if self.source.strict() {
            return Err(PropertyError::ConstraintViolation {
                key,
                expected,
                actual,
            });
        }
        debug!(%key, %expected, %actual, "ignoring value rejected by constraint");
        Ok(())
    }

    /// Sets every pair of `data` through [`set`](Self::set), in order.
    ///
    /// With `replace`, the store is reset first.
    ///
    /// # Errors
    ///
    /// Keys are validated before anything changes, so an
    /// [`PropertyError::InvalidKey`] leaves the store untouched. A
    /// constraint error stops the fill at the offending pair; earlier pairs
    /// stay applied.
    pub fn fill<I, K, V>(&mut self, data: I, replace: bool) -> Result<&mut Self, PropertyError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: IntoKey,
        V: Into<Value>,
    {
        let entries = collect_entries(data)?;
        if replace {
            self.store.reset();
        }
        for (key, value) in entries {
            self.insert(key, value)?;
        }
        Ok(self)
    }

    /// Removes every property and flag.
    pub fn reset(&mut self) -> &mut Self {
        self.store.reset();
        self
    }

    /// Marks a property as clean.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidKey`] if `key` is not a scalar.
    pub fn clean_property(&mut self, key: impl IntoKey) -> Result<&mut Self, PropertyError> {
        self.store.clean_property(key)?;
        Ok(self)
    }

    /// Marks every property as clean.
    pub fn clean_all(&mut self) -> &mut Self {
        self.store.clean_all();
        self
    }

    /// Removes a property and its flag, returning the old value.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidKey`] if `key` is not a scalar.
    pub fn remove(&mut self, key: impl IntoKey) -> Result<Option<Value>, PropertyError> {
        self.store.remove(key)
    }
}

impl<S> Deref for ConstrainedPropertyStore<S> {
    type Target = PropertyStore;

    fn deref(&self) -> &PropertyStore {
        &self.store
    }
}
