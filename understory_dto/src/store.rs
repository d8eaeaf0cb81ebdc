// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-object property storage with change tracking.
//!
//! This module provides [`PropertyStore`], an insertion-ordered property map
//! paired with a [`DirtyFlags`] table recording which properties changed.
//!
//! # Change Detection
//!
//! A `set` marks its key dirty when the key is new or when the stored value
//! differs from the incoming one (see [`Value`] for the equality used).
//! Setting an equal value leaves the flag exactly as it was: it neither
//! marks nor cleans.
//!
//! Cleaning resets flags without forgetting keys, so [`PropertyStore::changed`]
//! on a cleaned key answers `false` rather than failing.

use alloc::vec::Vec;
use core::ops::Index;

use tracing::trace;
use understory_dirty_flags::DirtyFlags;

use crate::error::PropertyError;
use crate::key::{IntoKey, Key, StrKey};
use crate::value::{Value, ValueMap};

static NULL: Value = Value::Null;

/// Converts a batch of pairs, failing on the first invalid key.
pub(crate) fn collect_entries<I, K, V>(data: I) -> Result<Vec<(Key, Value)>, PropertyError>
where
    I: IntoIterator<Item = (K, V)>,
    K: IntoKey,
    V: Into<Value>,
{
    data.into_iter()
        .map(|(key, value)| key.into_key().map(|key| (key, value.into())))
        .collect()
}

/// A schema-less property bag with dirty tracking.
///
/// Hosts embed a `PropertyStore` to gain dynamic properties. Every key ever
/// set is remembered (until [reset](Self::reset) or [removal](Self::remove))
/// along with whether it changed since the last clean.
///
/// Chainable operations return `Result<&mut Self, _>`, so calls compose with
/// `?`.
///
/// # Example
///
/// ```rust
/// use understory_dto::{PropertyError, PropertyStore, Value};
///
/// # fn main() -> Result<(), PropertyError> {
/// let mut store = PropertyStore::new();
/// store.set("name", "William")?.set("age", 28)?;
///
/// assert_eq!(store.get("age")?, Some(&Value::Int(28)));
/// assert!(store.changed("name")?);
///
/// // Persisted: nothing is dirty any more.
/// store.clean_all();
/// assert!(!store.changed("name")?);
///
/// // Re-setting an equal value is not a change.
/// store.set("age", 28)?;
/// assert!(!store.has_changes());
///
/// store.set("age", 29)?;
/// assert_eq!(store.changed_properties().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct PropertyStore {
    properties: ValueMap,
    changed: DirtyFlags<Key>,
}

impl PropertyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets every pair of `data`, in iteration order.
    ///
    /// With `replace`, the store is [reset](Self::reset) first, discarding
    /// all properties and flags.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidKey`] if any key in `data` is not a
    /// scalar. Keys are validated up front, so on error the store is left
    /// untouched, including when `replace` is set.
    pub fn fill<I, K, V>(&mut self, data: I, replace: bool) -> Result<&mut Self, PropertyError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: IntoKey,
        V: Into<Value>,
    {
        let entries = collect_entries(data)?;
        if replace {
            self.reset();
        }
        for (key, value) in entries {
            self.insert(key, value);
        }
        Ok(self)
    }

    /// Sets a property.
    ///
    /// The key is marked dirty if it is new or if `value` differs from the
    /// stored value. The value is stored either way.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidKey`] if `key` is not a scalar.
    pub fn set(
        &mut self,
        key: impl IntoKey,
        value: impl Into<Value>,
    ) -> Result<&mut Self, PropertyError> {
        let key = key.into_key()?;
        self.insert(key, value.into());
        Ok(self)
    }

    pub(crate) fn insert(&mut self, key: Key, value: Value) {
        let dirty = self
            .properties
            .get(&key)
            .is_none_or(|current| *current != value);
        if dirty {
            self.changed.mark(key.clone());
        }
        self.properties.insert(key, value);
    }

    /// Returns the value of a property, or `None` if it is not set.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidKey`] if `key` is not a scalar.
    pub fn get(&self, key: impl IntoKey) -> Result<Option<&Value>, PropertyError> {
        let key = key.into_key()?;
        Ok(self.properties.get(&key))
    }

    /// Returns the value of a property, or `default` if it is not set.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidKey`] if `key` is not a scalar.
    pub fn get_or<'a>(
        &'a self,
        key: impl IntoKey,
        default: &'a Value,
    ) -> Result<&'a Value, PropertyError> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Returns a snapshot of all properties, in insertion order.
    #[must_use]
    pub fn properties(&self) -> ValueMap {
        self.properties.clone()
    }

    /// Returns `true` if the property is currently set.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidKey`] if `key` is not a scalar.
    pub fn has_property(&self, key: impl IntoKey) -> Result<bool, PropertyError> {
        let key = key.into_key()?;
        Ok(self.properties.contains_key(&key))
    }

    /// Returns whether a property changed since it was last cleaned.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidKey`] if `key` is not a scalar, and
    /// [`PropertyError::NotFound`] if the property is not currently set.
    pub fn changed(&self, key: impl IntoKey) -> Result<bool, PropertyError> {
        let key = key.into_key()?;
        if !self.properties.contains_key(&key) {
            return Err(PropertyError::NotFound { key });
        }
        Ok(self.changed.is_dirty(&key))
    }

    /// Returns a snapshot of the dirty properties.
    ///
    /// Entries follow the order in which the keys were first marked.
    #[must_use]
    pub fn changed_properties(&self) -> ValueMap {
        self.changed
            .dirty()
            .filter_map(|key| {
                self.properties
                    .get(key)
                    .map(|value| (key.clone(), value.clone()))
            })
            .collect()
    }

    /// Returns an iterator over the dirty keys.
    pub fn changed_keys(&self) -> impl Iterator<Item = &Key> + '_ {
        self.changed.dirty()
    }

    /// Returns `true` if any property is dirty.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.changed.has_dirty()
    }

    /// Removes every property and flag.
    pub fn reset(&mut self) -> &mut Self {
        trace!(properties = self.properties.len(), "resetting property store");
        self.properties.clear();
        self.changed.clear();
        self
    }

    /// Marks a property as clean.
    ///
    /// Does nothing for keys that were never flagged.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidKey`] if `key` is not a scalar.
    pub fn clean_property(&mut self, key: impl IntoKey) -> Result<&mut Self, PropertyError> {
        let key = key.into_key()?;
        self.changed.clean(&key);
        Ok(self)
    }

    /// Marks every property as clean.
    pub fn clean_all(&mut self) -> &mut Self {
        let cleaned = self.changed.clean_all();
        trace!(cleaned, "cleaned all properties");
        self
    }

    /// Removes a property and its flag, returning the old value.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidKey`] if `key` is not a scalar.
    pub fn remove(&mut self, key: impl IntoKey) -> Result<Option<Value>, PropertyError> {
        let key = key.into_key()?;
        self.changed.forget(&key);
        Ok(self.properties.shift_remove(&key))
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if no properties are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Returns an iterator over the properties, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> + '_ {
        self.properties.iter()
    }

    /// Returns an iterator over the property keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> + '_ {
        self.properties.keys()
    }

    /// Returns the change generation.
    ///
    /// Increments whenever a dirty flag is set, cleaned or dropped.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.changed.generation()
    }
}

/// Reads a property, yielding [`Value::Null`] when it is not set.
impl Index<&Key> for PropertyStore {
    type Output = Value;

    fn index(&self, key: &Key) -> &Value {
        self.properties.get(key).unwrap_or(&NULL)
    }
}

/// Reads a string-keyed property, yielding [`Value::Null`] when it is not set.
impl Index<&str> for PropertyStore {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.properties.get(&StrKey(key)).unwrap_or(&NULL)
    }
}

impl<K: Into<Key>, V: Into<Value>> Extend<(K, V)> for PropertyStore {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key.into(), value.into());
        }
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for PropertyStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}
