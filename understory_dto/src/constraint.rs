// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-property constraints.
//!
//! This module provides [`Constraint`], the rule a value must satisfy to be
//! stored under a key, and [`ConstraintSource`], through which the host
//! object supplies its constraint table and strictness to a
//! [`ConstrainedPropertyStore`](crate::ConstrainedPropertyStore).
//!
//! [`Constraints`] is a ready-made source with a builder.

use alloc::boxed::Box;
use alloc::sync::Arc;

use hashbrown::DefaultHashBuilder;
use indexmap::IndexMap;

use crate::error::{Expected, PropertyError};
use crate::key::Key;
use crate::value::{Callable, Value, ValueKind};

/// A map from property key to its [`Constraint`].
pub type ConstraintTable = IndexMap<Key, Constraint, DefaultHashBuilder>;

/// A rule restricting the values a property accepts.
#[derive(Clone, Debug, PartialEq)]
pub enum Constraint {
    /// The value's [kind](Value::kind) must equal this one.
    ///
    /// Only the tags [`ValueKind::from_name`] recognizes can be expressed
    /// this way. A tag no value ever reports (e.g. `"number"`) matches
    /// nothing, so a host carrying such a tag maps it to a predicate that
    /// always fails:
    ///
    /// ```rust
    /// use understory_dto::{Constraint, Key, Value, ValueKind};
    ///
    /// let from_tag = |tag: &str| {
    ///     ValueKind::from_name(tag)
    ///         .map_or_else(|| Constraint::predicate(|_| false), Constraint::Kind)
    /// };
    /// let key = Key::from("n");
    /// assert_eq!(from_tag("integer").check(&key, &Value::Int(1)), Ok(true));
    /// assert_eq!(from_tag("number").check(&key, &Value::Int(1)), Ok(false));
    /// ```
    Kind(ValueKind),
    /// The callback must return `Value::Bool(true)` for the value.
    ///
    /// Returning anything other than a boolean is a configuration error
    /// ([`PropertyError::InvalidConstraint`]).
    Callback(Callable),
}

impl Constraint {
    /// A constraint backed by a typed predicate.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Callback(Callable::new(move |value| Value::Bool(f(value))))
    }

    /// A constraint backed by a dynamic callback.
    ///
    /// The callback must return a [`Value::Bool`].
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self::Callback(Callable::new(f))
    }

    /// Describes this constraint for error reporting.
    #[must_use]
    pub fn expected(&self) -> Expected {
        match self {
            Self::Kind(kind) => Expected::Kind(*kind),
            Self::Callback(_) => Expected::Callback,
        }
    }

    /// Returns whether `value` satisfies this constraint.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidConstraint`] if a callback returns a
    /// non-boolean. `key` is only used to build that error.
    pub fn check(&self, key: &Key, value: &Value) -> Result<bool, PropertyError> {
        match self {
            Self::Kind(kind) => Ok(value.kind() == *kind),
            Self::Callback(callback) => match callback.call(value) {
                Value::Bool(accepted) => Ok(accepted),
                other => Err(PropertyError::InvalidConstraint {
                    key: key.clone(),
                    returned: other.kind(),
                }),
            },
        }
    }
}

impl From<ValueKind> for Constraint {
    fn from(kind: ValueKind) -> Self {
        Self::Kind(kind)
    }
}

impl From<Callable> for Constraint {
    fn from(callable: Callable) -> Self {
        Self::Callback(callable)
    }
}

/// Supplies constraints to a [`ConstrainedPropertyStore`](crate::ConstrainedPropertyStore).
///
/// The store never mutates the table. [`strict`](Self::strict) is consulted
/// each time a value fails its constraint, so a source may change its answer
/// between calls.
///
/// # Example
///
/// ```rust
/// use understory_dto::{Constraint, ConstraintSource, ConstraintTable, ValueKind};
///
/// struct UserSchema {
///     table: ConstraintTable,
/// }
///
/// impl ConstraintSource for UserSchema {
///     fn constraints(&self) -> &ConstraintTable {
///         &self.table
///     }
///
///     fn strict(&self) -> bool {
///         true
///     }
/// }
///
/// let mut table = ConstraintTable::default();
/// table.insert("age".into(), Constraint::Kind(ValueKind::Integer));
/// let schema = UserSchema { table };
/// assert_eq!(schema.constraints().len(), 1);
/// ```
pub trait ConstraintSource {
    /// Returns the constraint table.
    fn constraints(&self) -> &ConstraintTable;

    /// Returns `true` if constraint failures should raise
    /// [`PropertyError::ConstraintViolation`] instead of being ignored.
    fn strict(&self) -> bool {
        false
    }
}

impl ConstraintSource for ConstraintTable {
    fn constraints(&self) -> &ConstraintTable {
        self
    }
}

impl<S: ConstraintSource + ?Sized> ConstraintSource for &S {
    fn constraints(&self) -> &ConstraintTable {
        (**self).constraints()
    }

    fn strict(&self) -> bool {
        (**self).strict()
    }
}

impl<S: ConstraintSource + ?Sized> ConstraintSource for Box<S> {
    fn constraints(&self) -> &ConstraintTable {
        (**self).constraints()
    }

    fn strict(&self) -> bool {
        (**self).strict()
    }
}

impl<S: ConstraintSource + ?Sized> ConstraintSource for Arc<S> {
    fn constraints(&self) -> &ConstraintTable {
        (**self).constraints()
    }

    fn strict(&self) -> bool {
        (**self).strict()
    }
}

/// A constraint table plus a strict-mode flag.
///
/// # Example
///
/// ```rust
/// use understory_dto::{ConstraintSource, Constraints, Value, ValueKind};
///
/// let constraints = Constraints::new()
///     .kind("age", ValueKind::Integer)
///     .predicate("name", |v| v.as_str().is_some_and(|s| !s.is_empty()))
///     .strict_mode(true);
///
/// assert!(constraints.strict());
/// assert_eq!(constraints.constraints().len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Constraints {
    table: ConstraintTable,
    strict: bool,
}

impl Constraints {
    /// Creates an empty, non-strict set of constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint for `key`, replacing any previous one.
    #[must_use]
    pub fn with(mut self, key: impl Into<Key>, constraint: impl Into<Constraint>) -> Self {
        self.insert(key, constraint);
        self
    }

    /// Requires values of `key` to be of the given kind.
    #[must_use]
    pub fn kind(self, key: impl Into<Key>, kind: ValueKind) -> Self {
        self.with(key, kind)
    }

    /// Requires values of `key` to satisfy a predicate.
    #[must_use]
    pub fn predicate<F>(self, key: impl Into<Key>, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.with(key, Constraint::predicate(f))
    }

    /// Requires values of `key` to satisfy a dynamic callback.
    #[must_use]
    pub fn callback<F>(self, key: impl Into<Key>, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.with(key, Constraint::callback(f))
    }

    /// Sets whether failures raise errors.
    #[must_use]
    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Adds a constraint for `key`, returning the one it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<Key>,
        constraint: impl Into<Constraint>,
    ) -> Option<Constraint> {
        self.table.insert(key.into(), constraint.into())
    }

    /// Removes the constraint for `key`.
    pub fn remove(&mut self, key: &Key) -> Option<Constraint> {
        self.table.shift_remove(key)
    }

    /// Changes strictness in place.
    pub fn set_strict_mode(&mut self, strict: bool) {
        self.strict = strict;
    }
}

impl ConstraintSource for Constraints {
    fn constraints(&self) -> &ConstraintTable {
        &self.table
    }

    fn strict(&self) -> bool {
        self.strict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_check() {
        let constraint = Constraint::Kind(ValueKind::Integer);
        let key = Key::from("age");
        assert_eq!(constraint.check(&key, &Value::Int(3)), Ok(true));
        assert_eq!(constraint.check(&key, &Value::from("old")), Ok(false));
        assert_eq!(constraint.check(&key, &Value::Float(3.0)), Ok(false));
        assert_eq!(constraint.expected(), Expected::Kind(ValueKind::Integer));
    }

    #[test]
    fn unknown_tag_rejects_everything() {
        assert_eq!(ValueKind::from_name("number"), None);
        let constraint = ValueKind::from_name("number")
            .map_or_else(|| Constraint::predicate(|_| false), Constraint::Kind);
        let key = Key::from("n");
        for value in [Value::Int(1), Value::Float(1.5), Value::Null] {
            assert_eq!(constraint.check(&key, &value), Ok(false));
        }
        assert_eq!(constraint.expected(), Expected::Callback);
    }

    #[test]
    fn predicate_check() {
        let constraint = Constraint::predicate(|v| v.as_int().is_some_and(|i| i >= 0));
        let key = Key::from("age");
        assert_eq!(constraint.check(&key, &Value::Int(3)), Ok(true));
        assert_eq!(constraint.check(&key, &Value::Int(-3)), Ok(false));
        assert_eq!(constraint.expected(), Expected::Callback);
    }

    #[test]
    fn callback_must_return_bool() {
        let constraint = Constraint::callback(|_| Value::from("yes"));
        assert_eq!(
            constraint.check(&Key::from("ok"), &Value::Null),
            Err(PropertyError::InvalidConstraint {
                key: Key::from("ok"),
                returned: ValueKind::String,
            })
        );
    }

    #[test]
    fn builder() {
        let constraints = Constraints::new()
            .kind("age", ValueKind::Integer)
            .callback("flag", |_| Value::Bool(true))
            .strict_mode(true);

        assert!(constraints.strict());
        assert_eq!(
            constraints.constraints().get(&Key::from("age")),
            Some(&Constraint::Kind(ValueKind::Integer))
        );
        assert!(matches!(
            constraints.constraints().get(&Key::from("flag")),
            Some(Constraint::Callback(_))
        ));
    }

    #[test]
    fn insert_and_remove() {
        let mut constraints = Constraints::new();
        assert!(constraints.insert("a", ValueKind::String).is_none());
        assert_eq!(
            constraints.insert("a", ValueKind::Integer),
            Some(Constraint::Kind(ValueKind::String))
        );
        assert!(constraints.remove(&Key::from("a")).is_some());
        assert!(constraints.constraints().is_empty());
    }

    #[test]
    fn non_strict_by_default() {
        assert!(!Constraints::new().strict());
        assert!(!ConstraintTable::default().strict());
    }

    #[test]
    fn shared_sources_forward() {
        let constraints = Arc::new(Constraints::new().kind("a", ValueKind::Null).strict_mode(true));
        let by_ref: &Constraints = &constraints;
        let boxed: Box<dyn ConstraintSource> = Box::new(constraints.clone());

        assert!(constraints.strict());
        assert!(by_ref.strict());
        assert!(boxed.strict());
        assert_eq!(boxed.constraints().len(), 1);
    }
}
