// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamic property values.
//!
//! This module provides [`Value`], the payload type of a property bag, along
//! with [`ValueKind`] (its runtime type tag) and [`Callable`] (a shared
//! function value).
//!
//! # Equality
//!
//! Change detection compares values with `==`, which for [`Value`] is deep
//! structural equality:
//!
//! - scalars compare by value, never across kinds (`Int(1) != Float(1.0)`)
//! - floats use IEEE equality, so `NaN` never equals itself
//! - lists compare element-wise; maps compare entry by entry in order, so
//!   reordering a map's entries is a change
//! - callables compare by identity: two clones of the same [`Callable`] are
//!   equal, two separately created closures are not

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::DefaultHashBuilder;
use indexmap::IndexMap;

use crate::key::Key;

/// An insertion-ordered map from [`Key`] to [`Value`].
///
/// Used both for nested map values and for property snapshots.
pub type ValueMap = IndexMap<Key, Value, DefaultHashBuilder>;

/// The runtime type of a [`Value`].
///
/// Type constraints compare a value's kind against an expected kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Null`].
    Null,
    /// [`Value::Bool`].
    Boolean,
    /// [`Value::Int`].
    Integer,
    /// [`Value::Float`].
    Float,
    /// [`Value::String`].
    String,
    /// [`Value::List`].
    List,
    /// [`Value::Map`].
    Map,
    /// [`Value::Callable`].
    Callable,
}

impl ValueKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Null,
        Self::Boolean,
        Self::Integer,
        Self::Float,
        Self::String,
        Self::List,
        Self::Map,
        Self::Callable,
    ];

    /// Returns the lowercase type name, e.g. `"integer"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::List => "list",
            Self::Map => "map",
            Self::Callable => "callable",
        }
    }

    /// Looks a kind up by its [name](Self::name).
    ///
    /// ```rust
    /// use understory_dto::ValueKind;
    ///
    /// assert_eq!(ValueKind::from_name("integer"), Some(ValueKind::Integer));
    /// assert_eq!(ValueKind::from_name("number"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Returns `true` for kinds that may be used as property keys.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::Null | Self::Boolean | Self::Integer | Self::Float | Self::String
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A shared function value.
///
/// Wraps a closure taking a [`Value`] and returning a [`Value`]. Cloning is
/// cheap and clones compare equal to each other.
///
/// # Example
///
/// ```rust
/// use understory_dto::{Callable, Value};
///
/// let double = Callable::new(|v| match v {
///     Value::Int(i) => Value::Int(i * 2),
///     _ => Value::Null,
/// });
///
/// assert_eq!(double.call(&Value::Int(21)), Value::Int(42));
/// assert_eq!(double, double.clone());
/// ```
#[derive(Clone)]
pub struct Callable(Arc<dyn Fn(&Value) -> Value + Send + Sync>);

impl Callable {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invokes the wrapped closure.
    #[inline]
    pub fn call(&self, value: &Value) -> Value {
        (self.0)(value)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").finish_non_exhaustive()
    }
}

/// A dynamically typed property value.
///
/// # Example
///
/// ```rust
/// use understory_dto::{Value, ValueKind};
///
/// let age = Value::from(28);
/// assert_eq!(age.kind(), ValueKind::Integer);
/// assert_eq!(age.as_int(), Some(28));
///
/// let tags = Value::from(vec!["a", "b"]);
/// assert_eq!(tags.kind(), ValueKind::List);
///
/// assert!(Value::default().is_null());
/// ```
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// The absence of a value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A keyed map of values.
    Map(ValueMap),
    /// A function value.
    Callable(Callable),
}

impl Value {
    /// Returns the runtime type of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Boolean,
            Self::Int(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
            Self::Callable(_) => ValueKind::Callable,
        }
    }

    /// Returns `true` if this is [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float, if this is one.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the list elements, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the map, if this is one.
    #[must_use]
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the callable, if this is one.
    #[must_use]
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Self::Callable(c) => Some(c),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            // `IndexMap`'s own equality ignores order.
            (Self::Map(a), Self::Map(b)) => a.len() == b.len() && a.iter().eq(b.iter()),
            (Self::Callable(a), Self::Callable(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    &str => String,
    String => String,
    ValueMap => Map,
    Callable => Callable,
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Null => Self::Null,
            Key::Bool(b) => Self::Bool(b),
            Key::Int(i) => Self::Int(i),
            Key::Float(f) => Self::Float(f),
            Key::String(s) => Self::String(s),
        }
    }
}

impl<K: Into<Key>, V: Into<Self>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
