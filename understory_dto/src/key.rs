// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property keys.
//!
//! A property is named by a scalar [`Key`]: null, a boolean, a number or a
//! string. Keys of different kinds never collide, so `1`, `1.0` and `"1"`
//! name three different properties.
//!
//! Operations accept anything implementing [`IntoKey`]. Scalars convert
//! infallibly; a [`Value`] converts only when it is a scalar, otherwise the
//! operation fails with [`PropertyError::InvalidKey`] before touching any
//! state.

use alloc::string::String;
use core::fmt;
use core::hash::{Hash, Hasher};

use indexmap::Equivalent;

use crate::error::PropertyError;
use crate::value::{Value, ValueKind};

const STRING_TAG: u8 = 4;

/// The name of a property.
///
/// # Float keys
///
/// Float keys compare by bit pattern, with `-0.0` folded into `0.0` and every
/// NaN folded into a single NaN, so that `Key` can be a proper `Eq + Hash`
/// map key.
///
/// # Example
///
/// ```rust
/// use understory_dto::Key;
///
/// assert_eq!(Key::from("name"), Key::String("name".into()));
/// assert_ne!(Key::from(1), Key::from(1.0));
/// assert_eq!(Key::from(0.0), Key::from(-0.0));
/// assert_eq!(Key::from(f64::NAN), Key::from(f64::NAN));
/// ```
#[derive(Clone, Debug)]
pub enum Key {
    /// The null key.
    Null,
    /// A boolean key.
    Bool(bool),
    /// An integer key.
    Int(i64),
    /// A float key.
    Float(f64),
    /// A string key.
    String(String),
}

impl Key {
    /// Returns the runtime type of this key.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Boolean,
            Self::Int(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
        }
    }

    /// Returns the string slice, if this is a string key.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Hash tag per variant. Stable so that borrowed lookups hash alike.
    #[inline]
    fn tag(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Float(_) => 3,
            Self::String(_) => STRING_TAG,
        }
    }

    /// Canonical bits for float identity.
    #[inline]
    fn float_bits(f: f64) -> u64 {
        if f == 0.0 {
            0_u64
        } else if f.is_nan() {
            f64::NAN.to_bits()
        } else {
            f.to_bits()
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => Self::float_bits(*a) == Self::float_bits(*b),
            (Self::String(a), Self::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag().hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(f) => Self::float_bits(*f).hash(state),
            Self::String(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// A borrowed string key, for map lookups that must not allocate.
///
/// Hashes exactly like the equal [`Key::String`].
#[derive(Copy, Clone, Debug)]
pub(crate) struct StrKey<'a>(pub(crate) &'a str);

impl Hash for StrKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        STRING_TAG.hash(state);
        self.0.hash(state);
    }
}

impl Equivalent<Key> for StrKey<'_> {
    fn equivalent(&self, key: &Key) -> bool {
        key.as_str() == Some(self.0)
    }
}

macro_rules! key_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Key {
                #[inline]
                fn from(k: $ty) -> Self {
                    Self::$variant(k.into())
                }
            }
        )*
    };
}

key_from! {
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
    &String => String,
    String => String,
}

impl From<()> for Key {
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl TryFrom<Value> for Key {
    type Error = PropertyError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Int(i) => Ok(Self::Int(i)),
            Value::Float(f) => Ok(Self::Float(f)),
            Value::String(s) => Ok(Self::String(s)),
            other => Err(PropertyError::InvalidKey { kind: other.kind() }),
        }
    }
}

impl TryFrom<&Value> for Key {
    type Error = PropertyError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Int(i) => Ok(Self::Int(*i)),
            Value::Float(f) => Ok(Self::Float(*f)),
            Value::String(s) => Ok(Self::String(s.clone())),
            other => Err(PropertyError::InvalidKey { kind: other.kind() }),
        }
    }
}

/// Conversion into a [`Key`], validating that the source is a scalar.
///
/// Every property operation takes its key through this trait, so a
/// non-scalar key is rejected before the operation mutates anything.
///
/// ```rust
/// use understory_dto::{IntoKey, Key, PropertyError, Value, ValueKind};
///
/// assert_eq!("age".into_key(), Ok(Key::from("age")));
/// assert_eq!(None::<i32>.into_key(), Ok(Key::Null));
/// assert_eq!(
///     Value::from(vec![1, 2]).into_key(),
///     Err(PropertyError::InvalidKey { kind: ValueKind::List }),
/// );
/// ```
pub trait IntoKey {
    /// Converts `self` into a key.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidKey`] if `self` is not a scalar.
    fn into_key(self) -> Result<Key, PropertyError>;
}

macro_rules! scalar_into_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoKey for $ty {
                #[inline]
                fn into_key(self) -> Result<Key, PropertyError> {
                    Ok(Key::from(self))
                }
            }
        )*
    };
}

scalar_into_key!(
    Key, bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, &str, &String, String, ()
);

impl IntoKey for &Key {
    #[inline]
    fn into_key(self) -> Result<Key, PropertyError> {
        Ok(self.clone())
    }
}

impl IntoKey for Value {
    #[inline]
    fn into_key(self) -> Result<Key, PropertyError> {
        Key::try_from(self)
    }
}

impl IntoKey for &Value {
    #[inline]
    fn into_key(self) -> Result<Key, PropertyError> {
        Key::try_from(self)
    }
}

impl<T: IntoKey> IntoKey for Option<T> {
    #[inline]
    fn into_key(self) -> Result<Key, PropertyError> {
        self.map_or(Ok(Key::Null), IntoKey::into_key)
    }
}
