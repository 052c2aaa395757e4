use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::Message;
use crate::info::{FieldType, Kind, ValueType};
use crate::ops::{ListValue, MapValue};

// -----------------------------------------------------------------------------
// Value

/// An owned dynamic value.
///
/// Every wire kind is representable, including the kinds a given consumer may
/// refuse to handle: refusing requires seeing the value first. Nested
/// messages are held as trait objects so a value tree can mix message types.
///
/// # Examples
///
/// ```
/// use ld_reflect::ops::Value;
///
/// let value = Value::from("EUR");
/// assert_eq!(value.as_str(), Some("EUR"));
/// assert_eq!(value.as_bool(), None);
/// ```
pub enum Value {
    Bool(bool),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    Enum(i32),
    Message(Box<dyn Message>),
    List(ListValue),
    Map(MapValue),
}

impl Value {
    /// Creates a message value from any [`Message`] implementation.
    ///
    /// Concrete containers also convert via `From` (see
    /// [`DynamicMessage`](crate::ops::DynamicMessage)); this constructor is
    /// the type-erasing general form.
    #[inline]
    pub fn message(message: impl Message + 'static) -> Self {
        Self::Message(Box::new(message))
    }

    /// Returns the inner boolean, if this is a boolean value.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the inner `i32`, if this is a 32-bit signed value.
    #[inline]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the inner `u32`, if this is a 32-bit unsigned value.
    #[inline]
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the inner `i64`, if this is a 64-bit signed value.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the inner `u64`, if this is a 64-bit unsigned value.
    #[inline]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the inner string slice, if this is a string value.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the inner message, if this is a message value.
    #[inline]
    pub fn as_message(&self) -> Option<&dyn Message> {
        match self {
            Self::Message(value) => Some(&**value),
            _ => None,
        }
    }

    /// Returns the inner list, if this is a list value.
    #[inline]
    pub fn as_list(&self) -> Option<&ListValue> {
        match self {
            Self::List(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the inner map, if this is a map value.
    #[inline]
    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Self::Map(value) => Some(value),
            _ => None,
        }
    }

    /// Reports whether this value structurally matches the given field type.
    ///
    /// List and map values are checked element-wise; message values must
    /// carry the declared type (compared by full name) and be valid
    /// themselves.
    pub fn matches(&self, field_type: &FieldType) -> bool {
        match field_type {
            FieldType::Singular(ty) => self.matches_value_type(ty),
            FieldType::List(ty) => match self {
                Self::List(list) => list.iter().all(|item| item.matches_value_type(ty)),
                _ => false,
            },
            FieldType::Map { key, value } => match self {
                Self::Map(map) => map
                    .iter()
                    .all(|(k, v)| k.matches(*key) && v.matches_value_type(value)),
                _ => false,
            },
        }
    }

    fn matches_value_type(&self, ty: &ValueType) -> bool {
        match (self, ty.kind()) {
            (Self::Bool(_), Kind::Bool)
            | (Self::F32(_), Kind::Float)
            | (Self::F64(_), Kind::Double)
            | (Self::String(_), Kind::String)
            | (Self::Bytes(_), Kind::Bytes)
            | (Self::Enum(_), Kind::Enum) => true,
            (Self::I32(_), kind) => kind.is_signed_32(),
            (Self::U32(_), kind) => kind.is_unsigned_32(),
            (Self::I64(_), kind) => kind.is_signed_64(),
            (Self::U64(_), kind) => kind.is_64bit() && !kind.is_signed_64(),
            (Self::Message(message), Kind::Message) => {
                ty.message_descriptor().is_none_or(|descriptor| {
                    message.descriptor().full_name() == descriptor.full_name()
                }) && message.is_valid()
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "Bool({value})"),
            Self::I32(value) => write!(f, "I32({value})"),
            Self::U32(value) => write!(f, "U32({value})"),
            Self::I64(value) => write!(f, "I64({value})"),
            Self::U64(value) => write!(f, "U64({value})"),
            Self::F32(value) => write!(f, "F32({value})"),
            Self::F64(value) => write!(f, "F64({value})"),
            Self::String(value) => write!(f, "String({value:?})"),
            Self::Bytes(value) => write!(f, "Bytes(len={})", value.len()),
            Self::Enum(value) => write!(f, "Enum({value})"),
            Self::Message(value) => write!(f, "Message({})", value.descriptor().full_name()),
            Self::List(value) => f.debug_tuple("List").field(value).finish(),
            Self::Map(value) => f.debug_tuple("Map").field(value).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(value: i32) -> Self {
        Self::I32(value)
    }
}

impl From<u32> for Value {
    #[inline]
    fn from(value: u32) -> Self {
        Self::U32(value)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<u64> for Value {
    #[inline]
    fn from(value: u64) -> Self {
        Self::U64(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(String::from(value))
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<ListValue> for Value {
    #[inline]
    fn from(value: ListValue) -> Self {
        Self::List(value)
    }
}

impl From<MapValue> for Value {
    #[inline]
    fn from(value: MapValue) -> Self {
        Self::Map(value)
    }
}
