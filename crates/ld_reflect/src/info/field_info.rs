use alloc::string::String;
use alloc::sync::Arc;

use crate::info::{Kind, MessageDescriptor};

// -----------------------------------------------------------------------------
// ValueType

/// The type of a single (non-repeated) value: a [`Kind`] plus, for
/// [`Kind::Message`], the descriptor of the nested message type.
#[derive(Clone, Debug)]
pub struct ValueType {
    kind: Kind,
    message: Option<Arc<MessageDescriptor>>,
}

impl ValueType {
    /// Creates a scalar value type.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is [`Kind::Message`]; message value types carry a
    /// descriptor and are created with [`ValueType::message`].
    pub fn scalar(kind: Kind) -> Self {
        assert!(
            !matches!(kind, Kind::Message),
            "message value types need a descriptor"
        );
        Self {
            kind,
            message: None,
        }
    }

    /// Creates a nested-message value type.
    pub fn message(descriptor: impl Into<Arc<MessageDescriptor>>) -> Self {
        Self {
            kind: Kind::Message,
            message: Some(descriptor.into()),
        }
    }

    /// Returns the value kind.
    #[inline]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the nested message descriptor, for [`Kind::Message`] types.
    #[inline]
    pub fn message_descriptor(&self) -> Option<&Arc<MessageDescriptor>> {
        self.message.as_ref()
    }
}

// -----------------------------------------------------------------------------
// MapKeyKind

/// The admissible kinds for map keys: integers and strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKeyKind {
    Int32,
    Int64,
    Uint32,
    Uint64,
    String,
}

// -----------------------------------------------------------------------------
// FieldType

/// How a field holds its values: one value, an ordered list, or a map.
#[derive(Clone, Debug)]
pub enum FieldType {
    /// A single optional value. Presence is tracked per message instance.
    Singular(ValueType),
    /// An ordered list of values, always present, possibly empty.
    List(ValueType),
    /// An unordered key/value collection, always present, possibly empty.
    Map { key: MapKeyKind, value: ValueType },
}

impl FieldType {
    /// Returns `true` for list fields.
    #[inline]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns `true` for map fields.
    #[inline]
    pub const fn is_map(&self) -> bool {
        matches!(self, Self::Map { .. })
    }

    /// Returns the [`ValueType`] of the values this field holds: the field's
    /// own type for singular fields, the element type for lists, and the
    /// entry value type for maps.
    pub const fn value_type(&self) -> &ValueType {
        match self {
            Self::Singular(ty) | Self::List(ty) => ty,
            Self::Map { value, .. } => value,
        }
    }
}

// -----------------------------------------------------------------------------
// FieldDescriptor

/// Metadata for one declared field of a message type.
///
/// A field carries two names: the declared (snake_case) name and an external
/// lowerCamelCase name used where keys leave the system. The external name is
/// derived from the declared name unless overridden with
/// [`with_external_name`](Self::with_external_name).
///
/// The declaration-order index is assigned by the owning
/// [`MessageDescriptor`]; a free-standing field reports index `0`.
///
/// # Examples
///
/// ```
/// use ld_reflect::info::{FieldDescriptor, FieldType, Kind, ValueType};
///
/// let field = FieldDescriptor::new(
///     "post_code",
///     4,
///     FieldType::Singular(ValueType::scalar(Kind::String)),
/// );
///
/// assert_eq!(field.name(), "post_code");
/// assert_eq!(field.external_name(), "postCode");
/// assert_eq!(field.number(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    name: String,
    external_name: String,
    number: u32,
    index: usize,
    field_type: FieldType,
}

impl FieldDescriptor {
    /// Creates a new [`FieldDescriptor`] with the given declared name,
    /// numeric tag and field type.
    pub fn new(name: impl Into<String>, number: u32, field_type: FieldType) -> Self {
        let name = name.into();
        let external_name = derive_external_name(&name);
        Self {
            name,
            external_name,
            number,
            index: 0,
            field_type,
        }
    }

    /// Overrides the derived external name.
    pub fn with_external_name(mut self, external_name: impl Into<String>) -> Self {
        self.external_name = external_name.into();
        self
    }

    /// Returns the declared field name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the external (lowerCamelCase) field name.
    #[inline]
    pub fn external_name(&self) -> &str {
        &self.external_name
    }

    /// Returns the stable numeric tag.
    #[inline]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Returns the declaration-order index inside the owning message type.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the field's type.
    #[inline]
    pub const fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}

/// Derives the external lowerCamelCase name from a declared snake_case name.
fn derive_external_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

// -----------------------------------------------------------------------------
// Tests
