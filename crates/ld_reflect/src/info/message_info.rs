use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::info::FieldDescriptor;

// -----------------------------------------------------------------------------
// MessageDescriptor

/// Schema of one message type: a fully-qualified dotted name and the declared
/// fields in **declaration order**.
///
/// Field order is owned by the descriptor, never by a message instance's
/// storage; consumers that iterate [`fields`](Self::fields) are guaranteed a
/// stable declaration-order walk.
///
/// # Examples
///
/// ```
/// use ld_reflect::info::{FieldDescriptor, FieldType, Kind, MessageDescriptor, ValueType};
///
/// let descriptor = MessageDescriptor::new(
///     "example.pkg.Recipient",
///     vec![
///         FieldDescriptor::new("name", 1, FieldType::Singular(ValueType::scalar(Kind::String))),
///         FieldDescriptor::new("city", 2, FieldType::Singular(ValueType::scalar(Kind::String))),
///     ],
/// );
///
/// assert_eq!(descriptor.name(), "Recipient");
/// assert_eq!(descriptor.parent(), "example.pkg");
/// assert_eq!(descriptor.field_by_number(2).unwrap().name(), "city");
/// assert_eq!(descriptor.field(1).unwrap().index(), 1);
/// ```
#[derive(Debug)]
pub struct MessageDescriptor {
    full_name: String,
    fields: Vec<FieldDescriptor>,
    by_number: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
}

impl MessageDescriptor {
    /// Creates a new [`MessageDescriptor`].
    ///
    /// The declaration order of `fields` is fixed; each field's index is
    /// assigned from its position here.
    ///
    /// # Panics
    ///
    /// Panics if two fields share a declared name or a numeric tag.
    pub fn new(full_name: impl Into<String>, mut fields: Vec<FieldDescriptor>) -> Self {
        let mut by_number = HashMap::with_capacity(fields.len());
        let mut by_name = HashMap::with_capacity(fields.len());

        for (index, field) in fields.iter_mut().enumerate() {
            field.set_index(index);
            let duplicate = by_number.insert(field.number(), index).is_some()
                || by_name.insert(String::from(field.name()), index).is_some();
            assert!(!duplicate, "duplicate field name or number");
        }

        Self {
            full_name: full_name.into(),
            fields,
            by_number,
            by_name,
        }
    }

    /// Returns the fully-qualified dotted type name.
    #[inline]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the short type name: the last dotted segment.
    pub fn name(&self) -> &str {
        self.full_name
            .rsplit_once('.')
            .map_or(self.full_name.as_str(), |(_, name)| name)
    }

    /// Returns the dotted package prefix, or `""` for an unqualified name.
    pub fn parent(&self) -> &str {
        self.full_name
            .rsplit_once('.')
            .map_or("", |(parent, _)| parent)
    }

    /// Returns the fields in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the field at the given declaration index, if present.
    #[inline]
    pub fn field(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    /// Returns the field with the given numeric tag, if present.
    pub fn field_by_number(&self, number: u32) -> Option<&FieldDescriptor> {
        self.by_number.get(&number).map(|&index| &self.fields[index])
    }

    /// Returns the field with the given declared name, if present.
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&index| &self.fields[index])
    }

    /// Returns the field with the given external name, if present.
    ///
    /// This is O(N) complexity.
    pub fn field_by_external_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.external_name() == name)
    }

    /// Returns the number of declared fields.
    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }
}

// -----------------------------------------------------------------------------
// Tests
