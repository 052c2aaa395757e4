use alloc::sync::Arc;
use core::fmt;

use hashbrown::HashMap;

use crate::Message;
use crate::info::MessageDescriptor;
use crate::ops::Value;

// -----------------------------------------------------------------------------
// DynamicMessage

/// A message value typed by a descriptor, with sparse field storage.
///
/// Fields are stored by numeric tag in a hash map, so the storage's own
/// iteration order carries no meaning; declaration order lives exclusively in
/// the descriptor, which is what [`Message`] consumers walk.
///
/// An unset field is simply absent from the storage. Setting a field whose
/// tag the descriptor does not declare is programmer error.
///
/// # Examples
///
/// ```
/// use ld_reflect::Message;
/// use ld_reflect::info::{FieldDescriptor, FieldType, Kind, MessageDescriptor, ValueType};
/// use ld_reflect::ops::DynamicMessage;
///
/// let descriptor = MessageDescriptor::new(
///     "example.Item",
///     vec![
///         FieldDescriptor::new("description", 1, FieldType::Singular(ValueType::scalar(Kind::String))),
///         FieldDescriptor::new("quantity", 2, FieldType::Singular(ValueType::scalar(Kind::Int32))),
///     ],
/// );
///
/// let mut item = DynamicMessage::new(descriptor);
/// item.set(1, "Espresso").set_by_name("quantity", 2_i32);
///
/// assert!(item.is_valid());
/// assert_eq!(item.field(1).unwrap().as_i32(), Some(2));
/// ```
pub struct DynamicMessage {
    descriptor: Arc<MessageDescriptor>,
    values: HashMap<u32, Value>,
}

impl DynamicMessage {
    /// Creates an empty `DynamicMessage` of the described type.
    pub fn new(descriptor: impl Into<Arc<MessageDescriptor>>) -> Self {
        Self {
            descriptor: descriptor.into(),
            values: HashMap::new(),
        }
    }

    /// Sets the field with the given numeric tag.
    ///
    /// # Panics
    ///
    /// Panics if the descriptor declares no field with this tag.
    pub fn set(&mut self, number: u32, value: impl Into<Value>) -> &mut Self {
        assert!(
            self.descriptor.field_by_number(number).is_some(),
            "field tag not declared by the descriptor"
        );
        self.values.insert(number, value.into());
        self
    }

    /// Sets the field with the given declared name.
    ///
    /// # Panics
    ///
    /// Panics if the descriptor declares no field with this name.
    pub fn set_by_name(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        let number = self
            .descriptor
            .field_by_name(name)
            .expect("field name not declared by the descriptor")
            .number();
        self.values.insert(number, value.into());
        self
    }

    /// Returns the value stored for the given numeric tag, if set.
    #[inline]
    pub fn get(&self, number: u32) -> Option<&Value> {
        self.values.get(&number)
    }

    /// Clears the field with the given numeric tag, returning any previous
    /// value.
    #[inline]
    pub fn clear(&mut self, number: u32) -> Option<Value> {
        self.values.remove(&number)
    }
}

impl Message for DynamicMessage {
    #[inline]
    fn descriptor(&self) -> &MessageDescriptor {
        &self.descriptor
    }

    fn field(&self, index: usize) -> Option<&Value> {
        let field = self.descriptor.field(index)?;
        self.values.get(&field.number())
    }

    fn is_valid(&self) -> bool {
        self.values.iter().all(|(number, value)| {
            self.descriptor
                .field_by_number(*number)
                .is_some_and(|field| value.matches(field.field_type()))
        })
    }
}

impl fmt::Debug for DynamicMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DynamicMessage({}, {} fields set)",
            self.descriptor.full_name(),
            self.values.len()
        )
    }
}

impl From<DynamicMessage> for Value {
    #[inline]
    fn from(message: DynamicMessage) -> Self {
        Value::message(message)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::DynamicMessage;
    use crate::Message;
    use crate::info::{FieldDescriptor, FieldType, Kind, MessageDescriptor, ValueType};

    fn descriptor() -> MessageDescriptor {
        MessageDescriptor::new(
            "test.Sample",
            vec![
                FieldDescriptor::new("flag", 1, FieldType::Singular(ValueType::scalar(Kind::Bool))),
                FieldDescriptor::new("count", 2, FieldType::Singular(ValueType::scalar(Kind::Int32))),
            ],
        )
    }

    #[test]
    fn unset_fields_are_absent() {
        let mut message = DynamicMessage::new(descriptor());
        message.set(2, 5_i32);

        assert!(message.field(0).is_none());
        assert_eq!(message.field(1).unwrap().as_i32(), Some(5));
    }

    #[test]
    fn mismatched_value_invalidates() {
        let mut message = DynamicMessage::new(descriptor());
        message.set(1, "not a bool");

        assert!(!message.is_valid());
        message.clear(1);
        assert!(message.is_valid());
    }

    #[test]
    #[should_panic(expected = "field tag not declared")]
    fn undeclared_tag_panics() {
        DynamicMessage::new(descriptor()).set(9, 1_i32);
    }
}
