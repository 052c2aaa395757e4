use crate::info::MessageDescriptor;
use crate::ops::Value;

// -----------------------------------------------------------------------------
// Message

/// The describe-yourself capability of a message value.
///
/// A message exposes its schema ([`descriptor`](Self::descriptor)) and
/// read-only access to its field values by declaration index. Consumers walk
/// the descriptor's field list and call [`field`](Self::field) per field;
/// they never see, and therefore never depend on, the storage's own
/// iteration order.
///
/// # Presence
///
/// [`field`](Self::field) returns `None` for an unset field. Singular fields
/// track presence per instance; list and map fields are conceptually always
/// present, so consumers treat `None` for them as an empty container.
///
/// # Examples
///
/// ```
/// use ld_reflect::Message;
/// use ld_reflect::info::{FieldDescriptor, FieldType, Kind, MessageDescriptor, ValueType};
/// use ld_reflect::ops::DynamicMessage;
///
/// let descriptor = MessageDescriptor::new(
///     "example.Recipient",
///     vec![FieldDescriptor::new(
///         "name",
///         1,
///         FieldType::Singular(ValueType::scalar(Kind::String)),
///     )],
/// );
///
/// let mut message = DynamicMessage::new(descriptor);
/// message.set(1, "Max Mustermann");
///
/// let value = message.field(0).unwrap();
/// assert_eq!(value.as_str(), Some("Max Mustermann"));
/// ```
pub trait Message {
    /// Returns the descriptor of this message's type.
    fn descriptor(&self) -> &MessageDescriptor;

    /// Returns the value of the field at the given declaration index, or
    /// `None` if the field is unset (or the index is out of bounds).
    fn field(&self, index: usize) -> Option<&Value>;

    /// Reports whether the stored values structurally match the schema.
    ///
    /// The default implementation returns `true`; statically shaped message
    /// types cannot hold mismatched values. Dynamic containers override this.
    fn is_valid(&self) -> bool {
        true
    }
}
