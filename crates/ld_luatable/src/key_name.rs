use ld_reflect::info::FieldDescriptor;

// -----------------------------------------------------------------------------
// KeyNameStyle

/// Selects the text emitted as the table key for a field.
///
/// The policy is consulted for every ordinary field. It is never consulted
/// for the synthetic root wrapper key, which always uses the declared short
/// type name, because the root has no enclosing field descriptor.
///
/// # Examples
///
/// ```
/// use ld_luatable::KeyNameStyle;
/// use ld_reflect::info::{FieldDescriptor, FieldType, Kind, ValueType};
///
/// let field = FieldDescriptor::new(
///     "post_code",
///     1,
///     FieldType::Singular(ValueType::scalar(Kind::String)),
/// );
///
/// assert_eq!(KeyNameStyle::External.key_name(&field), "postCode");
/// assert_eq!(KeyNameStyle::Declared.key_name(&field), "post_code");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyNameStyle {
    /// The external lowerCamelCase name (the default).
    #[default]
    External,
    /// The declared name.
    Declared,
}

impl KeyNameStyle {
    /// Returns the key text for the given field under this policy.
    #[inline]
    pub fn key_name(self, field: &FieldDescriptor) -> &str {
        match self {
            Self::External => field.external_name(),
            Self::Declared => field.name(),
        }
    }
}
