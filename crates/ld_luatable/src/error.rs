use alloc::string::String;
use core::{error, fmt};

use ld_reflect::info::Kind;

// -----------------------------------------------------------------------------
// EncodeError

/// An enumeration of all error outcomes of a marshal call.
///
/// There is no local recovery anywhere in the encoding core: every error
/// aborts the whole call, and a caller receiving one must treat any produced
/// output as unusable.
#[derive(Debug)]
pub enum EncodeError {
    /// The configured indent contains characters other than space and tab.
    ///
    /// Detected before anything is written.
    InvalidIndent,
    /// A value of a kind the encoding does not support was encountered.
    UnsupportedKind { kind: Kind },
    /// A well-known or converter-claimed type has no defined encoding.
    UnsupportedType { type_name: String },
    /// A character the escaping contract refuses to encode.
    UnsupportedEscape { ch: char },
    /// A stored value does not match the declared type of its field.
    MismatchedValue { field: String },
}

impl EncodeError {
    pub(crate) fn unsupported_type(type_name: &str) -> Self {
        Self::UnsupportedType {
            type_name: String::from(type_name),
        }
    }

    pub(crate) fn mismatched_value(field: &str) -> Self {
        Self::MismatchedValue {
            field: String::from(field),
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIndent => {
                write!(f, "indent must be space or tab characters")
            }
            Self::UnsupportedKind { kind } => {
                write!(f, "values of kind `{kind}` are not supported yet")
            }
            Self::UnsupportedType { type_name } => {
                write!(f, "`{type_name}` is not supported yet")
            }
            Self::UnsupportedEscape { ch } => {
                write!(f, "no escape defined for character {ch:?}")
            }
            Self::MismatchedValue { field } => {
                write!(f, "value of field `{field}` does not match its declared type")
            }
        }
    }
}

impl error::Error for EncodeError {}
