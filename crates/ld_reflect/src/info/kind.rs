use core::fmt;

// -----------------------------------------------------------------------------
// Kind

/// An enumeration of the wire kinds a single value can have.
///
/// The full kind set is representable so that a consumer can dispatch on any
/// declared field and decide for itself which kinds it supports; the kinds a
/// consumer rejects still need a name to reject them with.
///
/// # Examples
///
/// ```
/// use ld_reflect::info::Kind;
///
/// assert!(Kind::Sfixed64.is_64bit());
/// assert!(!Kind::Uint32.is_64bit());
/// assert_eq!(Kind::Double.to_string(), "Double");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int32,
    Sint32,
    Sfixed32,
    Uint32,
    Fixed32,
    Int64,
    Sint64,
    Sfixed64,
    Uint64,
    Fixed64,
    Float,
    Double,
    String,
    Bytes,
    Enum,
    Message,
}

impl Kind {
    /// Returns `true` for the 32-bit signed integer kinds.
    #[inline]
    pub const fn is_signed_32(self) -> bool {
        matches!(self, Self::Int32 | Self::Sint32 | Self::Sfixed32)
    }

    /// Returns `true` for the 32-bit unsigned integer kinds.
    #[inline]
    pub const fn is_unsigned_32(self) -> bool {
        matches!(self, Self::Uint32 | Self::Fixed32)
    }

    /// Returns `true` for every 64-bit integer kind, signed or unsigned.
    ///
    /// These are the kinds whose values must travel as raw pre-formatted
    /// numerals; a general numeric rendering would round them.
    #[inline]
    pub const fn is_64bit(self) -> bool {
        matches!(
            self,
            Self::Int64 | Self::Sint64 | Self::Sfixed64 | Self::Uint64 | Self::Fixed64
        )
    }

    /// Returns `true` for the 64-bit signed integer kinds.
    #[inline]
    pub const fn is_signed_64(self) -> bool {
        matches!(self, Self::Int64 | Self::Sint64 | Self::Sfixed64)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.pad("Bool"),
            Self::Int32 => f.pad("Int32"),
            Self::Sint32 => f.pad("Sint32"),
            Self::Sfixed32 => f.pad("Sfixed32"),
            Self::Uint32 => f.pad("Uint32"),
            Self::Fixed32 => f.pad("Fixed32"),
            Self::Int64 => f.pad("Int64"),
            Self::Sint64 => f.pad("Sint64"),
            Self::Sfixed64 => f.pad("Sfixed64"),
            Self::Uint64 => f.pad("Uint64"),
            Self::Fixed64 => f.pad("Fixed64"),
            Self::Float => f.pad("Float"),
            Self::Double => f.pad("Double"),
            Self::String => f.pad("String"),
            Self::Bytes => f.pad("Bytes"),
            Self::Enum => f.pad("Enum"),
            Self::Message => f.pad("Message"),
        }
    }
}
