use ld_reflect::types::TYPES_PACKAGE;

use crate::convert::ConvertFn;
use crate::error::EncodeError;

const TIMESTAMP: &str = "Timestamp";

/// Returns the specialized encoder for a framework-defined message type, or
/// `None` if the type encodes generically. Types under the framework package
/// without a defined encoding are an error.
pub(crate) fn well_known_marshaler(full_name: &str) -> Result<Option<ConvertFn>, EncodeError> {
    if let Some((parent, name)) = full_name.rsplit_once('.') {
        if parent == TYPES_PACKAGE {
            return match name {
                // A timestamp stays a plain table: the Lua runtime rebuilds
                // date/time from the numeric sub-fields with os.date/os.time.
                TIMESTAMP => Ok(None),
                _ => Err(EncodeError::unsupported_type(full_name)),
            };
        }
    }
    Ok(None)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::well_known_marshaler;

    #[test]
    fn timestamp_falls_through_to_generic_encoding() {
        assert!(matches!(
            well_known_marshaler("luadoc.types.Timestamp"),
            Ok(None)
        ));
    }

    #[test]
    fn unknown_framework_types_are_rejected() {
        assert!(well_known_marshaler("luadoc.types.Duration").is_err());
    }

    #[test]
    fn foreign_packages_are_ignored() {
        assert!(matches!(well_known_marshaler("acme.Duration"), Ok(None)));
        assert!(matches!(well_known_marshaler("Unqualified"), Ok(None)));
    }
}
