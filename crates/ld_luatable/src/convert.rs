use ld_reflect::Message;
use ld_reflect::types::NUM_PACKAGE;

use crate::error::EncodeError;
use crate::marshal::MarshalDriver;

// -----------------------------------------------------------------------------
// UserConverter

/// A replacement encoder for one message type.
///
/// The function fully owns serialization of the instance it is handed; the
/// generic field recursion is bypassed entirely.
pub type ConvertFn = fn(&mut MarshalDriver<'_>, &dyn Message) -> Result<(), EncodeError>;

/// Defines how caller-specific message types are converted.
///
/// Converters are probed in registration order before any other encoding is
/// considered. For a given fully-qualified type name, a converter returns
/// the replacement encoder, `Ok(None)` to decline, or an error to abort the
/// whole marshal call (for a type it owns but cannot encode).
pub trait UserConverter {
    fn handle(&self, full_name: &str) -> Result<Option<ConvertFn>, EncodeError>;
}

// -----------------------------------------------------------------------------
// DecimalConverter

const DECIMAL: &str = "Decimal";

/// The shipped converter for the `luadoc.num` package.
///
/// `Decimal` carries exact decimal digits in its string field; the converter
/// injects them into the output as a raw unquoted numeral, so `"3.35"`
/// renders as `3.35` with the digits untouched.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use ld_luatable::{DecimalConverter, MarshalOptions};
/// use ld_reflect::ops::DynamicMessage;
/// use ld_reflect::types;
///
/// let mut amount = DynamicMessage::new(types::decimal());
/// amount.set(1, "19.99");
///
/// let options = MarshalOptions {
///     user_converters: vec![Arc::new(DecimalConverter)],
///     ..MarshalOptions::default()
/// };
///
/// assert_eq!(options.marshal(&amount).unwrap(), b"Decimal=19.99");
/// ```
pub struct DecimalConverter;

impl UserConverter for DecimalConverter {
    fn handle(&self, full_name: &str) -> Result<Option<ConvertFn>, EncodeError> {
        if let Some((parent, name)) = full_name.rsplit_once('.') {
            if parent == NUM_PACKAGE {
                return match name {
                    DECIMAL => Ok(Some(convert_decimal)),
                    _ => Err(EncodeError::unsupported_type(full_name)),
                };
            }
        }
        Ok(None)
    }
}

fn convert_decimal(
    driver: &mut MarshalDriver<'_>,
    message: &dyn Message,
) -> Result<(), EncodeError> {
    let field = message.descriptor().field_by_number(1);
    let value = field.and_then(|f| message.field(f.index()));
    match value {
        Some(value) => {
            let digits = value
                .as_str()
                .ok_or_else(|| EncodeError::mismatched_value("value"))?;
            driver.writer().write_number(digits);
        }
        // An unset value field still has to produce a valid numeral.
        None => driver.writer().write_number("0"),
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests
