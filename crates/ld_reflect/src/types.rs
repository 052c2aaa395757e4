//! Descriptors for the framework-defined message types.
//!
//! Two small packages ship with the framework:
//!
//! - `luadoc.types`: types the encoding layer knows about. Only
//!   [`Timestamp`](timestamp) exists today; its encoding is intentionally the
//!   generic one, because the Lua runtime rebuilds date/time values from the
//!   plain numeric sub-fields (`os.date`/`os.time`).
//! - `luadoc.num`: numeric carrier types handled by shipped user
//!   converters. [`Decimal`](decimal) carries an exact decimal numeral as a
//!   string so no binary floating-point rounding ever touches it.

use alloc::sync::Arc;
use alloc::vec;

use crate::info::{FieldDescriptor, FieldType, Kind, MessageDescriptor, ValueType};

/// The package holding types the encoding layer treats as well known.
pub const TYPES_PACKAGE: &str = "luadoc.types";

/// The package holding the numeric carrier types.
pub const NUM_PACKAGE: &str = "luadoc.num";

/// Returns the descriptor of `luadoc.types.Timestamp`.
///
/// Seconds and nanoseconds since the Unix epoch.
pub fn timestamp() -> Arc<MessageDescriptor> {
    Arc::new(MessageDescriptor::new(
        "luadoc.types.Timestamp",
        vec![
            FieldDescriptor::new("seconds", 1, FieldType::Singular(ValueType::scalar(Kind::Int64))),
            FieldDescriptor::new("nanos", 2, FieldType::Singular(ValueType::scalar(Kind::Int32))),
        ],
    ))
}

/// Returns the descriptor of `luadoc.num.Decimal`.
///
/// The `value` field holds the decimal digits verbatim, e.g. `"19.99"`.
pub fn decimal() -> Arc<MessageDescriptor> {
    Arc::new(MessageDescriptor::new(
        "luadoc.num.Decimal",
        vec![FieldDescriptor::new(
            "value",
            1,
            FieldType::Singular(ValueType::scalar(Kind::String)),
        )],
    ))
}

// -----------------------------------------------------------------------------
// Tests
