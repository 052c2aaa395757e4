//! Dynamic values and containers.
//!
//! ## Menu
//!
//! - [`Value`]: an owned dynamic value of any wire kind.
//! - [`ListValue`]: an ordered list of values (zero-based storage; consumers
//!   that need 1-based external indices add the offset themselves).
//! - [`MapKey`] / [`MapValue`]: an unordered key/value collection whose keys
//!   carry a total, reproducible **generic key order**.
//! - [`DynamicMessage`]: a descriptor-typed message value with sparse field
//!   storage.

// -----------------------------------------------------------------------------
// Modules

mod dynamic_message;
mod list_ops;
mod map_ops;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use dynamic_message::DynamicMessage;
pub use list_ops::ListValue;
pub use map_ops::{MapKey, MapValue};
pub use value::Value;
