//! Schema data for message types.
//!
//! ## Menu
//!
//! - [`Kind`]: the wire kind of a single value (`Bool`, `Int32`, `String`, …).
//! - [`ValueType`]: a [`Kind`] plus, for message kinds, the nested type's
//!   descriptor.
//! - [`FieldType`]: whether a field is singular, a repeated list, or a map,
//!   and how its values are typed.
//! - [`MapKeyKind`]: the admissible map key kinds (integers and strings).
//! - [`FieldDescriptor`]: one field's names, numeric tag, declaration index
//!   and [`FieldType`].
//! - [`MessageDescriptor`]: a message type's full name and its fields in
//!   **declaration order**.

// -----------------------------------------------------------------------------
// Modules

mod field_info;
mod kind;
mod message_info;

// -----------------------------------------------------------------------------
// Exports

pub use field_info::{FieldDescriptor, FieldType, MapKeyKind, ValueType};
pub use kind::Kind;
pub use message_info::MessageDescriptor;
