//! Lua table literal encoding for self-describing messages.
//!
//! Two layers compose the crate:
//!
//! - [`Writer`]: a streaming text emitter that knows only the table-literal
//!   grammar (objects, arrays, keys, scalars) and decides separators,
//!   newlines and indentation from the last written construct.
//! - The marshaler ([`marshal`], [`MarshalOptions`], [`MarshalDriver`]):
//!   walks a message graph through its descriptors, resolves each instance's
//!   encoding in a fixed priority order (user converters, well-known types,
//!   generic structural recursion) and drives the writer.
//!
//! Output is one wrapped entry keyed by the root message's short type name:
//!
//! ```
//! use ld_luatable::marshal;
//! use ld_reflect::info::{FieldDescriptor, FieldType, Kind, MessageDescriptor, ValueType};
//! use ld_reflect::ops::DynamicMessage;
//!
//! let descriptor = MessageDescriptor::new(
//!     "example.Recipient",
//!     vec![FieldDescriptor::new(
//!         "name",
//!         1,
//!         FieldType::Singular(ValueType::scalar(Kind::String)),
//!     )],
//! );
//! let mut message = DynamicMessage::new(descriptor);
//! message.set(1, "Max Mustermann");
//!
//! assert_eq!(marshal(&message).unwrap(), br#"Recipient={name="Max Mustermann"}"#);
//! ```
//!
//! Every marshal call is an independent, synchronous, in-memory traversal:
//! no shared state, no I/O besides buffer growth. Errors abort the whole
//! call; partial output is never usable (see [`EncodeError`]).

#![no_std]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod convert;
mod error;
mod key_name;
mod marshal;
mod well_known;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use convert::{ConvertFn, DecimalConverter, UserConverter};
pub use error::EncodeError;
pub use key_name::KeyNameStyle;
pub use marshal::{MarshalDriver, MarshalOptions, format, marshal};
pub use writer::Writer;
