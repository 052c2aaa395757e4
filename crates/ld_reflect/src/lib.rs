//! A self-describing message model.
//!
//! Messages carry their own schema: every message type is described by a
//! [`MessageDescriptor`](info::MessageDescriptor) holding an **ordered** list
//! of [`FieldDescriptor`](info::FieldDescriptor)s, and every message value
//! exposes that schema through the [`Message`] trait. Consumers such as the
//! `ld_luatable` marshaler walk the descriptor, never the storage, so
//! emission order is always declaration order.
//!
//! ## Menu
//!
//! - [`info`]: descriptors and kinds (compile-time-ish schema data).
//! - [`ops`]: dynamic values and containers ([`Value`](ops::Value),
//!   [`DynamicMessage`](ops::DynamicMessage), [`ListValue`](ops::ListValue),
//!   [`MapValue`](ops::MapValue)).
//! - [`registry`]: descriptor lookup by full or short type name.
//! - [`types`]: descriptors for the framework-defined message types.
//! - [`Message`]: the describe-yourself capability implemented by every
//!   message value.

#![no_std]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod message;

pub mod info;
pub mod ops;
pub mod registry;
pub mod types;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use message::Message;
