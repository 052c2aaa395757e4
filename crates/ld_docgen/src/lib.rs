//! The document-generation workflow.
//!
//! The crate wires the encoding core into the surrounding world: an inbound
//! JSON event is decoded into a message instance ([`event`]), the message is
//! rendered as a Lua table and staged next to a LuaLaTeX template, and the
//! typesetting subprocess produces the final PDF ([`document`]). Logging
//! bootstrap lives in [`log`], the document schemas in [`schema`].
//!
//! Everything here treats an encoding error as fatal for the request: a file
//! written from a failed marshal is never typeset.

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod document;
pub mod event;
pub mod log;
pub mod schema;

// -----------------------------------------------------------------------------
// Exports

pub use document::{DocumentGenerator, GeneratedDocument};
pub use error::DocgenError;
pub use event::{GenerateRequest, RequestedDocument, decode_request};
