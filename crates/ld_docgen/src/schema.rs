//! Descriptors for the document request types.
//!
//! The schemas live in the `luadoc.document` package. Only the invoice
//! document exists today; its shape mirrors what the invoice template
//! consumes.

use std::sync::Arc;

use ld_reflect::info::{FieldDescriptor, FieldType, Kind, MessageDescriptor, ValueType};
use ld_reflect::registry::DescriptorRegistry;
use ld_reflect::types;

/// The package holding the document schemas.
pub const DOCUMENT_PACKAGE: &str = "luadoc.document";

/// Returns the descriptor of `luadoc.document.InvoiceV1`.
pub fn invoice_v1() -> Arc<MessageDescriptor> {
    Arc::new(MessageDescriptor::new(
        "luadoc.document.InvoiceV1",
        vec![
            FieldDescriptor::new(
                "delivered_on",
                1,
                FieldType::Singular(ValueType::message(types::timestamp())),
            ),
            FieldDescriptor::new(
                "currency_code",
                2,
                FieldType::Singular(ValueType::scalar(Kind::String)),
            ),
            FieldDescriptor::new(
                "recipient",
                3,
                FieldType::Singular(ValueType::message(recipient())),
            ),
            FieldDescriptor::new("items", 4, FieldType::List(ValueType::message(item()))),
        ],
    ))
}

/// Returns the descriptor of `luadoc.document.InvoiceV1.Recipient`.
pub fn recipient() -> Arc<MessageDescriptor> {
    let string = |name: &str, number: u32| {
        FieldDescriptor::new(name, number, FieldType::Singular(ValueType::scalar(Kind::String)))
    };
    Arc::new(MessageDescriptor::new(
        "luadoc.document.InvoiceV1.Recipient",
        vec![
            string("name", 1),
            string("street", 2),
            string("city", 3),
            string("post_code", 4),
            string("country", 5),
        ],
    ))
}

/// Returns the descriptor of `luadoc.document.InvoiceV1.Item`.
pub fn item() -> Arc<MessageDescriptor> {
    let decimal = |name: &str, number: u32| {
        FieldDescriptor::new(
            name,
            number,
            FieldType::Singular(ValueType::message(types::decimal())),
        )
    };
    Arc::new(MessageDescriptor::new(
        "luadoc.document.InvoiceV1.Item",
        vec![
            FieldDescriptor::new(
                "description",
                1,
                FieldType::Singular(ValueType::scalar(Kind::String)),
            ),
            FieldDescriptor::new(
                "quantity",
                2,
                FieldType::Singular(ValueType::scalar(Kind::Int32)),
            ),
            decimal("net_amount", 3),
            decimal("taxation", 4),
            decimal("total_amount", 5),
            decimal("sum", 6),
        ],
    ))
}

/// Returns a registry holding every document schema plus the framework
/// types they reference.
pub fn registry() -> DescriptorRegistry {
    let mut registry = DescriptorRegistry::new();
    registry.register(types::timestamp());
    registry.register(types::decimal());
    registry.register(recipient());
    registry.register(item());
    registry.register(invoice_v1());
    registry
}

// -----------------------------------------------------------------------------
// Tests
