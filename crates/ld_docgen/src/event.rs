//! The event-trigger adapter.
//!
//! An inbound request arrives as a JSON event envelope whose `data` member
//! carries the generate-document request. The request payload is decoded
//! field by field against the document descriptors into a
//! [`DynamicMessage`], so everything downstream works on the same message
//! model the marshaler consumes.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use ld_reflect::info::{FieldDescriptor, FieldType, Kind, MapKeyKind, MessageDescriptor, ValueType};
use ld_reflect::ops::{DynamicMessage, ListValue, MapKey, MapValue, Value};

use crate::error::DocgenError;
use crate::schema;

/// The event type this adapter accepts.
pub const GENERATE_EVENT_TYPE: &str = "luadoc.document.generate.v1";

// -----------------------------------------------------------------------------
// Wire shapes

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: JsonValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestData {
    request_id: String,
    documents: Vec<DocumentData>,
}

#[derive(Debug, Deserialize)]
struct DocumentData {
    invoice: Option<JsonValue>,
}

// -----------------------------------------------------------------------------
// Decoded request

/// One decoded generate-document request.
#[derive(Debug)]
pub struct GenerateRequest {
    /// Identifier of the request; becomes the name of the working directory.
    pub request_id: String,
    /// The requested documents, in request order.
    pub documents: Vec<RequestedDocument>,
}

/// A single requested document with its decoded input message.
#[derive(Debug)]
pub enum RequestedDocument {
    Invoice(DynamicMessage),
}

impl RequestedDocument {
    /// Returns the template name for this document.
    pub fn template(&self) -> &'static str {
        match self {
            Self::Invoice(_) => "invoice",
        }
    }

    /// Returns the input message for this document.
    pub fn message(&self) -> &DynamicMessage {
        match self {
            Self::Invoice(message) => message,
        }
    }
}

/// Decodes a JSON event payload into a [`GenerateRequest`].
pub fn decode_request(payload: &[u8]) -> Result<GenerateRequest, DocgenError> {
    let envelope: EventEnvelope = serde_json::from_slice(payload)?;
    tracing::debug!(event_id = %envelope.id, "decoding generate-document event");
    if envelope.event_type != GENERATE_EVENT_TYPE {
        return Err(DocgenError::InvalidRequest(format!(
            "unexpected event type `{}`",
            envelope.event_type
        )));
    }

    let data: RequestData = serde_json::from_value(envelope.data)?;
    if data.request_id.is_empty() {
        return Err(DocgenError::InvalidRequest(String::from(
            "requestId must not be empty",
        )));
    }

    let documents = data
        .documents
        .into_iter()
        .map(|document| match document.invoice {
            Some(json) => {
                decode_message(&schema::invoice_v1(), &json).map(RequestedDocument::Invoice)
            }
            None => Err(DocgenError::InvalidRequest(String::from(
                "unsupported document type",
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GenerateRequest {
        request_id: data.request_id,
        documents,
    })
}

// -----------------------------------------------------------------------------
// JSON → message decoding

/// Decodes a JSON object into a message of the described type.
///
/// Keys resolve by external name first, then by declared name; anything else
/// is rejected.
pub fn decode_message(
    descriptor: &Arc<MessageDescriptor>,
    json: &JsonValue,
) -> Result<DynamicMessage, DocgenError> {
    let Some(object) = json.as_object() else {
        return Err(DocgenError::InvalidRequest(format!(
            "`{}` must be a JSON object",
            descriptor.full_name()
        )));
    };

    let mut message = DynamicMessage::new(Arc::clone(descriptor));
    for (key, value) in object {
        let field = descriptor
            .field_by_external_name(key)
            .or_else(|| descriptor.field_by_name(key))
            .ok_or_else(|| {
                DocgenError::InvalidRequest(format!(
                    "unknown field `{key}` for `{}`",
                    descriptor.full_name()
                ))
            })?;
        let decoded = decode_field(field, value)?;
        message.set(field.number(), decoded);
    }
    Ok(message)
}

fn decode_field(field: &FieldDescriptor, json: &JsonValue) -> Result<Value, DocgenError> {
    match field.field_type() {
        FieldType::Singular(ty) => decode_value(ty, json, field),
        FieldType::List(ty) => {
            let Some(array) = json.as_array() else {
                return Err(wrong_type(field, "a JSON array"));
            };
            let mut list = ListValue::with_capacity(array.len());
            for item in array {
                list.push(decode_value(ty, item, field)?);
            }
            Ok(Value::List(list))
        }
        FieldType::Map { key, value } => {
            let Some(object) = json.as_object() else {
                return Err(wrong_type(field, "a JSON object"));
            };
            let mut map = MapValue::new();
            for (raw_key, item) in object {
                map.insert(
                    decode_map_key(*key, raw_key, field)?,
                    decode_value(value, item, field)?,
                );
            }
            Ok(Value::Map(map))
        }
    }
}

fn decode_value(
    ty: &ValueType,
    json: &JsonValue,
    field: &FieldDescriptor,
) -> Result<Value, DocgenError> {
    match ty.kind() {
        Kind::Bool => json
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| wrong_type(field, "a boolean")),
        Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => json_i64(json)
            .and_then(|v| i32::try_from(v).ok())
            .map(Value::I32)
            .ok_or_else(|| wrong_type(field, "a 32-bit signed integer")),
        Kind::Uint32 | Kind::Fixed32 => json_u64(json)
            .and_then(|v| u32::try_from(v).ok())
            .map(Value::U32)
            .ok_or_else(|| wrong_type(field, "a 32-bit unsigned integer")),
        // 64-bit integers also arrive as decimal strings, the way external
        // encoders avoid rounding them through JSON numbers.
        Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => json_i64(json)
            .map(Value::I64)
            .ok_or_else(|| wrong_type(field, "a 64-bit signed integer")),
        Kind::Uint64 | Kind::Fixed64 => json_u64(json)
            .map(Value::U64)
            .ok_or_else(|| wrong_type(field, "a 64-bit unsigned integer")),
        Kind::String => json
            .as_str()
            .map(Value::from)
            .ok_or_else(|| wrong_type(field, "a string")),
        Kind::Message => {
            let descriptor = ty
                .message_descriptor()
                .ok_or_else(|| wrong_type(field, "a resolvable message type"))?;
            Ok(Value::message(decode_message(descriptor, json)?))
        }
        Kind::Float | Kind::Double | Kind::Bytes | Kind::Enum => {
            Err(DocgenError::InvalidRequest(format!(
                "field `{}` has a kind the encoding does not support",
                field.name()
            )))
        }
    }
}

fn decode_map_key(
    kind: MapKeyKind,
    raw: &str,
    field: &FieldDescriptor,
) -> Result<MapKey, DocgenError> {
    let parsed = match kind {
        MapKeyKind::Int32 => raw.parse::<i32>().ok().map(MapKey::from),
        MapKeyKind::Int64 => raw.parse::<i64>().ok().map(MapKey::from),
        MapKeyKind::Uint32 => raw.parse::<u32>().ok().map(MapKey::from),
        MapKeyKind::Uint64 => raw.parse::<u64>().ok().map(MapKey::from),
        MapKeyKind::String => Some(MapKey::from(raw)),
    };
    parsed.ok_or_else(|| wrong_type(field, "a parseable map key"))
}

fn json_i64(json: &JsonValue) -> Option<i64> {
    json.as_i64()
        .or_else(|| json.as_str().and_then(|s| s.parse().ok()))
}

fn json_u64(json: &JsonValue) -> Option<u64> {
    json.as_u64()
        .or_else(|| json.as_str().and_then(|s| s.parse().ok()))
}

fn wrong_type(field: &FieldDescriptor, expected: &str) -> DocgenError {
    DocgenError::InvalidRequest(format!(
        "field `{}` must be {expected}",
        field.name()
    ))
}

// -----------------------------------------------------------------------------
// Tests
