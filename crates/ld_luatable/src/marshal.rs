use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use ld_reflect::Message;
use ld_reflect::info::{FieldDescriptor, FieldType, Kind};
use ld_reflect::ops::{ListValue, MapValue, Value};
use ld_reflect::registry::DescriptorRegistry;

use crate::convert::UserConverter;
use crate::error::EncodeError;
use crate::key_name::KeyNameStyle;
use crate::well_known::well_known_marshaler;
use crate::writer::Writer;

const DEFAULT_INDENT: &str = "  ";
const INVALID_MESSAGE_TEXT: &str = "The message has an invalid format.";

// -----------------------------------------------------------------------------
// Entry points

/// Formats the message as a Lua table using default options.
///
/// This is a best-effort diagnostic surface: a missing message renders as
/// `"{}"`, a structurally invalid one as a fixed diagnostic string, and any
/// marshal error is swallowed into empty output. Machine consumers use
/// [`marshal`].
pub fn format(message: Option<&dyn Message>) -> String {
    MarshalOptions::default().format(message)
}

/// Converts the given message into a Lua table using default options.
pub fn marshal(message: &dyn Message) -> Result<Vec<u8>, EncodeError> {
    MarshalOptions::default().marshal(message)
}

// -----------------------------------------------------------------------------
// MarshalOptions

/// Configures how the Lua table is created.
///
/// An options value is resolved once per marshal call (see
/// [`resolve`](Self::resolve)); the call itself never mutates shared state,
/// so one options value can drive concurrent calls.
///
/// # Examples
///
/// ```
/// use ld_luatable::MarshalOptions;
/// use ld_reflect::info::{FieldDescriptor, FieldType, Kind, MessageDescriptor, ValueType};
/// use ld_reflect::ops::DynamicMessage;
///
/// let descriptor = MessageDescriptor::new(
///     "example.Greeting",
///     vec![FieldDescriptor::new(
///         "text",
///         1,
///         FieldType::Singular(ValueType::scalar(Kind::String)),
///     )],
/// );
/// let mut message = DynamicMessage::new(descriptor);
/// message.set(1, "hello");
///
/// let options = MarshalOptions {
///     multiline: true,
///     ..MarshalOptions::default()
/// };
///
/// let text = String::from_utf8(options.marshal(&message).unwrap()).unwrap();
/// assert_eq!(text, "Greeting = {\n  text = \"hello\"\n}");
/// ```
#[derive(Clone, Default)]
pub struct MarshalOptions {
    /// Format the output in indented form with every entry on a new line.
    /// If `indent` is empty, a two-space default indent is chosen.
    pub multiline: bool,

    /// The indentation characters for multiline output; space and tab only.
    /// A non-empty indent implies `multiline`.
    pub indent: String,

    /// How field keys are named. The root wrapper key is unaffected: the
    /// root has no enclosing field descriptor and always uses the declared
    /// short type name.
    pub key_name: KeyNameStyle,

    /// Override handlers probed in order before any other encoding.
    pub user_converters: Vec<Arc<dyn UserConverter>>,

    /// Emit enum values as numbers. Declared for parity with the options
    /// surface; no supported kind exercises it yet.
    pub use_enum_numbers: bool,

    /// Used for looking up descriptors of unresolved extension types; the
    /// supported kind set never consults it.
    pub resolver: Option<Arc<DescriptorRegistry>>,
}

impl MarshalOptions {
    /// Returns a copy with defaults filled in for any unset field.
    ///
    /// Pure: the receiver is left untouched and the effective configuration
    /// is a new value.
    pub fn resolve(&self) -> Self {
        let mut resolved = self.clone();
        if resolved.multiline && resolved.indent.is_empty() {
            resolved.indent = String::from(DEFAULT_INDENT);
        }
        resolved
    }

    /// Formats the message as a Lua table, swallowing errors into
    /// best-effort output. See the free [`format`](crate::format).
    pub fn format(&self, message: Option<&dyn Message>) -> String {
        let Some(message) = message else {
            return String::from("{}");
        };
        if !message.is_valid() {
            return String::from(INVALID_MESSAGE_TEXT);
        }
        self.marshal_to_string(message).unwrap_or_default()
    }

    /// Converts the given message into a Lua table using the options.
    ///
    /// Any error (unsupported kind, unsupported type, unescapable text,
    /// mismatched value) aborts the call; there is no partial success.
    pub fn marshal(&self, message: &dyn Message) -> Result<Vec<u8>, EncodeError> {
        self.marshal_to_string(message).map(String::into_bytes)
    }

    fn marshal_to_string(&self, message: &dyn Message) -> Result<String, EncodeError> {
        let options = self.resolve();
        let writer = Writer::new(&options.indent)?;

        let mut driver = MarshalDriver {
            writer,
            options: &options,
        };
        driver.marshal_root(message)?;
        Ok(driver.writer.finish())
    }
}

// -----------------------------------------------------------------------------
// MarshalDriver

/// Walks one message graph and drives the [`Writer`].
///
/// Per message instance the driver resolves an encoding in a fixed priority
/// order: user converters first, then the well-known-type table, then the
/// generic structural recursion over the declared fields in declaration
/// order. A driver lives for exactly one marshal call.
pub struct MarshalDriver<'a> {
    writer: Writer,
    options: &'a MarshalOptions,
}

impl MarshalDriver<'_> {
    /// Returns the underlying writer, for converters that emit directly.
    #[inline]
    pub fn writer(&mut self) -> &mut Writer {
        &mut self.writer
    }

    fn marshal_root(&mut self, message: &dyn Message) -> Result<(), EncodeError> {
        self.writer.write_key(message.descriptor().name());
        self.marshal_message(message)
    }

    /// Encodes one message instance, honoring the override resolution order.
    pub fn marshal_message(&mut self, message: &dyn Message) -> Result<(), EncodeError> {
        let options = self.options;
        let full_name = message.descriptor().full_name();

        for converter in &options.user_converters {
            if let Some(convert) = converter.handle(full_name)? {
                return convert(self, message);
            }
        }

        if let Some(convert) = well_known_marshaler(full_name)? {
            return convert(self, message);
        }

        self.writer.start_object();
        for field in message.descriptor().fields() {
            self.marshal_field(message, field)?;
        }
        self.writer.end_object();
        Ok(())
    }

    fn marshal_field(
        &mut self,
        message: &dyn Message,
        field: &FieldDescriptor,
    ) -> Result<(), EncodeError> {
        let options = self.options;
        let value = message.field(field.index());

        match field.field_type() {
            FieldType::List(_) => {
                self.writer.write_key(options.key_name.key_name(field));
                match value {
                    Some(Value::List(list)) => self.marshal_list(list, field),
                    // A list is always present; unset still renders `{}`.
                    None => self.marshal_list(&ListValue::new(), field),
                    Some(_) => Err(EncodeError::mismatched_value(field.name())),
                }
            }
            FieldType::Map { .. } => {
                self.writer.write_key(options.key_name.key_name(field));
                match value {
                    Some(Value::Map(map)) => self.marshal_map(map, field),
                    None => self.marshal_map(&MapValue::new(), field),
                    Some(_) => Err(EncodeError::mismatched_value(field.name())),
                }
            }
            FieldType::Singular(_) => match value {
                // An unset singular field is skipped entirely, never null.
                None => Ok(()),
                Some(value) => {
                    self.writer.write_key(options.key_name.key_name(field));
                    self.marshal_singular(value, field)
                }
            },
        }
    }

    /// Encodes one non-repeated value, dispatching on the declared kind.
    fn marshal_singular(
        &mut self,
        value: &Value,
        field: &FieldDescriptor,
    ) -> Result<(), EncodeError> {
        let kind = field.field_type().value_type().kind();
        let mismatch = || EncodeError::mismatched_value(field.name());

        match kind {
            Kind::Bool => {
                let value = value.as_bool().ok_or_else(mismatch)?;
                self.writer.write_bool(value);
            }
            Kind::String => {
                let value = value.as_str().ok_or_else(mismatch)?;
                self.writer.write_string(value)?;
            }
            Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => {
                let value = value.as_i32().ok_or_else(mismatch)?;
                self.writer.write_int(i64::from(value));
            }
            Kind::Uint32 | Kind::Fixed32 => {
                let value = value.as_u32().ok_or_else(mismatch)?;
                self.writer.write_uint(u64::from(value));
            }
            Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 | Kind::Uint64 | Kind::Fixed64 => {
                // 64-bit integers travel as raw pre-formatted numerals; a
                // general numeric rendering would lose precision.
                let digits = match value {
                    Value::I64(value) => format!("{value}"),
                    Value::U64(value) => format!("{value}"),
                    _ => return Err(mismatch()),
                };
                self.writer.write_number(&digits);
            }
            Kind::Message => {
                let nested = value.as_message().ok_or_else(mismatch)?;
                self.marshal_message(nested)?;
            }
            Kind::Float | Kind::Double | Kind::Bytes | Kind::Enum => {
                return Err(EncodeError::UnsupportedKind { kind });
            }
        }
        Ok(())
    }

    fn marshal_list(
        &mut self,
        list: &ListValue,
        field: &FieldDescriptor,
    ) -> Result<(), EncodeError> {
        self.writer.start_array();
        for (index, item) in list.iter().enumerate() {
            self.writer.write_indexed_key(index + 1);
            self.marshal_singular(item, field)?;
        }
        self.writer.end_array();
        Ok(())
    }

    fn marshal_map(&mut self, map: &MapValue, field: &FieldDescriptor) -> Result<(), EncodeError> {
        self.writer.start_object();
        for (key, value) in map.iter_sorted() {
            self.writer.write_key(&key.to_string());
            self.marshal_singular(value, field)?;
        }
        self.writer.end_object();
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use ld_reflect::info::{
        FieldDescriptor, FieldType, Kind, MapKeyKind, MessageDescriptor, ValueType,
    };
    use ld_reflect::ops::{DynamicMessage, ListValue, MapValue, Value};
    use ld_reflect::types;

    use super::{MarshalOptions, format, marshal};
    use crate::convert::DecimalConverter;
    use crate::error::EncodeError;
    use crate::key_name::KeyNameStyle;

    fn singular(kind: Kind) -> FieldType {
        FieldType::Singular(ValueType::scalar(kind))
    }

    fn recipient_descriptor() -> Arc<MessageDescriptor> {
        Arc::new(MessageDescriptor::new(
            "luadoc.document.Recipient",
            vec![
                FieldDescriptor::new("name", 1, singular(Kind::String)),
                FieldDescriptor::new("street", 2, singular(Kind::String)),
                FieldDescriptor::new("city", 3, singular(Kind::String)),
                FieldDescriptor::new("post_code", 4, singular(Kind::String)),
                FieldDescriptor::new("country", 5, singular(Kind::String)),
            ],
        ))
    }

    fn recipient() -> DynamicMessage {
        let mut message = DynamicMessage::new(recipient_descriptor());
        message
            .set(1, "Max Mustermann")
            .set(2, "Musterstraße 17")
            .set(3, "Musterstadt")
            .set(4, "12345")
            .set(5, "DE");
        message
    }

    fn item_descriptor() -> Arc<MessageDescriptor> {
        Arc::new(MessageDescriptor::new(
            "luadoc.document.InvoiceV1.Item",
            vec![
                FieldDescriptor::new("description", 1, singular(Kind::String)),
                FieldDescriptor::new("quantity", 2, singular(Kind::Int32)),
                FieldDescriptor::new(
                    "net_amount",
                    3,
                    FieldType::Singular(ValueType::message(types::decimal())),
                ),
                FieldDescriptor::new(
                    "taxation",
                    4,
                    FieldType::Singular(ValueType::message(types::decimal())),
                ),
                FieldDescriptor::new(
                    "total_amount",
                    5,
                    FieldType::Singular(ValueType::message(types::decimal())),
                ),
                FieldDescriptor::new(
                    "sum",
                    6,
                    FieldType::Singular(ValueType::message(types::decimal())),
                ),
            ],
        ))
    }

    fn invoice_descriptor() -> Arc<MessageDescriptor> {
        Arc::new(MessageDescriptor::new(
            "luadoc.document.InvoiceV1",
            vec![
                FieldDescriptor::new(
                    "delivered_on",
                    1,
                    FieldType::Singular(ValueType::message(types::timestamp())),
                ),
                FieldDescriptor::new("currency_code", 2, singular(Kind::String)),
                FieldDescriptor::new(
                    "recipient",
                    3,
                    FieldType::Singular(ValueType::message(recipient_descriptor())),
                ),
                FieldDescriptor::new(
                    "items",
                    4,
                    FieldType::List(ValueType::message(item_descriptor())),
                ),
            ],
        ))
    }

    fn decimal(digits: &str) -> DynamicMessage {
        let mut message = DynamicMessage::new(types::decimal());
        message.set(1, digits);
        message
    }

    fn item(description: &str, quantity: i32, amounts: [&str; 4]) -> DynamicMessage {
        let mut message = DynamicMessage::new(item_descriptor());
        message
            .set(1, description)
            .set(2, quantity)
            .set(3, decimal(amounts[0]))
            .set(4, decimal(amounts[1]))
            .set(5, decimal(amounts[2]))
            .set(6, decimal(amounts[3]));
        message
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn message_with_strings_compact() {
        let message = recipient();
        assert_eq!(
            text(marshal(&message).unwrap()),
            "Recipient={name=\"Max Mustermann\",street=\"Musterstraße 17\",\
             city=\"Musterstadt\",postCode=\"12345\",country=\"DE\"}"
        );
    }

    #[test]
    fn invoice_multiline_with_decimal_converter() {
        let mut timestamp = DynamicMessage::new(types::timestamp());
        timestamp.set(1, 1_586_736_000_i64);

        let mut items = ListValue::new();
        items.push(item(
            "vfd % \\r\\nANS 23054303053",
            2,
            ["3.35", "19", "3.99", "7.98"],
        ));
        items.push(item("Versandkosten", 1, ["0.00", "0", "0.00", "0.00"]));

        let mut invoice = DynamicMessage::new(invoice_descriptor());
        invoice
            .set(1, timestamp)
            .set(2, "EUR")
            .set(3, recipient())
            .set(4, items);

        let options = MarshalOptions {
            multiline: true,
            user_converters: vec![Arc::new(DecimalConverter)],
            ..MarshalOptions::default()
        };

        let expected = concat!(
            "InvoiceV1 = {\n",
            "  deliveredOn = {\n",
            "    seconds = 1586736000\n",
            "  },\n",
            "  currencyCode = \"EUR\",\n",
            "  recipient = {\n",
            "    name = \"Max Mustermann\",\n",
            "    street = \"Musterstraße 17\",\n",
            "    city = \"Musterstadt\",\n",
            "    postCode = \"12345\",\n",
            "    country = \"DE\"\n",
            "  },\n",
            "  items = {\n",
            "    [1] = {\n",
            "      description = \"vfd \\\\% \\\\\\\\ANS 23054303053\",\n",
            "      quantity = 2,\n",
            "      netAmount = 3.35,\n",
            "      taxation = 19,\n",
            "      totalAmount = 3.99,\n",
            "      sum = 7.98\n",
            "    },\n",
            "    [2] = {\n",
            "      description = \"Versandkosten\",\n",
            "      quantity = 1,\n",
            "      netAmount = 0.00,\n",
            "      taxation = 0,\n",
            "      totalAmount = 0.00,\n",
            "      sum = 0.00\n",
            "    }\n",
            "  }\n",
            "}",
        );
        assert_eq!(text(options.marshal(&invoice).unwrap()), expected);
    }

    #[test]
    fn fields_emit_in_declaration_order_not_storage_order() {
        let mut message = DynamicMessage::new(recipient_descriptor());
        // Populate back to front; the output order must not care.
        message
            .set(5, "DE")
            .set(4, "12345")
            .set(3, "Musterstadt")
            .set(2, "Musterstraße 17")
            .set(1, "Max Mustermann");

        assert_eq!(marshal(&message).unwrap(), marshal(&recipient()).unwrap());
    }

    #[test]
    fn unset_singular_fields_are_skipped() {
        let mut message = DynamicMessage::new(recipient_descriptor());
        message.set(3, "Musterstadt");

        assert_eq!(
            text(marshal(&message).unwrap()),
            "Recipient={city=\"Musterstadt\"}"
        );
    }

    #[test]
    fn empty_message_renders_empty_object() {
        let descriptor = MessageDescriptor::new("luadoc.document.Empty", vec![]);
        let message = DynamicMessage::new(descriptor);

        assert_eq!(text(marshal(&message).unwrap()), "Empty={}");
    }

    #[test]
    fn empty_list_renders_empty_table_even_in_pretty_mode() {
        let descriptor = MessageDescriptor::new(
            "luadoc.document.Order",
            vec![
                FieldDescriptor::new("items", 1, FieldType::List(ValueType::scalar(Kind::String))),
                FieldDescriptor::new("note", 2, singular(Kind::String)),
            ],
        );
        let mut message = DynamicMessage::new(descriptor);
        message.set(1, ListValue::new()).set(2, "ok");

        let options = MarshalOptions {
            multiline: true,
            ..MarshalOptions::default()
        };
        assert_eq!(
            text(options.marshal(&message).unwrap()),
            "Order = {\n  items = {},\n  note = \"ok\"\n}"
        );
    }

    #[test]
    fn unset_list_still_renders_empty_table() {
        let descriptor = MessageDescriptor::new(
            "luadoc.document.Order",
            vec![FieldDescriptor::new(
                "items",
                1,
                FieldType::List(ValueType::scalar(Kind::String)),
            )],
        );
        let message = DynamicMessage::new(descriptor);

        assert_eq!(text(marshal(&message).unwrap()), "Order={items={}}");
    }

    #[test]
    fn map_entries_emit_in_generic_key_order() {
        let descriptor = Arc::new(MessageDescriptor::new(
            "luadoc.document.Translations",
            vec![FieldDescriptor::new(
                "entries",
                1,
                FieldType::Map {
                    key: MapKeyKind::String,
                    value: ValueType::scalar(Kind::String),
                },
            )],
        ));

        let build = |order: &[(&str, &str)]| {
            let mut map = MapValue::new();
            for (key, value) in order {
                map.insert(*key, *value);
            }
            let mut message = DynamicMessage::new(Arc::clone(&descriptor));
            message.set(1, map);
            message
        };

        let forward = build(&[("de", "Rechnung"), ("en", "Invoice"), ("fr", "Facture")]);
        let backward = build(&[("fr", "Facture"), ("en", "Invoice"), ("de", "Rechnung")]);

        let expected =
            "Translations={entries={de=\"Rechnung\",en=\"Invoice\",fr=\"Facture\"}}";
        assert_eq!(text(marshal(&forward).unwrap()), expected);
        assert_eq!(text(marshal(&backward).unwrap()), expected);
    }

    #[test]
    fn integer_map_keys_sort_numerically() {
        let descriptor = MessageDescriptor::new(
            "luadoc.document.Lookup",
            vec![FieldDescriptor::new(
                "entries",
                1,
                FieldType::Map {
                    key: MapKeyKind::Int64,
                    value: ValueType::scalar(Kind::String),
                },
            )],
        );

        let mut map = MapValue::new();
        map.insert(10_i64, "ten");
        map.insert(2_i64, "two");
        map.insert(-1_i64, "minus");
        let mut message = DynamicMessage::new(descriptor);
        message.set(1, map);

        assert_eq!(
            text(marshal(&message).unwrap()),
            "Lookup={entries={-1=\"minus\",2=\"two\",10=\"ten\"}}"
        );
    }

    #[test]
    fn large_64bit_integers_keep_exact_digits() {
        let descriptor = MessageDescriptor::new(
            "luadoc.document.Big",
            vec![
                FieldDescriptor::new("signed", 1, singular(Kind::Int64)),
                FieldDescriptor::new("unsigned", 2, singular(Kind::Fixed64)),
            ],
        );
        let mut message = DynamicMessage::new(descriptor);
        message.set(1, 9_223_372_036_854_775_807_i64);
        message.set(2, 18_446_744_073_709_551_615_u64);

        assert_eq!(
            text(marshal(&message).unwrap()),
            "Big={signed=9223372036854775807,unsigned=18446744073709551615}"
        );
    }

    #[test]
    fn float_fields_fail_fast() {
        let descriptor = MessageDescriptor::new(
            "luadoc.document.Measurement",
            vec![FieldDescriptor::new("reading", 1, singular(Kind::Double))],
        );
        let mut message = DynamicMessage::new(descriptor);
        message.set(1, Value::F64(1.5));

        assert!(matches!(
            MarshalOptions::default().marshal(&message),
            Err(EncodeError::UnsupportedKind { kind: Kind::Double })
        ));
    }

    #[test]
    fn marshal_twice_is_byte_identical() {
        let message = recipient();
        let options = MarshalOptions {
            multiline: true,
            ..MarshalOptions::default()
        };
        assert_eq!(
            options.marshal(&message).unwrap(),
            options.marshal(&message).unwrap()
        );
    }

    #[test]
    fn declared_key_names_are_selectable() {
        let message = recipient();
        let options = MarshalOptions {
            key_name: KeyNameStyle::Declared,
            ..MarshalOptions::default()
        };

        let output = text(options.marshal(&message).unwrap());
        assert!(output.contains("post_code=\"12345\""));
        assert!(output.starts_with("Recipient={"));
    }

    #[test]
    fn invalid_indent_is_a_config_error() {
        let options = MarshalOptions {
            indent: String::from(" x"),
            ..MarshalOptions::default()
        };
        assert!(matches!(
            options.marshal(&recipient()),
            Err(EncodeError::InvalidIndent)
        ));
    }

    #[test]
    fn multiline_defaults_to_two_space_indent() {
        let options = MarshalOptions {
            multiline: true,
            ..MarshalOptions::default()
        };
        assert_eq!(options.resolve().indent, "  ");

        let tabbed = MarshalOptions {
            multiline: true,
            indent: String::from("\t"),
            ..MarshalOptions::default()
        };
        assert_eq!(tabbed.resolve().indent, "\t");
    }

    #[test]
    fn converter_errors_abort_the_call() {
        let descriptor = MessageDescriptor::new("luadoc.num.Fraction", vec![]);
        let message = DynamicMessage::new(descriptor);

        let options = MarshalOptions {
            user_converters: vec![Arc::new(DecimalConverter)],
            ..MarshalOptions::default()
        };
        assert!(matches!(
            options.marshal(&message),
            Err(EncodeError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn unknown_well_known_types_abort_the_call() {
        let descriptor = MessageDescriptor::new("luadoc.types.Duration", vec![]);
        let message = DynamicMessage::new(descriptor);

        assert!(matches!(
            marshal(&message),
            Err(EncodeError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn format_is_best_effort() {
        assert_eq!(format(None), "{}");

        let mut invalid = DynamicMessage::new(recipient_descriptor());
        invalid.set(1, 12_i32);
        assert_eq!(format(Some(&invalid)), "The message has an invalid format.");

        assert_eq!(
            format(Some(&recipient())),
            text(marshal(&recipient()).unwrap())
        );
    }
}
