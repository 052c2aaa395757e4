use alloc::format;
use alloc::string::String;
use core::mem;

use ld_reflect::info::Kind;

use crate::error::EncodeError;

const KEY_ASSIGN: &str = "=";
const NULL_VALUE: &str = "nil";
const BOOL_TRUE: &str = "true";
const BOOL_FALSE: &str = "false";
const STRING_DELIMITER: char = '"';
const TABLE_OPEN: char = '{';
const TABLE_CLOSE: char = '}';

// -----------------------------------------------------------------------------
// TokenKind

/// The kind of the last construct written, used to decide which separator and
/// indentation must precede the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    None,
    Key,
    Scalar,
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
}

impl TokenKind {
    /// A construct that opens a container.
    #[inline]
    const fn is_open(self) -> bool {
        matches!(self, Self::ObjectOpen | Self::ArrayOpen)
    }

    /// A construct that closes a container.
    #[inline]
    const fn is_close(self) -> bool {
        matches!(self, Self::ObjectClose | Self::ArrayClose)
    }

    /// A construct a comma may be required before: keys, scalars and opens.
    #[inline]
    const fn starts_entry(self) -> bool {
        matches!(
            self,
            Self::Key | Self::Scalar | Self::ObjectOpen | Self::ArrayOpen
        )
    }

    /// A construct a comma may be required after: scalars and closes.
    #[inline]
    const fn ends_entry(self) -> bool {
        matches!(self, Self::Scalar | Self::ObjectClose | Self::ArrayClose)
    }
}

// -----------------------------------------------------------------------------
// Writer

/// A streaming emitter of Lua table literal text.
///
/// The writer knows nothing about any message model; it understands only the
/// grammar (objects, arrays, keys and scalars) and tracks the last written
/// construct to insert separators, newlines and indentation. The caller is
/// responsible for producing a valid sequence of constructs.
///
/// With an empty indent the output is compact; a non-empty indent (spaces
/// and/or tabs) selects pretty mode, where every entry starts on its own
/// indented line.
///
/// # Examples
///
/// ```
/// use ld_luatable::Writer;
///
/// let mut writer = Writer::new("").unwrap();
/// writer.start_object();
/// writer.write_key("name");
/// writer.write_string("Max Mustermann").unwrap();
/// writer.write_key("visits");
/// writer.write_int(3);
/// writer.end_object();
///
/// assert_eq!(writer.finish(), r#"{name="Max Mustermann",visits=3}"#);
/// ```
pub struct Writer {
    indent: String,
    last: TokenKind,
    indents: String,
    out: String,
}

impl Writer {
    /// Creates a `Writer`.
    ///
    /// A non-empty `indent` causes every entry to be preceded by the
    /// accumulated indentation and terminated by a newline. Only space and
    /// tab characters are valid indentation.
    pub fn new(indent: &str) -> Result<Self, EncodeError> {
        if indent.contains(|ch| ch != ' ' && ch != '\t') {
            return Err(EncodeError::InvalidIndent);
        }
        Ok(Self {
            indent: String::from(indent),
            last: TokenKind::None,
            indents: String::new(),
            out: String::new(),
        })
    }

    /// Consumes the writer and returns the written text.
    #[inline]
    pub fn finish(self) -> String {
        self.out
    }

    /// Writes out the null value.
    pub fn write_null(&mut self) {
        self.prepare_next(TokenKind::Scalar);
        self.out.push_str(NULL_VALUE);
    }

    /// Writes out the given boolean value.
    pub fn write_bool(&mut self, value: bool) {
        self.prepare_next(TokenKind::Scalar);
        self.out
            .push_str(if value { BOOL_TRUE } else { BOOL_FALSE });
    }

    /// Writes out the given string, escaped per the target grammar.
    ///
    /// If a character has no defined escape the string is not written at
    /// all, not even partially.
    pub fn write_string(&mut self, value: &str) -> Result<(), EncodeError> {
        let mut escaped = String::with_capacity(value.len());
        append_escaped(&mut escaped, value)?;

        self.prepare_next(TokenKind::Scalar);
        self.out.push(STRING_DELIMITER);
        self.out.push_str(&escaped);
        self.out.push(STRING_DELIMITER);
        Ok(())
    }

    /// Writes out the given signed integer.
    pub fn write_int(&mut self, value: i64) {
        self.prepare_next(TokenKind::Scalar);
        self.out.push_str(&format!("{value}"));
    }

    /// Writes out the given unsigned integer.
    pub fn write_uint(&mut self, value: u64) {
        self.prepare_next(TokenKind::Scalar);
        self.out.push_str(&format!("{value}"));
    }

    /// Writes out a pre-formatted numeral verbatim.
    ///
    /// This is the path for 64-bit integers and injected decimal values,
    /// whose digits must not pass through any general numeric formatting.
    pub fn write_number(&mut self, numeral: &str) {
        self.prepare_next(TokenKind::Scalar);
        self.out.push_str(numeral);
    }

    /// Floating-point values have no defined rendering; this always fails.
    pub fn write_float(&mut self, _value: f64) -> Result<(), EncodeError> {
        Err(EncodeError::UnsupportedKind { kind: Kind::Float })
    }

    /// Opens an object.
    pub fn start_object(&mut self) {
        self.prepare_next(TokenKind::ObjectOpen);
        self.out.push(TABLE_OPEN);
    }

    /// Closes the innermost object.
    pub fn end_object(&mut self) {
        self.prepare_next(TokenKind::ObjectClose);
        self.out.push(TABLE_CLOSE);
    }

    /// Opens an array.
    pub fn start_array(&mut self) {
        self.prepare_next(TokenKind::ArrayOpen);
        self.out.push(TABLE_OPEN);
    }

    /// Closes the innermost array.
    pub fn end_array(&mut self) {
        self.prepare_next(TokenKind::ArrayClose);
        self.out.push(TABLE_CLOSE);
    }

    /// Writes out a key followed by the assignment token.
    pub fn write_key(&mut self, name: &str) {
        self.prepare_next(TokenKind::Key);
        self.out.push_str(name);
        self.write_key_assign();
    }

    /// Writes out a 1-based bracketed index key followed by the assignment
    /// token.
    pub fn write_indexed_key(&mut self, index: usize) {
        self.prepare_next(TokenKind::Key);
        self.out.push('[');
        self.out.push_str(&format!("{index}"));
        self.out.push(']');
        self.write_key_assign();
    }

    fn write_key_assign(&mut self) {
        if !self.indent.is_empty() {
            self.out.push(' ');
        }
        self.out.push_str(KEY_ASSIGN);
        if !self.indent.is_empty() {
            self.out.push(' ');
        }
    }

    /// Adds the separator, newline and indentation the next construct
    /// requires, based purely on the previous and next construct kinds.
    fn prepare_next(&mut self, next: TokenKind) {
        let last = mem::replace(&mut self.last, next);

        if self.indent.is_empty() {
            if last.ends_entry() && next.starts_entry() {
                self.out.push(',');
            }
            return;
        }

        if last.is_open() {
            // An empty container collapses: no inner newline when the very
            // next token is the matching close.
            if !next.is_close() {
                self.indents.push_str(&self.indent);
                self.out.push('\n');
                self.out.push_str(&self.indents);
            }
        } else if last.ends_entry() {
            if next.starts_entry() {
                self.out.push_str(",\n");
                self.out.push_str(&self.indents);
            } else if next.is_close() {
                self.indents.truncate(self.indents.len() - self.indent.len());
                self.out.push('\n');
                self.out.push_str(&self.indents);
            }
        }
    }
}

// -----------------------------------------------------------------------------
// String escaping

/// Appends `input` to `out`, escaped for the target grammar.
///
/// The rules differ from general-purpose text escaping because the output is
/// consumed by a macro-expansion grammar:
///
/// - `%` is meaningful there and becomes `\\%`.
/// - A literal backslash depends on its follower: `\n` as a two-character
///   sequence becomes four backslashes, `\r` as a two-character sequence is
///   dropped (line endings normalize to a single break), anything else keeps
///   a doubled backslash.
/// - A double quote gains a single backslash; a literal newline becomes four
///   backslashes; a lone carriage return is dropped.
/// - Remaining control characters become `u` plus the 4-to-6 hex digit code
///   point, except tab, backspace and form feed, which have no defined
///   escape and fail.
///
/// Runs without escapes are copied verbatim rather than char by char.
fn append_escaped(out: &mut String, input: &str) -> Result<(), EncodeError> {
    let mut rest = &input[index_need_escape(input)..];
    out.push_str(&input[..input.len() - rest.len()]);

    while let Some(ch) = rest.chars().next() {
        let mut taken = ch.len_utf8();
        match ch {
            '%' => {
                out.push_str("\\\\");
                out.push('%');
            }
            '\\' => match rest.as_bytes().get(1) {
                Some(b'n') => {
                    out.push_str("\\\\\\\\");
                    taken += 1;
                }
                Some(b'r') => {
                    taken += 1;
                }
                _ => out.push_str("\\\\"),
            },
            '"' => {
                out.push('\\');
                out.push('"');
            }
            '\n' => out.push_str("\\\\\\\\"),
            '\r' => {
                // \r\n and \n both reduce to a single line break.
            }
            '\t' | '\u{8}' | '\u{c}' => {
                return Err(EncodeError::UnsupportedEscape { ch });
            }
            _ => {
                out.push('u');
                out.push_str(&format!("{:04x}", ch as u32));
            }
        }
        rest = &rest[taken..];

        let plain = index_need_escape(rest);
        out.push_str(&rest[..plain]);
        rest = &rest[plain..];
    }
    Ok(())
}

/// Returns the index of the first character that needs escaping, or the
/// input length if none does.
fn index_need_escape(s: &str) -> usize {
    s.char_indices()
        .find(|&(_, ch)| ch < ' ' || ch == '"' || ch == '\\' || ch == '%')
        .map_or(s.len(), |(index, _)| index)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{Writer, append_escaped};
    use crate::error::EncodeError;

    fn escaped(input: &str) -> String {
        let mut out = String::new();
        append_escaped(&mut out, input).unwrap();
        out
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(escaped("Max Mustermann"), "Max Mustermann");
        assert_eq!(escaped("Musterstraße 17"), "Musterstraße 17");
    }

    #[test]
    fn percent_doubles_backslashes() {
        assert_eq!(escaped("100%"), "100\\\\%");
    }

    #[test]
    fn quote_gains_single_backslash() {
        assert_eq!(escaped("a \"b\" c"), "a \\\"b\\\" c");
    }

    #[test]
    fn lone_backslash_doubles() {
        assert_eq!(escaped("a\\b"), "a\\\\b");
    }

    #[test]
    fn backslash_n_pair_becomes_line_break() {
        // The two-character sequence backslash-n, not a control character.
        assert_eq!(escaped("one\\ntwo"), "one\\\\\\\\two");
    }

    #[test]
    fn backslash_r_pair_is_dropped() {
        assert_eq!(escaped("one\\rtwo"), "onetwo");
        // \r\n as literal pairs collapses to a single line break.
        assert_eq!(escaped("one\\r\\ntwo"), "one\\\\\\\\two");
    }

    #[test]
    fn literal_newline_becomes_line_break() {
        assert_eq!(escaped("one\ntwo"), "one\\\\\\\\two");
        assert_eq!(escaped("one\r\ntwo"), "one\\\\\\\\two");
    }

    #[test]
    fn lone_carriage_return_is_dropped() {
        assert_eq!(escaped("one\rtwo"), "onetwo");
    }

    #[test]
    fn control_characters_use_unicode_escapes() {
        assert_eq!(escaped("\u{1}"), "u0001");
        assert_eq!(escaped("\u{1f}"), "u001f");
    }

    #[test]
    fn tab_has_no_escape() {
        let mut out = String::new();
        assert!(matches!(
            append_escaped(&mut out, "a\tb"),
            Err(EncodeError::UnsupportedEscape { ch: '\t' })
        ));
    }

    #[test]
    fn mixed_sample() {
        assert_eq!(
            escaped("vfd % \\r\\nANS 23054303053"),
            "vfd \\\\% \\\\\\\\ANS 23054303053"
        );
    }

    #[test]
    fn indent_must_be_blank() {
        assert!(Writer::new("  ").is_ok());
        assert!(Writer::new("\t").is_ok());
        assert!(matches!(Writer::new("ab"), Err(EncodeError::InvalidIndent)));
    }

    #[test]
    fn compact_separators() {
        let mut writer = Writer::new("").unwrap();
        writer.start_object();
        writer.write_key("a");
        writer.write_int(1);
        writer.write_key("b");
        writer.start_array();
        writer.write_indexed_key(1);
        writer.write_bool(true);
        writer.write_indexed_key(2);
        writer.write_null();
        writer.end_array();
        writer.end_object();

        assert_eq!(writer.finish(), "{a=1,b={[1]=true,[2]=nil}}");
    }

    #[test]
    fn pretty_indents_entries() {
        let mut writer = Writer::new("  ").unwrap();
        writer.start_object();
        writer.write_key("a");
        writer.write_int(1);
        writer.write_key("b");
        writer.start_object();
        writer.write_key("c");
        writer.write_string("x").unwrap();
        writer.end_object();
        writer.end_object();

        assert_eq!(
            writer.finish(),
            "{\n  a = 1,\n  b = {\n    c = \"x\"\n  }\n}"
        );
    }

    #[test]
    fn empty_containers_collapse_in_pretty_mode() {
        let mut writer = Writer::new("  ").unwrap();
        writer.start_object();
        writer.write_key("items");
        writer.start_array();
        writer.end_array();
        writer.end_object();

        assert_eq!(writer.finish(), "{\n  items = {}\n}");
    }

    #[test]
    fn write_float_fails_fast() {
        let mut writer = Writer::new("").unwrap();
        assert!(writer.write_float(1.5).is_err());
    }

    #[test]
    fn failed_string_is_not_partially_written() {
        let mut writer = Writer::new("").unwrap();
        writer.start_object();
        writer.write_key("a");
        assert!(writer.write_string("x\ty").is_err());

        assert_eq!(writer.finish(), "{a=");
    }
}
