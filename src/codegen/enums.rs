//! Enumeration attributes
//!
//! Turns raw enumeration values into TypeScript enum members. The raw value
//! is kept as the member's string literal, so only the key has to be a valid
//! identifier.

use unicode_normalization::UnicodeNormalization;

use super::names::pascal_case;

/// Name of the enum generated for `attribute_name` on a schema
pub fn enum_type_name(schema_name: &str, attribute_name: &str) -> String {
    format!("{}_{}", schema_name, pascal_case(attribute_name))
}

/// Turn a raw enumeration value into an enum member key.
///
/// Accented characters are decomposed (NFD) first, the result is
/// pascal-cased and everything but ASCII letters and digits is dropped.
/// Keys that read as a number get a leading `_`.
///
/// Two different values can produce the same key (`"a b"` and `"a-b"`);
/// such collisions are emitted as-is.
pub fn sanitize_enum_key(raw: &str) -> String {
    let decomposed: String = raw.nfd().collect();
    let mut key = pascal_case(&decomposed);
    key.retain(|c| c.is_ascii_alphanumeric());

    if reads_as_number(&key) {
        key.insert(0, '_');
    }
    key
}

/// Whether a lenient float parser would read a number off the front of `key`.
///
/// `key` only holds ASCII letters and digits at this point, so that is a
/// leading digit or a leading `Infinity`.
fn reads_as_number(key: &str) -> bool {
    key.starts_with(|c: char| c.is_ascii_digit()) || key.starts_with("Infinity")
}

/// Render one `export enum` block
pub fn render_enum(name: &str, values: &[String]) -> String {
    let mut output = format!("export enum {} {{\n", name);
    for value in values {
        output.push_str(&format!(
            "  {} = '{}',\n",
            sanitize_enum_key(value),
            escape_single_quoted(value)
        ));
    }
    output.push_str("}\n");
    output
}

/// Escape text for a single-quoted TypeScript string literal
pub fn escape_single_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
