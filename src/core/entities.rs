//! XML Entity Decoding and Escaping
//!
//! Handles decoding of XML entities:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Numeric character references: &#123; &#x7B; (covers &#xA; &#xD; &#x9;)
//!
//! Decoding returns a borrowed [`SpanStr`] when no entities are present.

use memchr::{memchr, memchr3};

use crate::delimited::SpanStr;

/// Longest reference decoded, `&#1114111;`, counting `&` and `;`
const MAX_ENTITY_LEN: usize = 10;

/// Decode text content, handling entity references
///
/// Returns Borrowed if no entities present (zero-copy),
/// returns Owned if entities were decoded.
#[inline]
pub fn decode_text(input: &str) -> SpanStr<'_> {
    // Fast path: check if there are any entities using SIMD
    if memchr(b'&', input.as_bytes()).is_none() {
        return SpanStr::Borrowed(input);
    }
    SpanStr::Owned(decode_entities(input))
}

/// Decode all entity references in the input
pub fn decode_entities(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut result = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < bytes.len() {
        let Some(amp_pos) = memchr(b'&', &bytes[pos..]) else {
            // No more entities, copy the rest
            result.push_str(&input[pos..]);
            break;
        };
        result.push_str(&input[pos..pos + amp_pos]);
        pos += amp_pos;

        let window = &bytes[pos..bytes.len().min(pos + MAX_ENTITY_LEN)];
        let decoded = memchr(b';', window)
            .and_then(|semi| decode_entity(&input[pos + 1..pos + semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                result.push(c);
                pos += semi + 1;
            }
            None => {
                // Unknown entity or no semicolon, keep the ampersand
                result.push('&');
                pos += 1;
            }
        }
    }

    result
}

/// Decode a single entity (without & and ;)
fn decode_entity(entity: &str) -> Option<char> {
    if let Some(numeric) = entity.strip_prefix('#') {
        return decode_numeric_entity(numeric);
    }

    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

/// Decode a numeric character reference
fn decode_numeric_entity(entity: &str) -> Option<char> {
    let codepoint = match entity.strip_prefix(['x', 'X']) {
        // Hexadecimal: &#xHHHH;
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        // Decimal: &#DDDD;
        None => entity.parse::<u32>().ok()?,
    };
    char::from_u32(codepoint)
}

/// Replacement for a byte that must be escaped, if any
///
/// Element text only escapes markup characters. Attribute text additionally
/// escapes quotes and whitespace so the value survives inside quotes.
#[inline]
pub fn escape_byte(b: u8, attribute: bool) -> Option<&'static str> {
    match b {
        b'<' => Some("&lt;"),
        b'>' => Some("&gt;"),
        b'&' => Some("&amp;"),
        b'\'' if attribute => Some("&apos;"),
        b'"' if attribute => Some("&quot;"),
        b'\n' if attribute => Some("&#xA;"),
        b'\r' if attribute => Some("&#xD;"),
        b'\t' if attribute => Some("&#x9;"),
        _ => None,
    }
}

/// Position of the next byte that needs escaping
#[inline]
pub fn find_escape(input: &[u8], attribute: bool) -> Option<usize> {
    if attribute {
        input.iter().position(|&b| escape_byte(b, true).is_some())
    } else {
        memchr3(b'<', b'>', b'&', input)
    }
}
