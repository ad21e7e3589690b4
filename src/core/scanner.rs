//! SIMD-accelerated delimiter search using memchr
//!
//! Every delimiter the engine looks for is ASCII, so any offset returned
//! here is also a valid `str` char boundary.

use memchr::{memchr, memmem};

/// Find next occurrence of a specific byte
#[inline]
pub fn find_byte(input: &[u8], byte: u8) -> Option<usize> {
    memchr(byte, input)
}

/// Find next '<' (tag start) using SIMD
#[inline]
pub fn find_tag_start(input: &[u8]) -> Option<usize> {
    memchr(b'<', input)
}

/// Find next '>' (tag end) using SIMD
/// Note: Does not handle '>' inside quotes
#[inline]
pub fn find_tag_end(input: &[u8]) -> Option<usize> {
    memchr(b'>', input)
}

/// Find a multi-byte marker such as `-->` or `]]>`
#[inline]
pub fn find_seq(input: &[u8], needle: &[u8]) -> Option<usize> {
    memmem::find(input, needle)
}

/// Find where a node name ends: first whitespace, '/' or '>'
///
/// `head` starts at the '<'. Returns `head.len()` when no terminator is present.
pub fn find_name_end(head: &[u8]) -> usize {
    head.iter()
        .skip(1)
        .position(|&b| is_whitespace(b) || b == b'/' || b == b'>')
        .map_or(head.len(), |i| i + 1)
}

/// Skip whitespace characters (space, tab, newline, carriage return)
#[inline]
pub fn skip_whitespace(input: &[u8], mut pos: usize) -> usize {
    while pos < input.len() && is_whitespace(input[pos]) {
        pos += 1;
    }
    pos
}

/// Trim trailing whitespace, returning the new end
#[inline]
pub fn trim_end(input: &[u8], mut end: usize) -> usize {
    while end > 0 && is_whitespace(input[end - 1]) {
        end -= 1;
    }
    end
}

/// Check if byte is whitespace
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}
