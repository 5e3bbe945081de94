//! Percent-encoding utilities.
//!
//! Encoding is driven by a [`Table`] that tells which unencoded bytes may
//! appear in a component. Every other byte is written as a `%XX` triplet
//! with uppercase hexadecimal digits.
//!
//! # Examples
//!
//! ```
//! use url_archive::pct_enc::{self, table};
//!
//! assert_eq!(pct_enc::encode("a b/c", table::PCHAR), "a%20b%2Fc");
//! assert_eq!(pct_enc::encode_form("foo bar&baz", table::QUERY_DATA), "foo+bar%26baz");
//! assert_eq!(pct_enc::decode_form("foo+bar%26baz"), "foo bar&baz");
//! ```

pub mod table;

pub use table::Table;

use alloc::{borrow::Cow, string::String, vec::Vec};
use core::str;

pub(crate) const fn is_hexdig(x: u8) -> bool {
    x.is_ascii_hexdigit()
}

pub(crate) const fn is_hexdig_pair(hi: u8, lo: u8) -> bool {
    is_hexdig(hi) && is_hexdig(lo)
}

const fn gen_octet_table(hi: bool) -> [u8; 256] {
    let mut out = [0xff; 256];
    let shift = if hi { 4 } else { 0 };

    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i << shift;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i << shift;
        out[(i - 10 + b'a') as usize] = i << shift;
        i += 1;
    }
    out
}

const OCTET_TABLE_HI: &[u8; 256] = &gen_octet_table(true);
const OCTET_TABLE_LO: &[u8; 256] = &gen_octet_table(false);

/// Decodes a percent-encoded octet, assuming that the bytes are hexadecimal.
fn decode_octet(hi: u8, lo: u8) -> u8 {
    debug_assert!(is_hexdig_pair(hi, lo));
    OCTET_TABLE_HI[hi as usize] | OCTET_TABLE_LO[lo as usize]
}

pub(crate) fn encode_byte(x: u8) -> &'static str {
    const TABLE: &[u8; 256 * 3] = &{
        const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

        let mut i = 0;
        let mut table = [0; 256 * 3];
        while i < 256 {
            table[i * 3] = b'%';
            table[i * 3 + 1] = HEX_DIGITS[i >> 4];
            table[i * 3 + 2] = HEX_DIGITS[i & 0b1111];
            i += 1;
        }
        table
    };

    const TABLE_STR: &str = match str::from_utf8(TABLE) {
        Ok(s) => s,
        Err(_) => unreachable!(),
    };

    &TABLE_STR[x as usize * 3..x as usize * 3 + 3]
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    // Every byte not allowed by the table is encoded.
    Strict,
    // Like `Strict`, but a space is written as `+`.
    Form,
    // Like `Strict`, but well-formed `%XX` triplets are kept.
    Lenient,
}

fn encode_with(s: &str, table: Table, mode: Mode, buf: &mut String) {
    let bytes = s.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let x = bytes[i];
        if table.allows(x) {
            i += 1;
            continue;
        }
        if mode == Mode::Lenient
            && x == b'%'
            && matches!(bytes.get(i + 1..i + 3), Some(&[hi, lo]) if is_hexdig_pair(hi, lo))
        {
            i += 3;
            continue;
        }

        if start < i {
            buf.push_str(&s[start..i]);
        }
        if mode == Mode::Form && x == b' ' {
            buf.push('+');
        } else {
            buf.push_str(encode_byte(x));
        }
        i += 1;
        start = i;
    }
    if start < bytes.len() {
        buf.push_str(&s[start..]);
    }
}

/// Percent-encodes a string with the given table and appends the result to `buf`.
///
/// A byte is preserved if the table [allows] it; it is percent-encoded otherwise.
/// Note that a `%` is always encoded, so this is not idempotent.
///
/// [allows]: Table::allows
pub fn encode_to(s: &str, table: Table, buf: &mut String) {
    encode_with(s, table, Mode::Strict, buf);
}

/// Percent-encodes a string with the given table.
#[must_use]
pub fn encode(s: &str, table: Table) -> String {
    let mut buf = String::with_capacity(s.len());
    encode_to(s, table, &mut buf);
    buf
}

/// Encodes a string like [`encode_to`], except that `U+0020` (space) is written as `+`.
///
/// This is the encoding of query parameter names and values.
pub fn encode_form_to(s: &str, table: Table, buf: &mut String) {
    encode_with(s, table, Mode::Form, buf);
}

/// Encodes a string like [`encode`], except that `U+0020` (space) is written as `+`.
#[must_use]
pub fn encode_form(s: &str, table: Table) -> String {
    let mut buf = String::with_capacity(s.len());
    encode_form_to(s, table, &mut buf);
    buf
}

/// Encodes a string that may already be partially encoded.
///
/// Well-formed percent-encoded octets are kept as is. Every other byte
/// not allowed by the table, including a stray `%`, is percent-encoded.
///
/// ```
/// use url_archive::pct_enc::{self, table};
///
/// assert_eq!(pct_enc::encode_lenient("a%20b c%", table::PATH), "a%20b%20c%25");
/// ```
#[must_use]
pub fn encode_lenient(s: &str, table: Table) -> String {
    let mut buf = String::with_capacity(s.len());
    encode_with(s, table, Mode::Lenient, &mut buf);
    buf
}

fn decode_with(s: &str, plus_as_space: bool) -> Result<Cow<'_, str>, Vec<u8>> {
    let bytes = s.as_bytes();
    if !bytes
        .iter()
        .any(|&x| x == b'%' || (plus_as_space && x == b'+'))
    {
        return Ok(Cow::Borrowed(s));
    }

    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => match bytes.get(i + 1..i + 3) {
                Some(&[hi, lo]) if is_hexdig_pair(hi, lo) => {
                    out.push(decode_octet(hi, lo));
                    i += 3;
                    continue;
                }
                _ => out.push(b'%'),
            },
            b'+' if plus_as_space => out.push(b' '),
            x => out.push(x),
        }
        i += 1;
    }

    String::from_utf8(out)
        .map(Cow::Owned)
        .map_err(|e| e.into_bytes())
}

fn lossy(res: Result<Cow<'_, str>, Vec<u8>>) -> Cow<'_, str> {
    match res {
        Ok(s) => s,
        Err(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

/// Decodes the percent-encoded octets in a string.
///
/// A `%` that does not start a well-formed octet is kept as is.
/// Invalid UTF-8 in the decoded bytes is replaced with
/// [`U+FFFD REPLACEMENT CHARACTER`](char::REPLACEMENT_CHARACTER).
#[must_use]
pub fn decode(s: &str) -> Cow<'_, str> {
    lossy(decode_with(s, false))
}

/// Decodes a string like [`decode`], except that `+` is decoded as `U+0020` (space).
#[must_use]
pub fn decode_form(s: &str) -> Cow<'_, str> {
    lossy(decode_with(s, true))
}

/// Decodes a string like [`decode_form`], but returns `None`
/// if the decoded bytes are not valid UTF-8.
///
/// ```
/// use url_archive::pct_enc;
///
/// assert_eq!(pct_enc::decode_form_utf8("caf%C3%A9+au+lait").unwrap(), "café au lait");
/// assert_eq!(pct_enc::decode_form_utf8("caf%E9"), None);
/// ```
#[must_use]
pub fn decode_form_utf8(s: &str) -> Option<Cow<'_, str>> {
    decode_with(s, true).ok()
}
