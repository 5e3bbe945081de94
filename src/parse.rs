//! Parsing of URI references per the generic syntax of RFC 3986.

use crate::pct_enc::{
    self,
    table::{self, Table},
};
use core::{num::NonZeroUsize, ops::Deref, ops::DerefMut};

/// Detailed cause of a [`ParseError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ParseErrorKind {
    /// Unexpected character that is not allowed by the URI syntax.
    ///
    /// The error index points to the first byte of the character.
    UnexpectedChar,
    /// Invalid percent-encoded octet that is either non-hexadecimal or incomplete.
    ///
    /// The error index points to the percent character `'%'` of the octet.
    InvalidOctet,
    /// Invalid or unclosed IP literal address.
    ///
    /// The error index points to the preceding left square bracket `'['`.
    InvalidIpLiteral,
    /// Port number that does not fit in a `u16`.
    ///
    /// The error index points to the first digit of the port.
    InvalidPort,
}

/// An error occurred when parsing a URI reference.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ParseError {
    pub(crate) index: usize,
    pub(crate) kind: ParseErrorKind,
}

impl ParseError {
    /// Returns the index at which the error occurred.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for ParseError {}

type Result<T> = core::result::Result<T, ParseError>;

/// Returns immediately with an error.
macro_rules! err {
    ($index:expr, $kind:ident) => {
        return Err(ParseError {
            index: $index,
            kind: ParseErrorKind::$kind,
        })
    };
}

/// Component bounds of a parsed URI reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) struct Meta {
    // The index of the trailing colon.
    pub scheme_end: Option<NonZeroUsize>,
    pub auth_meta: Option<AuthMeta>,
    pub path_bounds: (usize, usize),
    // One byte past the last byte of query.
    pub query_end: Option<NonZeroUsize>,
}

impl Meta {
    #[inline]
    pub fn query_or_path_end(&self) -> usize {
        self.query_end.map_or(self.path_bounds.1, |i| i.get())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) struct AuthMeta {
    // The index just past the leading "//".
    pub start: usize,
    pub host_bounds: (usize, usize),
    pub port: Option<u16>,
}

pub(crate) fn parse(bytes: &[u8]) -> Result<Meta> {
    let mut parser = Parser {
        reader: Reader::new(bytes),
        out: Meta::default(),
    };
    match parser.parse_from_scheme() {
        Ok(()) => Ok(parser.out),
        Err(e) => {
            debug!(index = e.index, kind = ?e.kind, "failed to parse URI reference");
            Err(e)
        }
    }
}

/// URI reference parser.
///
/// # Invariants
///
/// `pos <= len`, `pos` is non-decreasing.
///
/// # Preconditions and guarantees
///
/// Before parsing, ensure that `pos == 0` and `out` is default initialized.
///
/// Start and finish parsing by calling `parse_from_scheme`.
/// The following are guaranteed when parsing succeeds:
///
/// - All output indexes are within bounds and correctly ordered.
/// - All components defined by output indexes are validated,
///   and therefore consist of ASCII only.
struct Parser<'a> {
    reader: Reader<'a>,
    out: Meta,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Deref for Parser<'a> {
    type Target = Reader<'a>;

    fn deref(&self) -> &Self::Target {
        &self.reader
    }
}

impl DerefMut for Parser<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reader
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum PathKind {
    General,
    AbEmpty,
    ContinuedNoScheme,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn has_remaining(&self) -> bool {
        self.pos < self.len()
    }

    fn peek(&self, i: usize) -> Option<u8> {
        self.bytes.get(self.pos + i).copied()
    }

    // Any call to this method must keep the invariants.
    fn skip(&mut self, n: usize) {
        // INVARIANT: `pos` is non-decreasing.
        self.pos += n;
        debug_assert!(self.pos <= self.len());
    }

    /// Returns the length of the longest run from `pos` allowed by the table.
    fn scan(&self, table: Table) -> Result<usize> {
        let mut i = self.pos;
        while i < self.len() {
            let x = self.bytes[i];
            if x == b'%' && table.allows_pct_encoded() {
                match self.bytes.get(i + 1..i + 3) {
                    Some(&[hi, lo]) if pct_enc::is_hexdig_pair(hi, lo) => i += 3,
                    _ => err!(i, InvalidOctet),
                }
            } else if table.allows(x) {
                i += 1;
            } else {
                break;
            }
        }
        Ok(i - self.pos)
    }

    fn read(&mut self, table: Table) -> Result<bool> {
        let n = self.scan(table)?;
        // INVARIANT: The next `n` bytes are scanned and thus within bounds.
        self.skip(n);
        Ok(n > 0)
    }

    fn read_str(&mut self, s: &str) -> bool {
        if self.bytes[self.pos..].starts_with(s.as_bytes()) {
            // INVARIANT: The remaining bytes start with `s` so it's fine to skip `s.len()`.
            self.skip(s.len());
            true
        } else {
            false
        }
    }

    fn read_port(&mut self) -> Result<Option<u16>> {
        if !self.read_str(":") {
            return Ok(None);
        }
        let start = self.pos;
        let mut port: u32 = 0;
        while let Some(x) = self.peek(0).filter(u8::is_ascii_digit) {
            port = port * 10 + (x - b'0') as u32;
            if port > u16::MAX as u32 {
                err!(start, InvalidPort);
            }
            // INVARIANT: Skipping a digit is fine.
            self.skip(1);
        }
        // An empty port is allowed by the syntax and means no port.
        Ok((self.pos > start).then_some(port as u16))
    }

    fn read_ip_literal(&mut self) -> Result<bool> {
        let start = self.pos;
        if !self.read_str("[") {
            return Ok(false);
        }

        let valid = if let Some(b'v' | b'V') = self.peek(0) {
            // INVARIANT: Skipping "v" or "V" is fine.
            self.skip(1);
            self.read(table::HEXDIG)? && self.read_str(".") && self.read(table::IPV_FUTURE)?
        } else {
            let addr_start = self.pos;
            self.read(table::IPV6)? && self.bytes[addr_start..self.pos].contains(&b':')
        };

        if !valid || !self.read_str("]") {
            err!(start, InvalidIpLiteral);
        }
        Ok(true)
    }
}

impl Parser<'_> {
    fn parse_from_scheme(&mut self) -> Result<()> {
        self.read(table::SCHEME)?;

        if self.peek(0) == Some(b':') {
            // Scheme starts with a letter.
            if self.pos > 0 && self.bytes[0].is_ascii_alphabetic() {
                self.out.scheme_end = NonZeroUsize::new(self.pos);
            } else {
                err!(0, UnexpectedChar);
            }

            // INVARIANT: Skipping ":" is fine.
            self.skip(1);
            return if self.read_str("//") {
                self.parse_from_authority()
            } else {
                self.parse_from_path(PathKind::General)
            };
        } else if self.pos == 0 {
            // Nothing read.
            if self.read_str("//") {
                return self.parse_from_authority();
            }
        }
        // Scheme chars are valid for path.
        self.parse_from_path(PathKind::ContinuedNoScheme)
    }

    fn parse_from_authority(&mut self) -> Result<()> {
        let start = self.pos;

        // Userinfo and host share most characters, so look ahead for an "@".
        let userinfo_len = self.scan(table::USERINFO)?;
        if self.peek(userinfo_len) == Some(b'@') {
            // INVARIANT: Skipping the userinfo and "@" is fine.
            self.skip(userinfo_len + 1);
        }

        let host_start = self.pos;
        if !self.read_ip_literal()? {
            self.read(table::REG_NAME)?;
        }
        let host_end = self.pos;

        let port = self.read_port()?;

        self.out.auth_meta = Some(AuthMeta {
            start,
            host_bounds: (host_start, host_end),
            port,
        });
        self.parse_from_path(PathKind::AbEmpty)
    }

    fn parse_from_path(&mut self, kind: PathKind) -> Result<()> {
        let path_start;

        match kind {
            PathKind::General | PathKind::AbEmpty => path_start = self.pos,
            PathKind::ContinuedNoScheme => {
                path_start = 0;

                self.read(table::SEGMENT_NZ_NC)?;

                if self.peek(0) == Some(b':') {
                    // In a relative reference, the first path
                    // segment cannot contain a colon character.
                    err!(self.pos, UnexpectedChar);
                }
            }
        };

        if self.read(table::PATH)?
            && kind == PathKind::AbEmpty
            && self.bytes[path_start] != b'/'
        {
            err!(path_start, UnexpectedChar);
        }

        self.out.path_bounds = (path_start, self.pos);

        if self.read_str("?") {
            self.read(table::QUERY)?;
            self.out.query_end = NonZeroUsize::new(self.pos);
        }

        if self.read_str("#") {
            self.read(table::FRAGMENT)?;
        }

        if self.has_remaining() {
            err!(self.pos, UnexpectedChar);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(s: &str) -> (usize, ParseErrorKind) {
        let e = parse(s.as_bytes()).unwrap_err();
        (e.index(), e.kind())
    }

    #[test]
    fn bounds() {
        let s = "foo://user@example.com:8042/over/there?name=ferret#nose";
        let meta = parse(s.as_bytes()).unwrap();
        assert_eq!(meta.scheme_end.map(|i| i.get()), Some(3));

        let auth = meta.auth_meta.unwrap();
        assert_eq!(&s[auth.start..auth.host_bounds.0], "user@");
        assert_eq!(&s[auth.host_bounds.0..auth.host_bounds.1], "example.com");
        assert_eq!(auth.port, Some(8042));

        assert_eq!(&s[meta.path_bounds.0..meta.path_bounds.1], "/over/there");
        assert_eq!(&s[meta.path_bounds.1 + 1..meta.query_or_path_end()], "name=ferret");
    }

    #[test]
    fn empty_port() {
        let meta = parse(b"http://example.com:/").unwrap();
        assert_eq!(meta.auth_meta.unwrap().port, None);
    }

    #[test]
    fn errors() {
        assert_eq!(kind("http://[::1/"), (7, ParseErrorKind::InvalidIpLiteral));
        assert_eq!(kind("http://[]/"), (7, ParseErrorKind::InvalidIpLiteral));
        assert_eq!(kind("http://a]/"), (8, ParseErrorKind::UnexpectedChar));
        assert_eq!(kind("http://a:65536"), (9, ParseErrorKind::InvalidPort));
        assert_eq!(kind("http://a/%zz"), (9, ParseErrorKind::InvalidOctet));
        assert_eq!(kind("a:b:c d"), (5, ParseErrorKind::UnexpectedChar));
        assert_eq!(kind("1a:b"), (0, ParseErrorKind::UnexpectedChar));
        assert_eq!(kind(":x"), (0, ParseErrorKind::UnexpectedChar));
        assert_eq!(kind("ab#c#d"), (4, ParseErrorKind::UnexpectedChar));
        assert_eq!(kind("http://ex\u{e4}mple.com"), (9, ParseErrorKind::UnexpectedChar));
    }
}
