use crate::{
    component::{Authority, Path},
    parse::{self, Meta, ParseError},
};
use alloc::{borrow::ToOwned, string::String};
use borrow_or_share::{BorrowOrShare, Bos};
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A parsed [URI reference], which may be relative.
///
/// This is the form a reference string takes on its way into
/// [reference resolution](crate::UrlForm::resolve). It keeps the input
/// text along with the component bounds found by the parser, so components
/// are accessed without copying.
///
/// [URI reference]: https://datatracker.ietf.org/doc/html/rfc3986/#section-4.1
///
/// # Variants
///
/// Two variants of `Reference` are available: `Reference<&str>` (borrowed)
/// and `Reference<String>` (owned).
///
/// `Reference<&'a str>` outputs references with lifetime `'a` where possible
/// (thanks to [`borrow-or-share`](borrow_or_share)):
///
/// ```
/// use url_archive::Reference;
///
/// // Keep a reference to the path after dropping the `Reference`.
/// let path = Reference::parse("../a/b?c")?.path();
/// assert_eq!(path, "../a/b");
/// # Ok::<_, url_archive::ParseError>(())
/// ```
///
/// # Examples
///
/// ```
/// use url_archive::Reference;
///
/// let r = Reference::parse("foo://user@example.com:8042/over/there?name=ferret#nose")?;
/// assert_eq!(r.scheme(), Some("foo"));
/// assert_eq!(r.userinfo(), Some("user"));
/// assert_eq!(r.host(), Some("example.com"));
/// assert_eq!(r.port(), Some(8042));
/// assert_eq!(r.path(), "/over/there");
/// assert_eq!(r.query(), Some("name=ferret"));
/// assert_eq!(r.fragment(), Some("nose"));
///
/// let r = Reference::parse("#top")?;
/// assert!(!r.has_scheme() && !r.has_authority());
/// assert!(r.path().is_empty());
/// # Ok::<_, url_archive::ParseError>(())
/// ```
#[derive(Clone, Copy)]
pub struct Reference<T: Bos<str>> {
    val: T,
    meta: Meta,
}

impl<'a> Reference<&'a str> {
    /// Parses a URI reference from a string slice.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string does not match the
    /// [`URI-reference`][abnf] ABNF rule from RFC 3986.
    ///
    /// [abnf]: https://datatracker.ietf.org/doc/html/rfc3986/#section-4.1
    pub fn parse(s: &'a str) -> Result<Self, ParseError> {
        parse::parse(s.as_bytes()).map(|meta| Reference { val: s, meta })
    }

    /// Creates a new `Reference<String>` by cloning the contents of this `Reference<&str>`.
    #[must_use]
    pub fn to_owned(&self) -> Reference<String> {
        Reference {
            val: self.val.to_owned(),
            meta: self.meta,
        }
    }
}

impl Reference<String> {
    /// Parses a URI reference from a `String`, taking ownership of it.
    ///
    /// # Errors
    ///
    /// Returns `Err` along with the input if it does not match the
    /// [`URI-reference`][abnf] ABNF rule from RFC 3986.
    ///
    /// [abnf]: https://datatracker.ietf.org/doc/html/rfc3986/#section-4.1
    pub fn parse_owned(s: String) -> Result<Self, (ParseError, String)> {
        match parse::parse(s.as_bytes()) {
            Ok(meta) => Ok(Reference { val: s, meta }),
            Err(e) => Err((e, s)),
        }
    }

    /// Borrows this `Reference<String>` as `Reference<&str>`.
    #[must_use]
    pub fn borrow(&self) -> Reference<&str> {
        Reference {
            val: &self.val,
            meta: self.meta,
        }
    }

    /// Consumes this `Reference<String>` and yields the underlying [`String`].
    #[must_use]
    pub fn into_string(self) -> String {
        self.val
    }
}

impl<'i, 'o, T: BorrowOrShare<'i, 'o, str>> Reference<T> {
    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&'i self) -> &'o str {
        self.val.borrow_or_share()
    }

    // The bounds in `meta` are produced by the parser from this very string,
    // which makes every slice below in bounds and on char boundaries.
    fn slice(&'i self, start: usize, end: usize) -> &'o str {
        &self.as_str()[start..end]
    }

    /// Checks whether a scheme is present.
    #[must_use]
    pub fn has_scheme(&self) -> bool {
        self.meta.scheme_end.is_some()
    }

    /// Returns the optional scheme, as written.
    #[must_use]
    pub fn scheme(&'i self) -> Option<&'o str> {
        self.meta.scheme_end.map(|i| self.slice(0, i.get()))
    }

    /// Checks whether an authority is present.
    #[must_use]
    pub fn has_authority(&self) -> bool {
        self.meta.auth_meta.is_some()
    }

    /// Returns the optional authority as a string slice, without the leading `"//"`.
    #[must_use]
    pub fn authority_str(&'i self) -> Option<&'o str> {
        self.meta
            .auth_meta
            .map(|auth| self.slice(auth.start, self.meta.path_bounds.0))
    }

    /// Returns the optional userinfo subcomponent, without the trailing `'@'`.
    #[must_use]
    pub fn userinfo(&'i self) -> Option<&'o str> {
        let auth = self.meta.auth_meta?;
        (auth.start < auth.host_bounds.0).then(|| self.slice(auth.start, auth.host_bounds.0 - 1))
    }

    /// Returns the optional host subcomponent.
    ///
    /// This is `Some` whenever an authority is present, though it may be empty.
    #[must_use]
    pub fn host(&'i self) -> Option<&'o str> {
        self.meta
            .auth_meta
            .map(|auth| self.slice(auth.host_bounds.0, auth.host_bounds.1))
    }

    /// Returns the optional port subcomponent.
    ///
    /// An empty port, as in `"http://example.com:/"`, is treated as absent.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.meta.auth_meta.and_then(|auth| auth.port)
    }

    /// Returns the path component.
    ///
    /// The path is always present, although it may be empty.
    #[must_use]
    pub fn path(&'i self) -> &'o Path {
        let (start, end) = self.meta.path_bounds;
        Path::new_validated(self.slice(start, end))
    }

    /// Returns the optional query component, without the leading `'?'`.
    #[must_use]
    pub fn query(&'i self) -> Option<&'o str> {
        self.meta
            .query_end
            .map(|i| self.slice(self.meta.path_bounds.1 + 1, i.get()))
    }

    /// Returns the optional fragment component, without the leading `'#'`.
    #[must_use]
    pub fn fragment(&'i self) -> Option<&'o str> {
        let start = self.meta.query_or_path_end();
        let s = self.as_str();
        (start < s.len()).then(|| &s[start + 1..])
    }

    pub(crate) fn to_authority(&'i self) -> Option<Authority> {
        let host = self.host()?;
        Some(Authority {
            userinfo: self.userinfo().map(Into::into),
            host: host.into(),
            port: self.port(),
        })
    }
}

impl<'a> TryFrom<&'a str> for Reference<&'a str> {
    type Error = ParseError;

    /// Equivalent to [`parse`](Reference::parse).
    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Reference::parse(value)
    }
}

impl TryFrom<String> for Reference<String> {
    type Error = (ParseError, String);

    /// Equivalent to [`parse_owned`](Reference::parse_owned).
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Reference::parse_owned(value)
    }
}

impl FromStr for Reference<String> {
    type Err = ParseError;

    /// Equivalent to `Reference::parse(s).map(|r| r.to_owned())`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Reference::parse(s).map(|r| r.to_owned())
    }
}

impl<T: Bos<str>, U: Bos<str>> PartialEq<Reference<U>> for Reference<T> {
    fn eq(&self, other: &Reference<U>) -> bool {
        self.val.borrow_or_share() == other.val.borrow_or_share()
    }
}

impl<T: Bos<str>> Eq for Reference<T> {}

impl<T: Bos<str>> PartialEq<str> for Reference<T> {
    fn eq(&self, other: &str) -> bool {
        self.val.borrow_or_share() == other
    }
}

impl<T: Bos<str>> PartialEq<&str> for Reference<T> {
    fn eq(&self, other: &&str) -> bool {
        self.val.borrow_or_share() == *other
    }
}

impl<T: Bos<str>> core::hash::Hash for Reference<T> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.val.borrow_or_share().hash(state);
    }
}

#[cfg(feature = "serde")]
impl<T: Bos<str>> Serialize for Reference<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.val.borrow_or_share())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Reference<&'de str> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        Reference::parse(s).map_err(|e| {
            de::Error::custom(format_args!("failed to parse {s:?} as URI reference: {e}"))
        })
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Reference<String> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Reference::parse_owned(s).map_err(|(e, s)| {
            de::Error::custom(format_args!("failed to parse {s:?} as URI reference: {e}"))
        })
    }
}
