//! URL components.

use crate::pct_enc::table;
use alloc::string::{String, ToString};
use core::{iter::FusedIterator, str};
use ref_cast::{ref_cast_custom, RefCastCustom};

/// An [authority] component.
///
/// The host is kept in its textual form, which may be a registered name,
/// an IPv4 address or an IP literal in square brackets.
///
/// [authority]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Authority {
    pub(crate) userinfo: Option<String>,
    pub(crate) host: String,
    pub(crate) port: Option<u16>,
}

impl Authority {
    /// Creates an authority with the given host and no userinfo or port.
    ///
    /// Characters not allowed in a registered name are percent-encoded,
    /// unless the host is an IP literal in square brackets.
    #[must_use]
    pub fn new(host: &str) -> Self {
        Self {
            userinfo: None,
            host: encode_host(host),
            port: None,
        }
    }

    /// Returns the optional [userinfo] subcomponent.
    ///
    /// [userinfo]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.1
    #[must_use]
    pub fn userinfo(&self) -> Option<&str> {
        self.userinfo.as_deref()
    }

    /// Returns the [host] subcomponent as a string slice.
    ///
    /// [host]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.2
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the optional [port] subcomponent.
    ///
    /// [port]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.3
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub(crate) fn write_to(&self, buf: &mut String) {
        if let Some(userinfo) = &self.userinfo {
            buf.push_str(userinfo);
            buf.push('@');
        }
        buf.push_str(&self.host);
        if let Some(port) = self.port {
            buf.push(':');
            buf.push_str(&port.to_string());
        }
    }
}

pub(crate) fn encode_host(host: &str) -> String {
    if host.starts_with('[') && host.ends_with(']') {
        host.into()
    } else {
        crate::pct_enc::encode_lenient(host, table::REG_NAME)
    }
}

/// A [path] component.
///
/// [path]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.3
///
/// # Comparison
///
/// `Path`s are compared by their byte values.
/// Normalization is **not** performed prior to comparison.
#[derive(RefCastCustom, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Path {
    inner: str,
}

impl Path {
    #[ref_cast_custom]
    pub(crate) const fn new_validated(s: &str) -> &Path;

    /// An empty `Path`.
    pub const EMPTY: &'static Path = Path::new_validated("");

    /// Converts a string slice to `&Path`, returning `None` if it is not
    /// a properly percent-encoded path.
    #[must_use]
    pub const fn new(s: &str) -> Option<&Path> {
        match table::PATH.validate(s.as_bytes()) {
            None => Some(Path::new_validated(s)),
            Some(_) => None,
        }
    }

    /// Yields the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Checks whether the path is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Checks whether the path is absolute, i.e., starting with `'/'`.
    #[inline]
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/')
    }

    /// Checks whether the path is rootless, i.e., not starting with `'/'`.
    #[inline]
    #[must_use]
    pub fn is_rootless(&self) -> bool {
        !self.is_absolute()
    }

    /// Returns an iterator over the [segments] of the path.
    ///
    /// The leading `'/'` of an absolute path does not start a segment,
    /// so `"/a/b"` and `"a/b"` both yield `"a"` and `"b"`.
    /// A trailing `'/'` yields a final empty segment.
    /// An empty path yields nothing.
    ///
    /// [segments]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.3
    ///
    /// # Examples
    ///
    /// ```
    /// use url_archive::component::Path;
    ///
    /// let path = Path::new("/a/b/").unwrap();
    /// assert!(path.segments().eq(["a", "b", ""]));
    ///
    /// assert_eq!(Path::EMPTY.segments().count(), 0);
    /// ```
    pub fn segments(&self) -> Segments<'_> {
        let s = self.inner.strip_prefix('/').unwrap_or(&self.inner);
        Segments {
            inner: (!self.inner.is_empty()).then(|| s.split('/')),
        }
    }

    /// Returns the last segment of the path, if any.
    #[must_use]
    pub fn last_segment(&self) -> Option<&str> {
        self.segments().next_back()
    }
}

impl PartialEq<str> for Path {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Path {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<Path> for str {
    fn eq(&self, other: &Path) -> bool {
        self == other.as_str()
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Default for &Path {
    fn default() -> Self {
        Path::EMPTY
    }
}

/// An iterator over the segments of a [`Path`].
///
/// This struct is created by [`Path::segments`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Segments<'a> {
    inner: Option<str::Split<'a, char>>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.inner.as_mut()?.next()
    }
}

impl<'a> DoubleEndedIterator for Segments<'a> {
    fn next_back(&mut self) -> Option<&'a str> {
        self.inner.as_mut()?.next_back()
    }
}

impl FusedIterator for Segments<'_> {}
