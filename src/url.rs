use crate::{
    archive::UrlArchive,
    imp::{Components, UrlForm},
    parse::ParseError,
    query::{QueryParam, QueryParams},
};
use alloc::string::String;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A mutable URL builder.
///
/// Every setter modifies the URL in place and returns `&mut Self`,
/// so calls can be chained. Read operations and reference resolution
/// come from [`UrlForm`]. Use [`to_archive`] to take an immutable snapshot.
///
/// [`to_archive`]: Self::to_archive
///
/// # Examples
///
/// ```
/// use url_archive::{Url, UrlForm};
///
/// let mut url = Url::new("example.com");
/// url.set_port(Some(8080))
///     .set_path("search")
///     .set_param("q", "rust url")
///     .set_param("page", "1");
/// assert_eq!(url.build_url(), "https://example.com:8080/search?q=rust+url&page=1");
///
/// url.set_param("q", "builder").remove_param("page");
/// assert_eq!(url.query_string(), "q=builder");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Url {
    pub(crate) inner: Components,
}

impl Url {
    /// Creates a URL with the [default scheme](crate::DEFAULT_SCHEME) and the given host.
    ///
    /// ```
    /// use url_archive::{Url, UrlForm};
    ///
    /// assert_eq!(Url::new("example.com").build_url(), "https://example.com");
    /// ```
    #[must_use]
    pub fn new(host: &str) -> Self {
        Self {
            inner: Components::new(host),
        }
    }

    /// Parses a URI reference into a URL.
    ///
    /// This is the same as [`UrlForm::parse`], available without importing the trait.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string does not match the [`URI-reference`]
    /// ABNF rule from RFC 3986.
    ///
    /// [`URI-reference`]: https://datatracker.ietf.org/doc/html/rfc3986/#section-4.1
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        <Self as UrlForm>::parse(s)
    }

    /// Sets the scheme, converted to lowercase.
    ///
    /// An empty scheme makes the URL protocol-relative.
    pub fn set_scheme(&mut self, scheme: &str) -> &mut Self {
        self.inner.set_scheme(scheme);
        self
    }

    /// Sets the host, adding an authority if there is none.
    pub fn set_host(&mut self, host: &str) -> &mut Self {
        self.inner.set_host(host);
        self
    }

    /// Sets or removes the port, adding an authority if there is none.
    pub fn set_port(&mut self, port: Option<u16>) -> &mut Self {
        self.inner.set_port(port);
        self
    }

    /// Sets or removes the userinfo, adding an authority if there is none.
    pub fn set_userinfo(&mut self, userinfo: Option<&str>) -> &mut Self {
        self.inner.set_userinfo(userinfo);
        self
    }

    /// Removes the authority.
    pub fn clear_authority(&mut self) -> &mut Self {
        self.inner.clear_authority();
        self
    }

    /// Sets the path.
    ///
    /// Characters not allowed in a path are percent-encoded.
    /// When an authority is present, a `'/'` is prepended to a rootless path.
    ///
    /// ```
    /// use url_archive::{Url, UrlForm};
    ///
    /// let mut url = Url::new("example.com");
    /// url.set_path("some/path");
    /// assert_eq!(url.path(), "/some/path");
    /// ```
    pub fn set_path(&mut self, path: &str) -> &mut Self {
        self.inner.set_path(path);
        self
    }

    /// Sets a query parameter.
    ///
    /// An existing parameter with the same name keeps its position.
    pub fn set_param(&mut self, name: &str, value: &str) -> &mut Self {
        self.inner.params_mut().set(name, value);
        self
    }

    /// Sets a query parameter whose value is written verbatim.
    pub fn set_raw_param(&mut self, name: &str, value: &str) -> &mut Self {
        self.inner.params_mut().set_raw(name, value);
        self
    }

    /// Appends a query parameter, keeping any existing one with the same name.
    pub fn append_param(&mut self, param: QueryParam) -> &mut Self {
        self.inner.params_mut().append(param);
        self
    }

    /// Removes every query parameter with the given name.
    ///
    /// Nothing happens if there is none.
    pub fn remove_param(&mut self, name: &str) -> &mut Self {
        self.inner.params_mut().remove(name);
        self
    }

    /// Removes all query parameters.
    pub fn clear_params(&mut self) -> &mut Self {
        self.inner.params_mut().clear();
        self
    }

    /// Returns a mutable reference to the query parameters.
    pub fn params_mut(&mut self) -> &mut QueryParams {
        self.inner.params_mut()
    }

    /// Sets or removes the fragment.
    ///
    /// `Some("")` gives an explicit empty fragment, written as a bare `'#'`.
    /// Characters not allowed in a fragment are percent-encoded, and so is `'?'`.
    pub fn set_fragment(&mut self, fragment: Option<&str>) -> &mut Self {
        self.inner.set_fragment(fragment);
        self
    }

    /// Sets the fragment.
    pub fn set_hash(&mut self, hash: &str) -> &mut Self {
        self.set_fragment(Some(hash))
    }

    /// Takes an immutable snapshot of the URL.
    #[must_use]
    pub fn to_archive(&self) -> UrlArchive {
        UrlArchive::from_components(self.inner.clone())
    }

    /// Converts the URL into an immutable snapshot.
    #[must_use]
    pub fn into_archive(self) -> UrlArchive {
        UrlArchive::from_components(self.inner)
    }
}

impl UrlForm for Url {
    fn from_components(components: Components) -> Self {
        Self { inner: components }
    }

    fn components(&self) -> &Components {
        &self.inner
    }
}

impl From<Components> for Url {
    fn from(components: Components) -> Self {
        Self { inner: components }
    }
}

impl From<UrlArchive> for Url {
    fn from(archive: UrlArchive) -> Self {
        archive.to_url()
    }
}

impl FromStr for Url {
    type Err = ParseError;

    /// Equivalent to [`parse`](Self::parse).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Url {
    type Error = ParseError;

    /// Equivalent to [`parse`](Self::parse).
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Url {
    type Error = ParseError;

    /// Equivalent to [`parse`](Self::parse).
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Url {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.build_url())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Url {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Url::parse(&s)
            .map_err(|e| de::Error::custom(format_args!("failed to parse {s:?} as URL: {e}")))
    }
}
