use crate::{
    imp::{Components, UrlForm},
    parse::ParseError,
    url::Url,
};
use alloc::sync::Arc;
use core::str::FromStr;

#[cfg(feature = "serde")]
use alloc::string::String;
#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// An immutable URL snapshot.
///
/// An archive never changes once created. Cloning is cheap as the
/// components are shared, and an archive can be sent to and shared
/// between threads. Read operations and reference resolution come from
/// [`UrlForm`]; resolving against an archive yields another archive
/// by default.
///
/// The `with_*` methods return a new archive and leave the receiver untouched.
///
/// # Examples
///
/// ```
/// use url_archive::{UrlArchive, UrlForm};
///
/// let base = UrlArchive::parse("https://example.com/docs/index.html?lang=en")?;
/// let page = base.with_param("lang", "fr");
///
/// assert_eq!(base.build_url(), "https://example.com/docs/index.html?lang=en");
/// assert_eq!(page.build_url(), "https://example.com/docs/index.html?lang=fr");
///
/// let next: UrlArchive = page.resolve("intro.html#setup")?;
/// assert_eq!(next.build_url(), "https://example.com/docs/intro.html#setup");
/// # Ok::<_, url_archive::ResolveError>(())
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct UrlArchive {
    inner: Arc<Components>,
}

impl UrlArchive {
    /// Creates an archive with the [default scheme](crate::DEFAULT_SCHEME) and the given host.
    #[must_use]
    pub fn new(host: &str) -> Self {
        Self::from_components(Components::new(host))
    }

    /// Parses a URI reference into an archive.
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

    /// Creates a mutable copy of the archive.
    #[must_use]
    pub fn to_url(&self) -> Url {
        Url::from_components(Components::clone(&self.inner))
    }

    fn with(&self, f: impl FnOnce(&mut Components)) -> Self {
        let mut components = Components::clone(&self.inner);
        f(&mut components);
        Self::from_components(components)
    }

    /// Returns a copy with the given scheme, converted to lowercase.
    #[must_use]
    pub fn with_scheme(&self, scheme: &str) -> Self {
        self.with(|c| c.set_scheme(scheme))
    }

    /// Returns a copy with the given host.
    #[must_use]
    pub fn with_host(&self, host: &str) -> Self {
        self.with(|c| c.set_host(host))
    }

    /// Returns a copy with the given port, or without port.
    #[must_use]
    pub fn with_port(&self, port: Option<u16>) -> Self {
        self.with(|c| c.set_port(port))
    }

    /// Returns a copy with the given userinfo, or without userinfo.
    #[must_use]
    pub fn with_userinfo(&self, userinfo: Option<&str>) -> Self {
        self.with(|c| c.set_userinfo(userinfo))
    }

    /// Returns a copy with the given path.
    ///
    /// The path is encoded as by [`Url::set_path`].
    #[must_use]
    pub fn with_path(&self, path: &str) -> Self {
        self.with(|c| c.set_path(path))
    }

    /// Returns a copy with the given query parameter set.
    #[must_use]
    pub fn with_param(&self, name: &str, value: &str) -> Self {
        self.with(|c| c.params_mut().set(name, value))
    }

    /// Returns a copy with the given query parameter set to a verbatim value.
    #[must_use]
    pub fn with_raw_param(&self, name: &str, value: &str) -> Self {
        self.with(|c| c.params_mut().set_raw(name, value))
    }

    /// Returns a copy without the query parameters of the given name.
    #[must_use]
    pub fn without_param(&self, name: &str) -> Self {
        self.with(|c| {
            c.params_mut().remove(name);
        })
    }

    /// Returns a copy with the given fragment, or without fragment.
    #[must_use]
    pub fn with_fragment(&self, fragment: Option<&str>) -> Self {
        self.with(|c| c.set_fragment(fragment))
    }
}

impl UrlForm for UrlArchive {
    fn from_components(components: Components) -> Self {
        Self {
            inner: Arc::new(components),
        }
    }

    fn components(&self) -> &Components {
        &self.inner
    }
}

impl From<Url> for UrlArchive {
    fn from(url: Url) -> Self {
        url.into_archive()
    }
}

impl From<Components> for UrlArchive {
    fn from(components: Components) -> Self {
        Self::from_components(components)
    }
}

impl FromStr for UrlArchive {
    type Err = ParseError;

    /// Equivalent to [`parse`](Self::parse).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for UrlArchive {
    type Error = ParseError;

    /// Equivalent to [`parse`](Self::parse).
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

#[cfg(feature = "serde")]
impl Serialize for UrlArchive {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.build_url())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for UrlArchive {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        UrlArchive::parse(&s)
            .map_err(|e| de::Error::custom(format_args!("failed to parse {s:?} as URL: {e}")))
    }
}
