use crate::{
    component::{self, Authority, Path},
    parse::ParseError,
    pct_enc::{self, table, Table},
    query::{QueryParam, QueryParams},
    reference::Reference,
    resolve::{OutputKind, ResolveError, Resolved, Resolver},
};
use alloc::string::String;

// Fragment setter input, with `'?'` encoded so that it never reads as a second query delimiter.
const FRAGMENT_INPUT: Table = table::FRAGMENT.sub(Table::new(b"?"));

/// The scheme of a URL constructed from a host alone.
pub const DEFAULT_SCHEME: &str = "https";

/// The components of a URL.
///
/// This is the model shared by [`Url`] and [`UrlArchive`]. It is obtained by
/// parsing a string, by constructing it from a host, or from an existing
/// URL through [`UrlForm::components`].
///
/// [`Url`]: crate::Url
/// [`UrlArchive`]: crate::UrlArchive
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Components {
    // Lowercase, or empty for a protocol-relative URL.
    pub(crate) scheme: String,
    pub(crate) authority: Option<Authority>,
    // Percent-encoded.
    pub(crate) path: String,
    pub(crate) params: QueryParams,
    // Percent-encoded. `Some("")` stands for an explicit empty fragment.
    pub(crate) fragment: Option<String>,
}

impl Components {
    /// Creates components with the [default scheme](DEFAULT_SCHEME) and the given host.
    #[must_use]
    pub fn new(host: &str) -> Self {
        Self {
            scheme: DEFAULT_SCHEME.into(),
            authority: Some(Authority::new(host)),
            ..Self::default()
        }
    }

    /// Parses a URI reference into components.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string does not match the [`URI-reference`]
    /// ABNF rule from RFC 3986.
    ///
    /// [`URI-reference`]: https://datatracker.ietf.org/doc/html/rfc3986/#section-4.1
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        Reference::parse(s).map(Self::from_reference)
    }

    pub(crate) fn from_reference(r: Reference<&str>) -> Self {
        Self {
            scheme: r.scheme().map(str::to_ascii_lowercase).unwrap_or_default(),
            authority: r.to_authority(),
            path: r.path().as_str().into(),
            params: r.query().map(QueryParams::parse).unwrap_or_default(),
            fragment: r.fragment().map(Into::into),
        }
    }

    /// Returns the scheme, in lowercase, or an empty string if there is none.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Checks whether an authority (`//host`) is present.
    #[must_use]
    pub fn has_authority(&self) -> bool {
        self.authority.is_some()
    }

    /// Returns the optional authority.
    #[must_use]
    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }

    /// Returns the host, or an empty string if there is no authority.
    #[must_use]
    pub fn host(&self) -> &str {
        self.authority.as_ref().map_or("", Authority::host)
    }

    /// Returns the optional port.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.authority.as_ref().and_then(Authority::port)
    }

    /// Returns the optional userinfo.
    #[must_use]
    pub fn userinfo(&self) -> Option<&str> {
        self.authority.as_ref().and_then(Authority::userinfo)
    }

    /// Returns the path.
    #[must_use]
    pub fn path(&self) -> &Path {
        Path::new_validated(&self.path)
    }

    /// Returns the query parameters.
    #[must_use]
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Returns the optional fragment, percent-encoded.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Serializes the query parameters, see [`UrlForm::query_string`].
    #[must_use]
    pub fn query_string(&self) -> String {
        self.params.to_query_string()
    }

    /// Composes the URL string, see [`UrlForm::build_url`].
    #[must_use]
    pub fn build_url(&self) -> String {
        let mut buf = String::with_capacity(self.scheme.len() + self.host().len() + self.path.len() + 8);
        self.write_to(&mut buf);
        buf
    }

    pub(crate) fn write_to(&self, buf: &mut String) {
        if !self.scheme.is_empty() {
            buf.push_str(&self.scheme);
            buf.push(':');
        }

        if let Some(auth) = &self.authority {
            buf.push_str("//");
            auth.write_to(buf);
            if !self.path.is_empty() && !self.path.starts_with('/') {
                buf.push('/');
            }
        } else if self.path.starts_with("//") {
            // Would otherwise be read back as an authority.
            buf.push_str("/.");
        } else if self.scheme.is_empty() && first_segment_has_colon(&self.path) {
            // Would otherwise be read back as a scheme.
            buf.push_str("./");
        }
        buf.push_str(&self.path);

        if !self.params.is_empty() {
            buf.push('?');
            self.params.write_to(buf);
        }

        if let Some(fragment) = &self.fragment {
            buf.push('#');
            buf.push_str(fragment);
        }
    }

    pub(crate) fn set_scheme(&mut self, scheme: &str) {
        self.scheme = scheme.to_ascii_lowercase();
    }

    pub(crate) fn authority_mut(&mut self) -> &mut Authority {
        if self.authority.is_none() && !self.path.is_empty() && !self.path.starts_with('/') {
            // A path following an authority is either empty or absolute.
            self.path.insert(0, '/');
        }
        self.authority.get_or_insert_with(Authority::default)
    }

    pub(crate) fn set_host(&mut self, host: &str) {
        self.authority_mut().host = component::encode_host(host);
    }

    pub(crate) fn set_port(&mut self, port: Option<u16>) {
        self.authority_mut().port = port;
    }

    pub(crate) fn set_userinfo(&mut self, userinfo: Option<&str>) {
        self.authority_mut().userinfo =
            userinfo.map(|s| pct_enc::encode_lenient(s, table::USERINFO));
    }

    pub(crate) fn clear_authority(&mut self) {
        self.authority = None;
    }

    pub(crate) fn set_path(&mut self, path: &str) {
        let mut path = pct_enc::encode_lenient(path, table::PATH);
        if self.authority.is_some() && !path.is_empty() && !path.starts_with('/') {
            path.insert(0, '/');
        }
        self.path = path;
    }

    pub(crate) fn params_mut(&mut self) -> &mut QueryParams {
        &mut self.params
    }

    pub(crate) fn set_fragment(&mut self, fragment: Option<&str>) {
        self.fragment = fragment.map(|s| pct_enc::encode_lenient(s, FRAGMENT_INPUT));
    }
}

fn first_segment_has_colon(path: &str) -> bool {
    path.split('/').next().map_or(false, |seg| seg.contains(':'))
}

/// The capability shared by every URL form.
///
/// A type implementing `UrlForm` can be built from [`Components`] and exposes
/// them for reading. In return it gets parsing from a string, every read
/// operation and reference resolution. Both [`Url`] and [`UrlArchive`]
/// implement it, and each can be the output form of a resolution against the
/// other through [`resolve_as`].
///
/// [`Url`]: crate::Url
/// [`UrlArchive`]: crate::UrlArchive
/// [`resolve_as`]: Self::resolve_as
///
/// # Examples
///
/// Use a custom form as the output of a resolution:
///
/// ```
/// use url_archive::{Components, Url, UrlForm};
///
/// struct Link(Components);
///
/// impl UrlForm for Link {
///     fn from_components(components: Components) -> Self {
///         Link(components)
///     }
///
///     fn components(&self) -> &Components {
///         &self.0
///     }
/// }
///
/// let base = Url::parse("http://example.com/a/b")?;
/// let link: Link = base.resolve_as("c?d=e")?;
/// assert_eq!(link.build_url(), "http://example.com/a/c?d=e");
/// # Ok::<_, url_archive::ResolveError>(())
/// ```
pub trait UrlForm: Sized {
    /// Creates a URL from components.
    fn from_components(components: Components) -> Self;

    /// Returns the components of the URL.
    fn components(&self) -> &Components;

    /// Parses a URI reference into a URL.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string does not match the [`URI-reference`]
    /// ABNF rule from RFC 3986. No partial URL is returned.
    ///
    /// [`URI-reference`]: https://datatracker.ietf.org/doc/html/rfc3986/#section-4.1
    fn parse(s: &str) -> Result<Self, ParseError> {
        Components::parse(s).map(Self::from_components)
    }

    /// Returns the scheme, in lowercase, or an empty string if there is none.
    fn scheme(&self) -> &str {
        self.components().scheme()
    }

    /// Checks whether an authority (`//host`) is present.
    fn has_authority(&self) -> bool {
        self.components().has_authority()
    }

    /// Returns the optional authority.
    fn authority(&self) -> Option<&Authority> {
        self.components().authority()
    }

    /// Returns the optional userinfo.
    fn userinfo(&self) -> Option<&str> {
        self.components().userinfo()
    }

    /// Returns the host, or an empty string if there is no authority.
    fn host(&self) -> &str {
        self.components().host()
    }

    /// Returns the optional port.
    fn port(&self) -> Option<u16> {
        self.components().port()
    }

    /// Returns the path.
    fn path(&self) -> &Path {
        self.components().path()
    }

    /// Returns the query parameters.
    fn params(&self) -> &QueryParams {
        self.components().params()
    }

    /// Returns the first parameter with the given name.
    fn param(&self, name: &str) -> Option<&QueryParam> {
        self.params().get(name)
    }

    /// Returns the value of the parameter with the given name,
    /// or `None` if it is absent.
    fn param_value(&self, name: &str) -> Option<&str> {
        self.params().value(name)
    }

    /// Returns the value of the parameter with the given name,
    /// or `default` if it is absent.
    fn param_value_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.param_value(name).unwrap_or(default)
    }

    /// Returns the optional fragment, percent-encoded.
    fn fragment(&self) -> Option<&str> {
        self.components().fragment()
    }

    /// Serializes the query parameters into a query string without the leading `'?'`.
    ///
    /// Parameters are written as `name=value` joined by `'&'`. Names and values
    /// are percent-encoded and a space is written as `+`, except for the value
    /// of a raw parameter which is written verbatim.
    fn query_string(&self) -> String {
        self.components().query_string()
    }

    /// Composes the URL string: `scheme://host[:port][/path][?query][#fragment]`.
    ///
    /// The scheme and its `':'` are left out when the scheme is empty,
    /// `'?'` when there are no parameters and `'#'` when there is no fragment.
    fn build_url(&self) -> String {
        self.components().build_url()
    }

    /// Resolves a reference against this URL, keeping the form of `self`.
    ///
    /// This implements the algorithm from
    /// [Section 5 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986/#section-5).
    /// The receiver is never modified.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the reference fails to parse.
    fn resolve(&self, reference: &str) -> Result<Self, ResolveError> {
        Resolver::with_base(self).resolve(reference)
    }

    /// Resolves a reference against this URL into another form.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the reference fails to parse.
    fn resolve_as<T: UrlForm>(&self, reference: &str) -> Result<T, ResolveError> {
        Resolver::with_base(self).resolve_as(reference)
    }

    /// Resolves a reference against this URL into a plain string.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the reference fails to parse.
    fn resolve_to_string(&self, reference: &str) -> Result<String, ResolveError> {
        Resolver::with_base(self).resolve_to_string(reference)
    }

    /// Resolves a reference against this URL into the given output kind.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the reference fails to parse.
    fn resolve_with(&self, reference: &str, kind: OutputKind) -> Result<Resolved, ResolveError>
    where
        Self: Into<Resolved>,
    {
        Resolver::with_base(self).resolve_with(reference, kind)
    }

    /// Resolves a reference against this URL into the output kind with the given name.
    ///
    /// See [`OutputKind`] for the accepted names.
    ///
    /// # Errors
    ///
    /// Returns `Err` with [`ResolveError::InvalidArgument`] if the name is not
    /// accepted, before anything else is done, or if the reference fails to parse.
    fn resolve_named(&self, reference: &str, kind: &str) -> Result<Resolved, ResolveError>
    where
        Self: Into<Resolved>,
    {
        let kind: OutputKind = kind.parse()?;
        self.resolve_with(reference, kind)
    }
}

impl UrlForm for Components {
    fn from_components(components: Components) -> Self {
        components
    }

    fn components(&self) -> &Components {
        self
    }
}
