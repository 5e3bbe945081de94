//! Module for reference resolution.

use crate::{
    imp::{Components, UrlForm},
    parse::ParseError,
    query::QueryParams,
    reference::Reference,
    url::Url,
    UrlArchive,
};
use alloc::{string::String, vec::Vec};
use core::str::FromStr;

/// An error occurred when resolving a URI reference.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResolveError {
    /// The reference failed to parse.
    Parse(ParseError),
    /// The requested output kind is not supported.
    InvalidArgument(InvalidArgument),
    /// An underflow occurred in path resolution while
    /// [`allow_path_underflow`](Resolver::allow_path_underflow) is `false`.
    PathUnderflow,
}

impl From<ParseError> for ResolveError {
    fn from(e: ParseError) -> Self {
        ResolveError::Parse(e)
    }
}

impl From<InvalidArgument> for ResolveError {
    fn from(e: InvalidArgument) -> Self {
        ResolveError::InvalidArgument(e)
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for ResolveError {
    fn source(&self) -> Option<&(dyn crate::Error + 'static)> {
        match self {
            ResolveError::Parse(e) => Some(e),
            ResolveError::InvalidArgument(e) => Some(e),
            ResolveError::PathUnderflow => None,
        }
    }
}

/// An error occurred when an output kind is requested by an unknown name.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct InvalidArgument {
    pub(crate) name: String,
}

impl InvalidArgument {
    /// Returns the rejected name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for InvalidArgument {}

/// The output form of a resolution chosen at run time.
///
/// When the form is known at compile time, prefer [`UrlForm::resolve`],
/// [`UrlForm::resolve_as`] or [`UrlForm::resolve_to_string`].
///
/// # Examples
///
/// ```
/// use url_archive::{OutputKind, ResolveError};
///
/// assert_eq!("string".parse::<OutputKind>(), Ok(OutputKind::String));
/// assert_eq!("UrlArchive".parse::<OutputKind>(), Ok(OutputKind::Archive));
///
/// let e = "Cookie".parse::<OutputKind>().unwrap_err();
/// assert_eq!(e.name(), "Cookie");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// The form of the base.
    #[default]
    Same,
    /// A mutable [`Url`].
    Url,
    /// An immutable [`UrlArchive`].
    Archive,
    /// A plain string built with [`UrlForm::build_url`].
    String,
}

impl FromStr for OutputKind {
    type Err = InvalidArgument;

    /// Looks up an output kind by name.
    ///
    /// The accepted names are `"same"`, `"string"`/`"String"`, `"Url"`/`"url"`
    /// and `"UrlArchive"`/`"archive"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "same" => OutputKind::Same,
            "string" | "String" => OutputKind::String,
            "Url" | "url" => OutputKind::Url,
            "UrlArchive" | "archive" => OutputKind::Archive,
            _ => return Err(InvalidArgument { name: s.into() }),
        })
    }
}

/// The result of a resolution whose output form is chosen at run time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Resolved {
    /// A mutable URL.
    Url(Url),
    /// An immutable URL.
    Archive(UrlArchive),
    /// A plain string.
    String(String),
}

impl Resolved {
    /// Yields the URL string, building it if necessary.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Resolved::Url(url) => url.build_url(),
            Resolved::Archive(archive) => archive.build_url(),
            Resolved::String(s) => s,
        }
    }

    /// Returns the URL if this is [`Resolved::Url`].
    #[must_use]
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            Resolved::Url(url) => Some(url),
            _ => None,
        }
    }

    /// Returns the archive if this is [`Resolved::Archive`].
    #[must_use]
    pub fn as_archive(&self) -> Option<&UrlArchive> {
        match self {
            Resolved::Archive(archive) => Some(archive),
            _ => None,
        }
    }

    /// Returns the string if this is [`Resolved::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Resolved::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Url> for Resolved {
    fn from(url: Url) -> Self {
        Resolved::Url(url)
    }
}

impl From<UrlArchive> for Resolved {
    fn from(archive: UrlArchive) -> Self {
        Resolved::Archive(archive)
    }
}

impl From<String> for Resolved {
    fn from(s: String) -> Self {
        Resolved::String(s)
    }
}

/// A configurable URI reference resolver against a fixed base.
///
/// # Examples
///
/// ```
/// use url_archive::{Resolver, Url, UrlForm};
///
/// let base = Url::parse("http://example.com/foo/bar")?;
/// let resolver = Resolver::with_base(&base);
///
/// assert_eq!(resolver.resolve_to_string("baz")?, "http://example.com/foo/baz");
/// assert_eq!(resolver.resolve_to_string("../baz")?, "http://example.com/baz");
/// assert_eq!(resolver.resolve_to_string("?baz")?, "http://example.com/foo/bar?baz");
/// # Ok::<_, url_archive::ResolveError>(())
/// ```
#[derive(Debug)]
#[must_use]
pub struct Resolver<'a, B> {
    base: &'a B,
    allow_path_underflow: bool,
}

impl<B> Clone for Resolver<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for Resolver<'_, B> {}

impl<'a, B: UrlForm> Resolver<'a, B> {
    /// Creates a new `Resolver` with the given base.
    pub fn with_base(base: &'a B) -> Self {
        Self {
            base,
            allow_path_underflow: true,
        }
    }

    /// Sets whether to allow underflow in path resolution.
    ///
    /// This defaults to `true`, in which case a `".."` segment with nothing
    /// left to remove is dropped. A value of `false` is a deviation from the
    /// reference resolution algorithm defined in
    /// [Section 5 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986/#section-5).
    ///
    /// # Examples
    ///
    /// ```
    /// use url_archive::{Resolver, ResolveError, Url, UrlForm};
    ///
    /// let base = Url::parse("http://example.com/foo/bar")?;
    /// let resolver = Resolver::with_base(&base).allow_path_underflow(false);
    ///
    /// assert_eq!(resolver.resolve("../../baz").unwrap_err(), ResolveError::PathUnderflow);
    /// assert_eq!(resolver.resolve("/../baz").unwrap_err(), ResolveError::PathUnderflow);
    /// assert_eq!(resolver.resolve_to_string("../baz")?, "http://example.com/baz");
    /// # Ok::<_, url_archive::ResolveError>(())
    /// ```
    pub fn allow_path_underflow(mut self, value: bool) -> Self {
        self.allow_path_underflow = value;
        self
    }

    fn transform(&self, reference: &str) -> Result<Components, ResolveError> {
        let r = Reference::parse(reference)?;
        let target = transform(self.base.components(), &r, self.allow_path_underflow)?;
        trace!(
            base = %self.base.components(),
            reference,
            target = %target,
            "resolved reference"
        );
        Ok(target)
    }

    /// Resolves the given reference against the configured base,
    /// keeping the form of the base.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the reference fails to parse or if an underflow
    /// occurred in path resolution when [`allow_path_underflow`] is set to `false`.
    ///
    /// [`allow_path_underflow`]: Self::allow_path_underflow
    pub fn resolve(&self, reference: &str) -> Result<B, ResolveError> {
        self.resolve_as(reference)
    }

    /// Resolves the given reference against the configured base into another form.
    ///
    /// # Errors
    ///
    /// Returns `Err` on the same conditions as [`resolve`](Self::resolve).
    pub fn resolve_as<T: UrlForm>(&self, reference: &str) -> Result<T, ResolveError> {
        self.transform(reference).map(T::from_components)
    }

    /// Resolves the given reference against the configured base into a plain string.
    ///
    /// # Errors
    ///
    /// Returns `Err` on the same conditions as [`resolve`](Self::resolve).
    pub fn resolve_to_string(&self, reference: &str) -> Result<String, ResolveError> {
        self.transform(reference).map(|c| c.build_url())
    }

    /// Resolves the given reference against the configured base into the given output kind.
    ///
    /// # Errors
    ///
    /// Returns `Err` on the same conditions as [`resolve`](Self::resolve).
    pub fn resolve_with(&self, reference: &str, kind: OutputKind) -> Result<Resolved, ResolveError>
    where
        B: Into<Resolved>,
    {
        let target = self.transform(reference)?;
        Ok(match kind {
            OutputKind::Same => B::from_components(target).into(),
            OutputKind::Url => Resolved::Url(Url::from_components(target)),
            OutputKind::Archive => Resolved::Archive(UrlArchive::from_components(target)),
            OutputKind::String => Resolved::String(target.build_url()),
        })
    }
}

/// Transforms a reference against a base as per
/// [Section 5.2.2 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986/#section-5.2.2).
///
/// The fragment of the base is ignored.
pub(crate) fn transform(
    base: &Components,
    r: &Reference<&str>,
    allow_path_underflow: bool,
) -> Result<Components, ResolveError> {
    let (scheme, authority, path, params);

    let r_path = r.path().as_str();
    let r_params = r.query().map(QueryParams::parse);

    if let Some(r_scheme) = r.scheme() {
        scheme = r_scheme.to_ascii_lowercase();
        authority = r.to_authority();
        path = remove_dot_segments(r_path, allow_path_underflow)?;
        params = r_params.unwrap_or_default();
    } else {
        if r.has_authority() {
            authority = r.to_authority();
            path = remove_dot_segments(r_path, allow_path_underflow)?;
            params = r_params.unwrap_or_default();
        } else {
            if r_path.is_empty() {
                path = base.path.clone();
                params = r_params.unwrap_or_else(|| base.params.clone());
            } else {
                path = if r_path.starts_with('/') {
                    remove_dot_segments(r_path, allow_path_underflow)?
                } else {
                    let merged = merge(base, r_path);
                    remove_dot_segments(&merged, allow_path_underflow)?
                };
                params = r_params.unwrap_or_default();
            }
            authority = base.authority.clone();
        }
        scheme = base.scheme.clone();
    }

    Ok(Components {
        scheme,
        authority,
        path,
        params,
        fragment: r.fragment().map(Into::into),
    })
}

/// Merges a relative-path reference with the path of the base as per
/// [Section 5.2.3 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986/#section-5.2.3).
fn merge(base: &Components, r_path: &str) -> String {
    let base_path = base.path.as_str();
    if base.authority.is_some() && base_path.is_empty() {
        let mut buf = String::with_capacity(r_path.len() + 1);
        buf.push('/');
        buf.push_str(r_path);
        buf
    } else {
        let dir = base_path.rfind('/').map_or("", |i| &base_path[..=i]);
        let mut buf = String::with_capacity(dir.len() + r_path.len());
        buf.push_str(dir);
        buf.push_str(r_path);
        buf
    }
}

/// Removes the dot segments from a path as per
/// [Section 5.2.4 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986/#section-5.2.4).
///
/// Percent-encoded dots (`"%2E"` and `"%2e"`) count as dots. A dot segment
/// at the end of the path leaves a trailing slash. A `".."` segment with
/// nothing to remove is dropped, or fails the removal if the path is
/// absolute and underflow is not allowed. A `".."` that removes the first
/// segment of a relative path leaves the output rooted, as the buffer
/// algorithm of the RFC does.
pub(crate) fn remove_dot_segments(
    path: &str,
    allow_path_underflow: bool,
) -> Result<String, ResolveError> {
    if path.is_empty() {
        return Ok(String::new());
    }

    let absolute = path.starts_with('/');
    let rest = if absolute { &path[1..] } else { path };
    let mut rooted = absolute;

    let mut out: Vec<&str> = Vec::new();
    let mut segs = rest.split('/').peekable();
    while let Some(seg) = segs.next() {
        let last = segs.peek().is_none();
        match classify_segment(seg) {
            SegKind::Dot => {
                if last {
                    out.push("");
                }
            }
            SegKind::DoubleDot => {
                if out.pop().is_some() {
                    rooted |= out.is_empty();
                } else if absolute && !allow_path_underflow {
                    return Err(ResolveError::PathUnderflow);
                }
                if last {
                    out.push("");
                }
            }
            SegKind::Normal => out.push(seg),
        }
    }

    let mut buf = String::with_capacity(path.len() + 1);
    if rooted {
        buf.push('/');
    }
    for (i, seg) in out.iter().enumerate() {
        if i > 0 {
            buf.push('/');
        }
        buf.push_str(seg);
    }
    Ok(buf)
}

enum SegKind {
    Dot,
    DoubleDot,
    Normal,
}

fn classify_segment(mut seg: &str) -> SegKind {
    if seg.is_empty() {
        return SegKind::Normal;
    }
    if let Some(rem) = seg.strip_prefix('.') {
        seg = rem;
    } else if let Some(rem) = seg.strip_prefix("%2E") {
        seg = rem;
    } else if let Some(rem) = seg.strip_prefix("%2e") {
        seg = rem;
    }
    if seg.is_empty() {
        SegKind::Dot
    } else if seg == "." || seg == "%2E" || seg == "%2e" {
        SegKind::DoubleDot
    } else {
        SegKind::Normal
    }
}
