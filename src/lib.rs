#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![cfg_attr(not(feature = "std"), no_std)]

//! A URL model with a mutable builder, an immutable snapshot and
//! [RFC 3986] relative reference resolution.
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
//!
//! # Overview
//!
//! A URL is split into a scheme, an optional authority (userinfo, host and port),
//! a path, an ordered store of query parameters and an optional fragment.
//! The same [`Components`] back two types:
//!
//! - [`Url`] is a builder with setters for incremental construction.
//! - [`UrlArchive`] is an immutable snapshot that can be shared freely;
//!   its `with_*` methods return new snapshots.
//!
//! Both implement [`UrlForm`], which exposes every read operation
//! and the [reference resolution](UrlForm::resolve) methods.
//!
//! ```
//! use url_archive::{Url, UrlArchive, UrlForm};
//!
//! let mut url = Url::new("example.com");
//! url.set_path("some/path")
//!     .set_param("q", "foo bar")
//!     .set_fragment(Some("top"));
//! assert_eq!(url.build_url(), "https://example.com/some/path?q=foo+bar#top");
//!
//! let archive: UrlArchive = url.to_archive();
//! let next = archive.resolve("../other?page=2")?;
//! assert_eq!(next.build_url(), "https://example.com/other?page=2");
//! # Ok::<_, url_archive::ResolveError>(())
//! ```
//!
//! # Resolving into another form
//!
//! The output form of a resolution is chosen by the caller:
//!
//! ```
//! use url_archive::{Resolved, Url, UrlArchive, UrlForm};
//!
//! let base = Url::parse("https://foo/bar?qux=baz")?;
//!
//! // Same form as the base.
//! let url: Url = base.resolve("//bar")?;
//! // Another form implementing `UrlForm`.
//! let archive: UrlArchive = base.resolve_as("//bar")?;
//! // A plain string.
//! let s: String = base.resolve_to_string("//bar")?;
//! assert_eq!(s, "https://bar");
//!
//! // Chosen at run time by name.
//! let resolved = base.resolve_named("//bar", "string").unwrap();
//! assert!(matches!(resolved, Resolved::String(s) if s == "https://bar"));
//! assert!(base.resolve_named("//bar", "Cookie").is_err());
//! # Ok::<_, url_archive::ResolveError>(())
//! ```
//!
//! # Feature flags
//!
//! - `std` (default): Enables `std` support. This includes [`Error`] implementations.
//! - `impl-error`: Implements [`Error`] for the error types. Enabled by `std`.
//! - `serde`: Implements `Serialize` and `Deserialize` through the string form.
//! - `tracing`: Emits `tracing` events on parse failures and resolutions.
//!
//! [`Error`]: std::error::Error

extern crate alloc;

#[cfg(feature = "impl-error")]
#[cfg(not(feature = "std"))]
use core::error::Error;
#[cfg(feature = "std")]
use std::error::Error;

#[macro_use]
mod log;

mod archive;
pub mod component;
mod fmt;
mod imp;
pub mod parse;
pub mod pct_enc;
pub mod query;
mod reference;
pub mod resolve;
mod url;

pub use archive::UrlArchive;
pub use imp::{Components, UrlForm, DEFAULT_SCHEME};
pub use parse::{ParseError, ParseErrorKind};
pub use query::{QueryParam, QueryParams};
pub use reference::Reference;
pub use resolve::{InvalidArgument, OutputKind, ResolveError, Resolved, Resolver};
pub use url::Url;
