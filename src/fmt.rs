use crate::{
    component::{Authority, Path},
    imp::Components,
    parse::{ParseError, ParseErrorKind},
    query::{QueryParam, QueryParams},
    reference::Reference,
    resolve::{InvalidArgument, ResolveError, Resolved},
    url::Url,
    UrlArchive, UrlForm,
};
use alloc::string::String;
use borrow_or_share::Bos;
use core::fmt;

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            ParseErrorKind::UnexpectedChar => "unexpected character at index ",
            ParseErrorKind::InvalidOctet => "invalid percent-encoded octet at index ",
            ParseErrorKind::InvalidIpLiteral => "invalid IP literal at index ",
            ParseErrorKind::InvalidPort => "port number out of range at index ",
        };
        write!(f, "{}{}", msg, self.index)
    }
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported output kind {:?}", self.name)
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Parse(e) => write!(f, "failed to parse reference: {e}"),
            ResolveError::InvalidArgument(e) => fmt::Display::fmt(e, f),
            ResolveError::PathUnderflow => f.write_str("underflow occurred in path resolution"),
        }
    }
}

impl fmt::Debug for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Components")
            .field("scheme", &self.scheme)
            .field("authority", &self.authority)
            .field("path", &self.path())
            .field("params", &self.params)
            .field("fragment", &self.fragment)
            .finish()
    }
}

impl fmt::Display for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        self.write_to(&mut buf);
        f.write_str(&buf)
    }
}

impl fmt::Debug for Url {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Url").field(self.components()).finish()
    }
}

impl fmt::Display for Url {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.components(), f)
    }
}

impl fmt::Debug for UrlArchive {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UrlArchive").field(self.components()).finish()
    }
}

impl fmt::Display for UrlArchive {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.components(), f)
    }
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Url(url) => fmt::Display::fmt(url, f),
            Resolved::Archive(archive) => fmt::Display::fmt(archive, f),
            Resolved::String(s) => f.write_str(s),
        }
    }
}

impl fmt::Debug for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authority")
            .field("userinfo", &self.userinfo)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(userinfo) = &self.userinfo {
            write!(f, "{userinfo}@")?;
        }
        f.write_str(&self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Path {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Path {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl fmt::Debug for QueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("QueryParam");
        s.field("name", &self.name).field("value", &self.value);
        if self.raw {
            s.field("raw", &self.raw);
        }
        s.finish()
    }
}

impl fmt::Display for QueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        self.write_to(&mut buf);
        f.write_str(&buf)
    }
}

impl fmt::Debug for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<T: Bos<str>> fmt::Debug for Reference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("scheme", &self.scheme())
            .field("authority", &self.authority_str())
            .field("path", &self.path())
            .field("query", &self.query())
            .field("fragment", &self.fragment())
            .finish()
    }
}

impl<T: Bos<str>> fmt::Display for Reference<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn errors() {
        let e = Reference::parse("a b").unwrap_err();
        assert_eq!(e.to_string(), "unexpected character at index 1");

        let e = ResolveError::from(ParseError {
            index: 9,
            kind: ParseErrorKind::InvalidPort,
        });
        assert_eq!(e.to_string(), "failed to parse reference: port number out of range at index 9");

        let e = ResolveError::from(InvalidArgument { name: "Cookie".into() });
        assert_eq!(e.to_string(), "unsupported output kind \"Cookie\"");
    }

    #[test]
    fn debug() {
        let url = Url::parse("http://u@h:1/p?a=1#f").unwrap();
        assert_eq!(
            format!("{url:?}"),
            "Url(Components { scheme: \"http\", authority: Some(Authority { userinfo: Some(\"u\"), \
             host: \"h\", port: Some(1) }), path: \"/p\", params: [QueryParam { name: \"a\", \
             value: Some(\"1\") }], fragment: Some(\"f\") })"
        );
        assert_eq!(url.to_string(), "http://u@h:1/p?a=1#f");
        assert_eq!(url.components().authority().unwrap().to_string(), "u@h:1");
    }
}
