use url_archive::{
    resolve::{OutputKind, ResolveError, Resolved, Resolver},
    ParseErrorKind, Url, UrlArchive, UrlForm,
};

trait Test {
    fn pass(&self, r: &str, res: &str);
    fn fail(&self, r: &str, err: ResolveError);
}

impl Test for Url {
    #[track_caller]
    fn pass(&self, r: &str, expected: &str) {
        for b in [true, false] {
            let resolver = Resolver::with_base(self).allow_path_underflow(b);
            assert_eq!(resolver.resolve_to_string(r).unwrap(), expected);
            assert_eq!(resolver.resolve(r).unwrap().build_url(), expected);
            assert_eq!(resolver.resolve_as::<UrlArchive>(r).unwrap().build_url(), expected);
        }
    }

    #[track_caller]
    fn fail(&self, r: &str, expected: ResolveError) {
        for b in [true, false] {
            let resolver = Resolver::with_base(self).allow_path_underflow(b);
            assert_eq!(resolver.resolve(r).unwrap_err(), expected);
        }
    }
}

#[test]
fn resolve() {
    let base = Url::parse("http://a/b/c/d;p?q").unwrap();

    base.pass("https:", "https:");

    // Examples from Section 5.4.1 of RFC 3986.
    base.pass("g:h", "g:h");
    base.pass("g", "http://a/b/c/g");
    base.pass("./g", "http://a/b/c/g");
    base.pass("g/", "http://a/b/c/g/");
    base.pass("/g", "http://a/g");
    base.pass("//g", "http://g");
    base.pass("?y", "http://a/b/c/d;p?y");
    base.pass("g?y", "http://a/b/c/g?y");
    base.pass("#s", "http://a/b/c/d;p?q#s");
    base.pass("g#s", "http://a/b/c/g#s");
    base.pass("g?y#s", "http://a/b/c/g?y#s");
    base.pass(";x", "http://a/b/c/;x");
    base.pass("g;x", "http://a/b/c/g;x");
    base.pass("g;x?y#s", "http://a/b/c/g;x?y#s");
    base.pass("", "http://a/b/c/d;p?q");
    base.pass(".", "http://a/b/c/");
    base.pass("./", "http://a/b/c/");
    base.pass("..", "http://a/b/");
    base.pass("../", "http://a/b/");
    base.pass("../g", "http://a/b/g");
    base.pass("../..", "http://a/");
    base.pass("../../", "http://a/");
    base.pass("../../g", "http://a/g");

    // Examples from Section 5.4.2 of RFC 3986.
    base.pass("/./g", "http://a/g");
    base.pass("g.", "http://a/b/c/g.");
    base.pass(".g", "http://a/b/c/.g");
    base.pass("g..", "http://a/b/c/g..");
    base.pass("..g", "http://a/b/c/..g");

    base.pass("./../g", "http://a/b/g");
    base.pass("./g/.", "http://a/b/c/g/");
    base.pass("g/./h", "http://a/b/c/g/h");
    base.pass("g/../h", "http://a/b/c/h");
    base.pass("g;x=1/./y", "http://a/b/c/g;x=1/y");
    base.pass("g;x=1/../y", "http://a/b/c/y");

    base.pass("g?y/./x", "http://a/b/c/g?y/./x");
    base.pass("g?y/../x", "http://a/b/c/g?y/../x");
    base.pass("g#s/./x", "http://a/b/c/g#s/./x");
    base.pass("g#s/../x", "http://a/b/c/g#s/../x");

    base.pass("http:g", "http:g");

    // Non-hierarchical base.
    let base = Url::parse("foo:bar").unwrap();

    base.pass("", "foo:bar");
    base.pass("#baz", "foo:bar#baz");
    base.pass("http://example.com/", "http://example.com/");
    base.pass("foo:baz", "foo:baz");
    base.pass("bar:baz", "bar:baz");
    base.pass("baz", "foo:baz");

    // Removing the first segment of a rootless path leaves it rooted.
    let base = Url::parse("foo:a/b").unwrap();
    base.pass("..", "foo:/");
    base.pass("../..", "foo:/");
    base.pass("../c", "foo:/c");
    base.pass("c/../d", "foo:a/d");
    base.pass("foo:a/..", "foo:/");
    base.pass("foo:a/b/../..", "foo:/");

    let base = Url::parse("foo:/").unwrap();
    // The path must not be mistaken for an authority.
    base.pass(".//@@", "foo:/.//@@");

    let base = Url::parse("foo:/bar/baz/.%2E/").unwrap();
    base.pass("..", "foo:/");

    // A base with an authority and an empty path.
    let base = Url::parse("http://a").unwrap();
    base.pass("g", "http://a/g");
    base.pass("?y", "http://a?y");
}

#[test]
fn base_fragment_is_ignored() {
    let base = Url::parse("http://example.com/a#title1").unwrap();
    base.pass("foo", "http://example.com/foo");
    base.pass("", "http://example.com/a");
    base.pass("#", "http://example.com/a#");
}

#[test]
fn protocol_relative_base() {
    let base = Url::parse("//example.com/a/b").unwrap();
    base.pass("c", "//example.com/a/c");
    base.pass("https://other/", "https://other/");
}

#[test]
fn query_is_reencoded() {
    let base = Url::parse("http://a/b?x=1").unwrap();
    base.pass("?q=foo%20bar&lang=%E6%B5%8B", "http://a/b?q=foo+bar&lang=%E6%B5%8B");
    base.pass("c?a+b=1", "http://a/c?a+b=1");
    base.pass("?q=what%3F", "http://a/b?q=what%3F");
}

#[test]
fn non_utf8_query_is_kept() {
    let base = Url::parse("http://a/b?q=caf%E9").unwrap();
    base.pass("#s", "http://a/b?q=caf%E9#s");
    base.pass("", "http://a/b?q=caf%E9");
    base.pass("c", "http://a/c");
    base.pass("?%FF=%FE", "http://a/b?%FF=%FE");
}

#[test]
fn resolve_error() {
    let base = Url::parse("http://a/b").unwrap();
    let e = base.resolve("c d").unwrap_err();
    match e {
        ResolveError::Parse(e) => {
            assert_eq!(e.index(), 1);
            assert_eq!(e.kind(), ParseErrorKind::UnexpectedChar);
        }
        _ => panic!("unexpected error: {e:?}"),
    }

    for r in ["c d", "%zz", "http://a:99999", "1a:b"] {
        let e = url_archive::Reference::parse(r).unwrap_err();
        base.fail(r, ResolveError::Parse(e));
    }

    assert!(matches!(
        base.resolve("http://[::1").unwrap_err(),
        ResolveError::Parse(e) if e.kind() == ParseErrorKind::InvalidIpLiteral
    ));
}

#[test]
fn resolve_underflow() {
    let base = Url::parse("http://a/b/c/d;p?q").unwrap();
    for r in ["../../../g", "../../../../g", "/../g"] {
        let resolver = Resolver::with_base(&base).allow_path_underflow(true);
        assert_eq!(resolver.resolve_to_string(r).unwrap(), "http://a/g");

        let resolver = Resolver::with_base(&base).allow_path_underflow(false);
        assert_eq!(resolver.resolve(r).unwrap_err(), ResolveError::PathUnderflow);
    }

    // The path of the base is taken as is for an empty reference.
    let base = Url::parse("http://a/..").unwrap();
    let resolver = Resolver::with_base(&base).allow_path_underflow(false);
    assert_eq!(resolver.resolve_to_string("").unwrap(), "http://a/..");

    // A relative path has no root to climb above.
    let base = Url::parse("foo:bar").unwrap();
    let resolver = Resolver::with_base(&base).allow_path_underflow(false);
    assert_eq!(resolver.resolve_to_string("../baz").unwrap(), "foo:baz");
}

#[test]
fn output_forms() {
    let url = Url::parse("https://foo/bar?qux=baz").unwrap();
    let archive = UrlArchive::parse("https://foo/bar?qux=baz").unwrap();

    let resolved: Url = url.resolve("//bar").unwrap();
    assert_eq!(resolved.build_url(), "https://bar");
    let resolved: UrlArchive = archive.resolve("//bar").unwrap();
    assert_eq!(resolved.build_url(), "https://bar");

    assert_eq!(url.resolve("/baz").unwrap().build_url(), "https://foo/baz");
    assert_eq!(url.resolve("http://baz/foo").unwrap().build_url(), "http://baz/foo");

    let resolved: UrlArchive = url.resolve_as("//bar").unwrap();
    assert_eq!(resolved.build_url(), "https://bar");
    let resolved: Url = archive.resolve_as("//bar").unwrap();
    assert_eq!(resolved.build_url(), "https://bar");

    let s: String = url.resolve_to_string("//bar").unwrap();
    assert_eq!(s, "https://bar");

    // The receiver is left untouched.
    assert_eq!(url.build_url(), "https://foo/bar?qux=baz");
    assert_eq!(archive.build_url(), "https://foo/bar?qux=baz");
}

#[test]
fn output_kinds() {
    let url = Url::parse("https://foo/bar?qux=baz").unwrap();
    let archive = url.to_archive();

    let resolved = url.resolve_with("//bar", OutputKind::Same).unwrap();
    assert!(matches!(&resolved, Resolved::Url(u) if u.build_url() == "https://bar"));
    let resolved = archive.resolve_with("//bar", OutputKind::default()).unwrap();
    assert!(matches!(&resolved, Resolved::Archive(a) if a.build_url() == "https://bar"));

    let cases: [(&str, fn(&Resolved) -> bool); 6] = [
        ("UrlArchive", |r| r.as_archive().is_some()),
        ("archive", |r| r.as_archive().is_some()),
        ("Url", |r| r.as_url().is_some()),
        ("url", |r| r.as_url().is_some()),
        ("string", |r| r.as_str() == Some("https://bar")),
        ("String", |r| r.as_str() == Some("https://bar")),
    ];
    for (name, is_kind) in cases {
        let resolved = url.resolve_named("//bar", name).unwrap();
        assert!(is_kind(&resolved), "{name}");
        assert_eq!(resolved.to_string(), "https://bar");
        assert_eq!(resolved.into_string(), "https://bar");
    }
}

#[test]
fn bad_output_kind() {
    let url = Url::parse("https://foo/bar?qux=baz").unwrap();

    for name in ["Cookie", "", "STRING", "[]"] {
        let e = url.resolve_named("//bar", name).unwrap_err();
        match e {
            ResolveError::InvalidArgument(e) => assert_eq!(e.name(), name),
            _ => panic!("unexpected error: {e:?}"),
        }
    }

    // The name is checked before the reference is parsed.
    assert!(matches!(
        url.resolve_named("c d", "Cookie").unwrap_err(),
        ResolveError::InvalidArgument(_)
    ));
}
