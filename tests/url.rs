use url_archive::{QueryParam, Url, UrlArchive, UrlForm};

#[test]
fn build_url() {
    let mut url = Url::new("example.com");
    assert_eq!(url.build_url(), "https://example.com");

    url.set_hash("foo");
    assert_eq!(url.build_url(), "https://example.com#foo");

    url.set_param("foo", "bar").set_param("foobar", "foo bar");
    assert_eq!(url.build_url(), "https://example.com?foo=bar&foobar=foo+bar#foo");

    url.set_path("some/path");
    assert_eq!(url.build_url(), "https://example.com/some/path?foo=bar&foobar=foo+bar#foo");

    url.set_scheme("http");
    assert_eq!(url.build_url(), "http://example.com/some/path?foo=bar&foobar=foo+bar#foo");

    url.set_port(Some(8080)).set_userinfo(Some("me"));
    assert_eq!(url.build_url(), "http://me@example.com:8080/some/path?foo=bar&foobar=foo+bar#foo");

    url.set_port(None).set_userinfo(None).clear_params().set_fragment(None);
    assert_eq!(url.build_url(), "http://example.com/some/path");
}

#[test]
fn set_param() {
    let mut url = Url::new("example");
    assert_eq!(url.query_string(), "");

    url.set_param("foo", "bar");
    assert_eq!(url.query_string(), "foo=bar");

    url.set_param("foo", "baz");
    assert_eq!(url.query_string(), "foo=baz");

    url.set_param("foobar", "foo bar");
    assert_eq!(url.query_string(), "foo=baz&foobar=foo+bar");

    url.set_raw_param("foobar", "foo bar");
    assert_eq!(url.query_string(), "foo=baz&foobar=foo bar");

    // Updating a parameter keeps its position.
    url.set_param("foo", "qux");
    assert_eq!(url.query_string(), "foo=qux&foobar=foo bar");
}

#[test]
fn param_value() {
    let mut url = Url::new("example");
    assert_eq!(url.param_value("q"), None);
    assert_eq!(url.param_value_or("q", "foo"), "foo");

    url.set_param("q", "bar");
    assert_eq!(url.param_value("q"), Some("bar"));
    assert_eq!(url.param_value_or("q", "foo"), "bar");
    assert_eq!(url.param("q"), Some(&QueryParam::new("q", "bar")));
}

#[test]
fn remove_param() {
    let mut url = Url::new("example");
    assert_eq!(url.query_string(), "");

    url.set_param("foo", "bar").set_param("foobar", "foo bar");
    assert_eq!(url.query_string(), "foo=bar&foobar=foo+bar");

    url.remove_param("foo");
    assert_eq!(url.query_string(), "foobar=foo+bar");

    // Removing an absent parameter does nothing.
    url.remove_param("foo").remove_param("nope");
    assert_eq!(url.query_string(), "foobar=foo+bar");

    url.remove_param("foobar");
    assert_eq!(url.build_url(), "https://example");
}

#[test]
fn set_host() {
    let mut url = Url::new("example");
    assert_eq!(url.host(), "example");
    url.set_host("google.com");
    assert_eq!(url.host(), "google.com");

    let mut url = Url::parse("/path").unwrap();
    assert!(!url.has_authority());
    url.set_host("example.com");
    assert!(url.has_authority());
    assert_eq!(url.build_url(), "//example.com/path");
}

#[test]
fn params() {
    let mut url = Url::new("example");
    assert!(url.params().is_empty());

    url.set_param("foo", "bar");
    assert_eq!(url.params().len(), 1);
    assert!(url.params().contains("foo"));
    assert_eq!(url.params()["foo"].value(), "bar");

    url.append_param(QueryParam::new("foo", "baz"));
    assert_eq!(url.query_string(), "foo=bar&foo=baz");
    url.params_mut().set("foo", "qux");
    assert_eq!(url.query_string(), "foo=qux");
}

#[test]
fn from_string() {
    let url = Url::parse("https://foo/bar?qux=baz").unwrap();
    assert_eq!(url.build_url(), "https://foo/bar?qux=baz");

    let url: Url = "HTTP://user@[::1]:8080/a/b?x&y=1#frag".parse().unwrap();
    assert_eq!(url.scheme(), "http");
    assert_eq!(url.userinfo(), Some("user"));
    assert_eq!(url.host(), "[::1]");
    assert_eq!(url.port(), Some(8080));
    assert_eq!(url.path(), "/a/b");
    assert!(url.path().segments().eq(["a", "b"]));
    assert!(!url.params()["x"].has_value());
    assert_eq!(url.fragment(), Some("frag"));
    assert_eq!(url.build_url(), "http://user@[::1]:8080/a/b?x&y=1#frag");

    for s in [
        "mailto:user@example.com",
        "urn:isbn:0451450523",
        "//cdn.example.com/lib.js",
        "/absolute/path?q=1",
        "relative/path#top",
        "file:///etc/hosts",
        "https://example.com/?",
        "",
    ] {
        let url = Url::try_from(s).unwrap();
        let expected = s.strip_suffix('?').unwrap_or(s);
        assert_eq!(url.build_url(), expected);
        assert_eq!(url.to_string(), expected);
    }

    assert!(Url::parse("http://a b").is_err());
    assert!(Url::parse("1http://a").is_err());
}

#[track_caller]
fn assert_separators(s: &str, has_query: bool, has_fragment: bool) {
    assert_eq!(s.matches('?').count(), has_query as usize, "{s}");
    assert_eq!(s.matches('#').count(), has_fragment as usize, "{s}");
    if let (Some(q), Some(f)) = (s.find('?'), s.find('#')) {
        assert!(q < f, "{s}");
    }
}

#[test]
fn separators() {
    let mut url = Url::new("example.com");
    url.set_param("q", "what?").set_fragment(Some("a?b"));
    assert_eq!(url.build_url(), "https://example.com?q=what%3F#a%3Fb");
    assert_separators(&url.build_url(), true, true);

    const TEXT: [&str; 10] = [
        "what?", "a#b", "x&y=z", "1+1=2", "caf%E9", "%zz", "a b?#", "?", "#", "",
    ];

    for name in TEXT.iter().filter(|s| !s.is_empty()) {
        for value in TEXT {
            for fragment in [None, Some(""), Some("a?b"), Some("#x#"), Some("%E9 ?")] {
                let mut url = Url::new("example.com");
                url.set_path("p?#").set_param(name, value).set_fragment(fragment);

                let s = url.build_url();
                assert_separators(&s, true, fragment.is_some());
                assert_eq!(url.param_value(name), Some(value));

                let parsed = Url::parse(&s).unwrap();
                assert_eq!(parsed, url, "{s}");
                assert_eq!(parsed.build_url(), s);
            }
        }
    }
}

#[test]
fn non_utf8_round_trip() {
    for s in [
        "http://a/search?q=caf%E9",
        "http://a/?%FF=1&x=a+%e9#f",
        "http://a/?lang=%C3%A9&raw=%E9%E9%FF",
        "//a?k=%80",
    ] {
        let url = Url::parse(s).unwrap();
        assert_eq!(url.build_url(), s);
        assert_eq!(Url::parse(&url.build_url()).unwrap(), url);
    }

    let url = Url::parse("http://a/search?q=caf%E9&lang=%C3%A9").unwrap();
    assert_eq!(url.param_value("q"), Some("caf%E9"));
    assert_eq!(url.param_value("lang"), Some("\u{e9}"));
}

#[test]
fn archive_round_trip() {
    let mut url = Url::new("example.com");
    url.set_path("a").set_param("k", "v");

    let archive = url.to_archive();
    url.set_param("k", "changed");
    assert_eq!(archive.param_value("k"), Some("v"));

    let back: Url = archive.clone().into();
    assert_eq!(back.build_url(), "https://example.com/a?k=v");
    assert_eq!(UrlArchive::from(back), archive);
}
