#![no_main]
use libfuzzer_sys::fuzz_target;
use url_archive::{Components, Reference, UrlForm};

fuzz_target!(|data: &str| {
    let Ok(r) = Reference::parse(data) else {
        return;
    };

    // The components cover the whole input.
    let mut buf = String::with_capacity(data.len());
    if let Some(s) = r.scheme() {
        buf.push_str(s);
        buf.push(':');
    }
    if let Some(a) = r.authority_str() {
        buf.push_str("//");
        buf.push_str(a);
    }
    buf.push_str(r.path().as_str());
    if let Some(q) = r.query() {
        buf.push('?');
        buf.push_str(q);
    }
    if let Some(f) = r.fragment() {
        buf.push('#');
        buf.push_str(f);
    }
    assert_eq!(data, buf);

    // Building a URL gives a string that parses back to the same components.
    let c1 = Components::parse(data).unwrap();
    let s1 = c1.build_url();
    let c2 = Components::parse(&s1).unwrap();
    assert_eq!(c1.scheme(), c2.scheme());
    assert_eq!(c1.authority(), c2.authority());
    assert_eq!(c1.query_string(), c2.query_string());
    assert_eq!(c1.fragment(), c2.fragment());
    assert_eq!(s1, c2.build_url());
});
