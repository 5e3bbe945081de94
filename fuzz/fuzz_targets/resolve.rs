#![no_main]
use libfuzzer_sys::fuzz_target;
use url_archive::{ResolveError, Resolver, Url, UrlArchive, UrlForm};

fuzz_target!(|data: (&str, &str, bool)| {
    let (base, r, allow_path_underflow) = data;
    let Ok(base) = Url::parse(base) else {
        return;
    };
    let resolver = Resolver::with_base(&base).allow_path_underflow(allow_path_underflow);

    let u1 = match resolver.resolve(r) {
        Ok(u) => u,
        Err(ResolveError::PathUnderflow) => {
            assert!(!allow_path_underflow);
            return;
        }
        Err(_) => return,
    };

    // Every output form agrees.
    let s = u1.build_url();
    assert_eq!(resolver.resolve_to_string(r).unwrap(), s);
    assert_eq!(resolver.resolve_as::<UrlArchive>(r).unwrap().build_url(), s);

    // The target parses back to itself.
    let u2 = Url::parse(&s).unwrap();
    assert_eq!(u2.build_url(), s);
    assert_eq!(u1.scheme(), u2.scheme());
    assert_eq!(u1.authority(), u2.authority());
    assert_eq!(u1.fragment(), u2.fragment());

    // Only the fragment is taken from a fragment-only reference.
    if r.starts_with('#') {
        assert_eq!(u1.path(), base.path());
        assert_eq!(u1.params(), base.params());
    }
});
