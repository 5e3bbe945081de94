#![no_main]
use libfuzzer_sys::fuzz_target;
use url_archive::{
    component::Path,
    pct_enc::{self, table},
};

fuzz_target!(|data: &str| {
    let s = pct_enc::encode(data, table::QUERY_DATA);
    assert!(s.bytes().all(|x| x == b'%' || table::QUERY_DATA.allows(x)));
    assert_eq!(pct_enc::decode(&s), data);

    let s = pct_enc::encode_form(data, table::QUERY_DATA);
    assert!(!s.contains(' '));
    assert_eq!(pct_enc::decode_form(&s), data);

    let s = pct_enc::encode_lenient(data, table::PATH);
    assert!(Path::new(&s).is_some());
});
