#![no_main]
use libfuzzer_sys::fuzz_target;
use url_archive::QueryParams;
use url_archive_fuzz::{apply, Model, Op};

fuzz_target!(|ops: Vec<Op<'_>>| {
    let mut params = QueryParams::new();
    let mut model = Model::default();

    for op in &ops {
        apply(&mut params, op);
        model.apply(op);
        model.check(&params);
    }

    // Without raw values, serializing and parsing back gives the same store.
    if ops.iter().all(|op| !matches!(op, Op::SetRaw(..))) {
        let reparsed = QueryParams::parse(&params.to_query_string());
        assert_eq!(reparsed, params);
    }
});
