#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // The parser's core invariant is totality: no input should panic, loop
    // forever, or otherwise fail to produce a Document plus diagnostics.
    let result = ftt::FttBuilder::new().build(data);
    let _ = result.document.diagnostics.len();
});
