#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct KinshipQuery<'a> {
    text: &'a str,
    a: &'a str,
    b: &'a str,
}

fuzz_target!(|query: KinshipQuery| {
    let result = ftt::FttBuilder::new().build(query.text);
    let engine = result.kinship();
    // Unknown ids are rejected with an error, never a panic; known ids must
    // always resolve to a non-empty relationship list.
    if let Ok(relationships) = engine.calculate(query.a, query.b) {
        assert!(!relationships.is_empty());
        for rel in &relationships {
            let _ = engine.describe(rel, query.b);
        }
    }
});
