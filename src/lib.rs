/*!
`ftt` is a Rust crate for parsing, validating, and querying FamilyTree-Text
(FTT) documents: a line-oriented, pipe-delimited plaintext format for
genealogical records.

Basic example:

```rust
use ftt::FttBuilder;

let source = "\
HEAD_FORMAT: 1\n\
ID: jane\n\
NAME: Jane Doe\n\
BORN: 1950-04-02\n\
PARENT: john|BIO\n\
---\n\
ID: john\n\
NAME: John Doe\n\
SEX: M\n\
";

let result = FttBuilder::new().build(source);
result.document.stats();
for diagnostic in &result.document.diagnostics {
    println!("{diagnostic}");
}

let kin = result.kinship();
let rel = kin.calculate("jane", "john").unwrap();
let description = kin.describe(&rel[0], "john");
println!("{}", description.term);
```

This crate contains an optional `"json"` feature that implements
serialization and deserialization of documents and diagnostics to JSON with
[`serde`](https://serde.rs).

JSON serialization example:

```rust
# #[cfg(feature = "json")]
# fn main() -> Result<(), Box<dyn std::error::Error>> {
use ftt::FttBuilder;

let result = FttBuilder::new().build("HEAD_FORMAT: 1\nID: jane\n");
let json_output = serde_json::to_string_pretty(&result.document)?;
println!("{json_output}");
# Ok(())
# }
# #[cfg(not(feature = "json"))]
# fn main() {}
```

## Error Handling Example

Parsing and validation never fail outright: malformed input is reported as
[`error::Diagnostic`]s attached to the [`types::Document`], not a `Result`
error. `Result` is reserved for conditions that make it meaningless to
continue at all, such as invalid input encoding or an unknown id passed to
the kinship API.

```rust
use ftt::FttBuilder;

let result = FttBuilder::new().build("NAME: orphaned field before any ID");
assert!(result.document.errors().count() > 0);
for diagnostic in result.document.errors() {
    eprintln!("{diagnostic}");
}
```
*/

#![warn(missing_docs)]

/// Error and diagnostic types for the `ftt` crate.
pub mod error;
pub mod date;
pub mod kinship;
pub mod lexer;
pub mod parser;
pub mod postprocess;
pub mod text;
pub mod types;
pub mod validate;
pub mod vocab;

pub use error::{Diagnostic, DiagnosticCode, FttError, Severity};
pub use kinship::{Engine as KinshipEngine, Relationship};
pub use types::Document;

/// The result of [`FttBuilder::build`]: a [`Document`] (carrying its own
/// accumulated diagnostics) ready for kinship queries.
pub struct ParseResult {
    pub document: Document,
}

impl ParseResult {
    /// Builds a [`kinship::Engine`] over this result's document. Cheap to
    /// call repeatedly; the derived indices are rebuilt each time, so callers
    /// issuing many queries against one document should keep the returned
    /// engine around rather than calling this in a loop.
    #[must_use]
    pub fn kinship(&self) -> kinship::Engine<'_> {
        kinship::Engine::new(&self.document)
    }
}

/// Builds a [`ParseResult`] from FTT source text: parse, post-process, then
/// validate, matching the pipeline order fixed by the format (post-processing
/// must run before validation so implicit unions and reconciled children are
/// covered by the same checks as explicit ones).
#[derive(Clone, Copy, Debug, Default)]
pub struct FttBuilder {
    skip_postprocess: bool,
    skip_validate: bool,
}

impl FttBuilder {
    #[must_use]
    pub fn new() -> FttBuilder {
        FttBuilder::default()
    }

    /// Skips the post-processing pass (implicit reciprocal unions, child-list
    /// reconciliation, place parsing). Intended for inspecting exactly what a
    /// source document states, with no inference.
    #[must_use]
    pub fn skip_postprocess(mut self, skip: bool) -> FttBuilder {
        self.skip_postprocess = skip;
        self
    }

    /// Skips the validation passes, leaving `document.diagnostics` empty.
    #[must_use]
    pub fn skip_validate(mut self, skip: bool) -> FttBuilder {
        self.skip_validate = skip;
        self
    }

    /// Parses `text`, accumulating diagnostics onto the returned document.
    #[must_use]
    pub fn build(self, text: &str) -> ParseResult {
        let mut document = parser::parse(text);
        if !self.skip_postprocess {
            postprocess::postprocess(&mut document);
        }
        if !self.skip_validate {
            validate::validate(&mut document);
        }
        ParseResult { document }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_document_round_trips() {
        let result = FttBuilder::new().build("HEAD_FORMAT: 1\nID: jane\n");
        assert!(result.document.contains("jane"));
        assert_eq!(result.document.errors().count(), 0);
    }

    #[test]
    fn missing_header_is_an_error() {
        let result = FttBuilder::new().build("ID: jane\n");
        assert!(result
            .document
            .errors()
            .any(|d| d.code == DiagnosticCode::SchemaVersion));
    }

    #[test]
    fn skip_validate_leaves_diagnostics_empty() {
        let result = FttBuilder::new().skip_validate(true).build("ID: jane\n");
        assert!(result.document.diagnostics.is_empty());
    }

    #[test]
    fn kinship_reports_unknown_id() {
        let result = FttBuilder::new().build("HEAD_FORMAT: 1\nID: jane\n");
        let kin = result.kinship();
        assert!(kin.calculate("jane", "ghost").is_err());
    }
}
