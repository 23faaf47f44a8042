//! The line-oriented parser state machine (spec §4.1, §4.5).
//!
//! Grounded in the shape of a hand-rolled recursive-descent parser driven by a
//! cursor over classified input (as `ged_io`'s tokenizer/parser pair is), but the
//! state machine itself — `Global` / `InRecord` / `InField` / `InModifier` /
//! `ErrorRecovery` — is FTT-specific, since GEDCOM's level-number nesting has no
//! equivalent here.

use crate::error::{Diagnostic, DiagnosticCode};
use crate::lexer::{classify, split_lines, LogicalLine};
use crate::text::{nfc, split_pipe_segments};
use crate::types::field::Modifier;
use crate::types::record::validate_and_normalize_id;
use crate::types::{Document, Field, Record};

/// What the currently open text buffer will become once flushed.
#[derive(Debug)]
enum OpenTarget {
    Field {
        record_id: String,
        key: String,
        line: u32,
    },
    Modifier {
        record_id: String,
        key: String,
        line: u32,
    },
    Header {
        key: String,
    },
    /// A buffer being accumulated but with nowhere valid to land (orphan key,
    /// rejected modifier, header-inside-record, or content during error recovery).
    Discarded,
}

#[derive(Debug, Default)]
struct Buffer {
    text: String,
    last_was_para: bool,
}

impl Buffer {
    fn start(value: &str) -> Buffer {
        Buffer {
            text: value.to_string(),
            last_was_para: false,
        }
    }

    fn push_para(&mut self) {
        self.text.push('\n');
        self.last_was_para = true;
    }

    fn push_continuation(&mut self, rest: &str) {
        if !self.last_was_para {
            self.text.push(' ');
        }
        self.text.push_str(rest);
        self.last_was_para = false;
    }

    fn take(self) -> String {
        self.text.trim().to_string()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Mode {
    Global,
    Recording(String),
    Recovering,
}

/// Parses `text` into a [`Document`], never panicking and never aborting on
/// malformed input (spec §4.1 "Failure semantics").
#[must_use]
pub fn parse(text: &str) -> Document {
    let mut document = Document::new();
    let mut mode = Mode::Global;
    let mut open: Option<(OpenTarget, Buffer)> = None;

    let flush = |document: &mut Document, open: &mut Option<(OpenTarget, Buffer)>| {
        let Some((target, buffer)) = open.take() else {
            return;
        };
        let raw = buffer.take();
        match target {
            OpenTarget::Field {
                record_id,
                key,
                line,
            } => {
                if let Some(record) = document.get_mut(&record_id) {
                    record.data.push(Field::new(key, raw, line));
                }
            }
            OpenTarget::Modifier {
                record_id,
                key,
                line,
            } => {
                if let Some(record) = document.get_mut(&record_id) {
                    if let Some(field) = record.data.last_field_mut() {
                        field.modifiers.push(Modifier {
                            parsed: split_pipe_segments(&raw),
                            key,
                            raw,
                            defining_line: line,
                        });
                    }
                }
            }
            OpenTarget::Header { key } => {
                document.set_header(key, nfc(&raw));
            }
            OpenTarget::Discarded => {}
        }
    };

    for (line_no, raw_line) in split_lines(text) {
        match classify(raw_line) {
            LogicalLine::Comment => {}
            LogicalLine::BlockTerminator => {
                flush(&mut document, &mut open);
                mode = Mode::Global;
            }
            LogicalLine::Blank => {
                if let Some((_, buffer)) = open.as_mut() {
                    buffer.push_para();
                }
            }
            LogicalLine::Continuation { rest } => {
                if let Some((_, buffer)) = open.as_mut() {
                    buffer.push_continuation(rest);
                }
            }
            LogicalLine::Invalid => {
                flush(&mut document, &mut open);
                document.diagnostics.push(Diagnostic::new(
                    DiagnosticCode::SyntaxInvalid,
                    line_no,
                    format!("unrecognized content: {raw_line:?}"),
                ));
            }
            LogicalLine::KeyLine { key, value } => {
                flush(&mut document, &mut open);
                handle_key(&mut document, &mut mode, &mut open, key, value, line_no);
            }
        }
    }
    flush(&mut document, &mut open);
    document
}

fn handle_key(
    document: &mut Document,
    mode: &mut Mode,
    open: &mut Option<(OpenTarget, Buffer)>,
    key: &str,
    value: &str,
    line_no: u32,
) {
    if *mode == Mode::Recovering && key != "ID" {
        *open = Some((OpenTarget::Discarded, Buffer::start(value)));
        return;
    }

    if key == "ID" {
        match validate_and_normalize_id(value) {
            Ok(id) => {
                let record = Record::new(id.clone(), line_no);
                if document.insert_record(record) {
                    *mode = Mode::Recording(id);
                } else {
                    document.diagnostics.push(Diagnostic::new(
                        DiagnosticCode::DuplicateId,
                        line_no,
                        format!("duplicate id {id:?}; second definition discarded"),
                    ));
                    *mode = Mode::Recovering;
                }
            }
            Err(reason) => {
                document.diagnostics.push(Diagnostic::new(
                    DiagnosticCode::InvalidId,
                    line_no,
                    format!("invalid id {value:?}: {reason:?}"),
                ));
                *mode = Mode::Recovering;
            }
        }
        *open = None;
        return;
    }

    if key.starts_with("HEAD_") {
        if let Mode::Recording(_) = mode {
            document.diagnostics.push(Diagnostic::new(
                DiagnosticCode::CtxHeader,
                line_no,
                format!("header key {key} found inside an open record"),
            ));
            *open = Some((OpenTarget::Discarded, Buffer::start(value)));
        } else {
            *open = Some((
                OpenTarget::Header {
                    key: key.to_string(),
                },
                Buffer::start(value),
            ));
        }
        return;
    }

    let modifier_suffix = ["_SRC", "_NOTE"].into_iter().find(|s| key.ends_with(s));
    if let Some(suffix) = modifier_suffix {
        let base = &key[..key.len() - suffix.len()];
        if let Mode::Recording(record_id) = mode {
            let attaches = document
                .get(record_id)
                .and_then(|r| r.data.last_field())
                .is_some_and(|f| f.key == base);
            if attaches {
                *open = Some((
                    OpenTarget::Modifier {
                        record_id: record_id.clone(),
                        key: key.to_string(),
                        line: line_no,
                    },
                    Buffer::start(value),
                ));
                return;
            }
        }
        document.diagnostics.push(Diagnostic::new(
            DiagnosticCode::CtxModifier,
            line_no,
            format!("modifier {key} does not follow its base field"),
        ));
        *open = Some((OpenTarget::Discarded, Buffer::start(value)));
        return;
    }

    if let Mode::Recording(record_id) = mode {
        *open = Some((
            OpenTarget::Field {
                record_id: record_id.clone(),
                key: key.to_string(),
                line: line_no,
            },
            Buffer::start(value),
        ));
    } else {
        document.diagnostics.push(Diagnostic::new(
            DiagnosticCode::CtxOrphan,
            line_no,
            format!("key {key} found with no open record"),
        ));
        *open = Some((OpenTarget::Discarded, Buffer::start(value)));
    }
}
