//! Diagnostics produced while parsing and validating an FTT document.
use std::fmt;

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

/// Severity of a [`Diagnostic`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Stable, enumerated diagnostic codes. One variant per failure mode named in the
/// error taxonomy (syntax, context, identity, reference, graph, schema, vocabulary,
/// date, consistency).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum DiagnosticCode {
    /// Unrecognized content at column 0.
    SyntaxInvalid,
    /// A `HEAD_*` key was encountered while a record was open.
    CtxHeader,
    /// A `*_SRC`/`*_NOTE` modifier did not match the field immediately preceding it.
    CtxModifier,
    /// A data key appeared with no record open.
    CtxOrphan,
    /// A duplicate `ID:` definition; the second definition is discarded.
    DuplicateId,
    /// An `ID:` value that is malformed or uses a forbidden character.
    InvalidId,
    /// A referenced ID neither starts with `?` nor exists in the document.
    DanglingRef,
    /// A `*_SRC` modifier's first segment neither starts with `?` nor exists.
    DanglingSrc,
    /// A CHILD entry with no reciprocating PARENT on the child.
    GhostChild,
    /// A cycle was found in the lineage subgraph.
    CircularLineage,
    /// `HEAD_FORMAT` missing, or its declared version exceeds what is supported.
    SchemaVersion,
    /// A value was expected to be drawn from a fixed vocabulary but isn't (hard error).
    VocabInvalid,
    /// A value is outside the standard vocabulary but tolerated (warning).
    VocabNonstandard,
    /// A date-bearing position holds a literal that does not match the date grammar.
    DateInvalid,
    /// Reciprocal UNION records disagree on one or more segments.
    DataConsistency,
}

impl DiagnosticCode {
    /// The severity this code carries when not overridden by a [`crate::FttBuilder`]
    /// strictness setting.
    #[must_use]
    pub fn default_severity(self) -> Severity {
        match self {
            DiagnosticCode::DataConsistency | DiagnosticCode::VocabNonstandard => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    /// A short, stable tag string suitable for machine consumption.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            DiagnosticCode::SyntaxInvalid => "SYNTAX_INVALID",
            DiagnosticCode::CtxHeader => "CTX_HEADER",
            DiagnosticCode::CtxModifier => "CTX_MODIFIER",
            DiagnosticCode::CtxOrphan => "CTX_ORPHAN",
            DiagnosticCode::DuplicateId => "DUPLICATE_ID",
            DiagnosticCode::InvalidId => "INVALID_ID",
            DiagnosticCode::DanglingRef => "DANGLING_REF",
            DiagnosticCode::DanglingSrc => "DANGLING_SRC",
            DiagnosticCode::GhostChild => "GHOST_CHILD",
            DiagnosticCode::CircularLineage => "CIRCULAR_LINEAGE",
            DiagnosticCode::SchemaVersion => "SCHEMA_VERSION",
            DiagnosticCode::VocabInvalid => "VOCAB_INVALID",
            DiagnosticCode::VocabNonstandard => "VOCAB_NONSTANDARD",
            DiagnosticCode::DateInvalid => "DATE_INVALID",
            DiagnosticCode::DataConsistency => "DATA_CONSISTENCY",
        }
    }
}

/// One accumulated parser or validator finding.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    /// 1-based source line.
    pub line: u32,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(code: DiagnosticCode, line: u32, message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            code,
            severity: code.default_severity(),
            line,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Diagnostic {
        self.severity = severity;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] line {}: {}",
            self.severity,
            self.code.tag(),
            self.line,
            self.message
        )
    }
}

/// Crate-level error for conditions that make it meaningless to continue at all.
/// Data-shaped problems are always [`Diagnostic`]s, never this type.
#[derive(Debug)]
pub enum FttError {
    /// Input bytes could not be interpreted as UTF-8 text.
    InvalidEncoding(String),
    /// An API caller passed an ID that is not present in the document.
    UnknownId(String),
}

impl fmt::Display for FttError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FttError::InvalidEncoding(msg) => write!(f, "invalid encoding: {msg}"),
            FttError::UnknownId(id) => write!(f, "unknown id: {id}"),
        }
    }
}

impl std::error::Error for FttError {}
