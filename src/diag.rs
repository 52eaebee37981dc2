//! Diagnostic model for lexing and SELECT analysis failures.
//!
//! Diagnostics are plain data while parsing and are only turned into
//! `miette` reports when a caller wants to render them against the SQL text.

use crate::ast::Span;
use miette::{Diagnostic, LabeledSpan, Report, Severity};
use std::fmt;

/// Role of a diagnostic label in the overall diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    /// The location that caused the failure.
    Primary,
    /// Supporting context, e.g. the clause the failure sits in.
    Secondary,
}

/// A labeled span within a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagLabel {
    /// The span this label refers to.
    pub span: Span,
    /// The label text explaining this span's relevance.
    pub message: String,
    /// Whether this is a primary or secondary label.
    pub role: LabelRole,
}

/// A structured error message with source locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    /// The main diagnostic message.
    pub message: String,
    /// Labeled spans showing relevant source locations.
    pub labels: Vec<DiagLabel>,
    /// Optional help text suggesting how to fix the statement.
    pub help: Option<String>,
    /// Optional diagnostic code, `L...` for lexing and `P...` for parsing.
    pub code: Option<String>,
}

impl Diag {
    /// Creates a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            labels: Vec::new(),
            help: None,
            code: None,
        }
    }

    /// Adds a primary label to this diagnostic.
    pub fn with_primary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel {
            span,
            message: message.into(),
            role: LabelRole::Primary,
        });
        self
    }

    /// Adds a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel {
            span,
            message: message.into(),
            role: LabelRole::Secondary,
        });
        self
    }

    /// Sets the help text for this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the diagnostic code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Returns the span of the primary label, if any.
    pub fn primary_span(&self) -> Option<&Span> {
        self.labels
            .iter()
            .find(|label| label.role == LabelRole::Primary)
            .map(|label| &label.span)
    }
}

impl fmt::Display for Diag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{code}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Renders a diagnostic against the statement it was produced for.
pub fn convert_diag_to_report(diag: &Diag, source: &str) -> Report {
    Report::new(Rendered {
        diag: diag.clone(),
        source_len: source.len(),
    })
    .with_source_code(source.to_string())
}

/// Keeps `span` inside `0..=len` so a synthetic span never breaks rendering.
fn clamp_span(span: &Span, len: usize) -> Span {
    let start = span.start.min(len);
    let end = span.end.min(len).max(start);
    start..end
}

/// A diagnostic bound to the length of the text it will be shown against.
#[derive(Debug)]
struct Rendered {
    diag: Diag,
    source_len: usize,
}

impl Rendered {
    fn labeled_spans(&self) -> impl Iterator<Item = LabeledSpan> + '_ {
        self.diag.labels.iter().map(|label| {
            let span = clamp_span(&label.span, self.source_len);
            let text = Some(label.message.clone());
            match label.role {
                LabelRole::Primary => LabeledSpan::new_primary_with_span(text, span),
                LabelRole::Secondary => LabeledSpan::new_with_span(text, span),
            }
        })
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diag.message)
    }
}

impl std::error::Error for Rendered {}

impl Diagnostic for Rendered {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = self.diag.code.as_ref()?;
        Some(Box::new(code) as Box<dyn fmt::Display + 'a>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = self.diag.help.as_ref()?;
        Some(Box::new(help) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.diag.labels.is_empty() {
            return None;
        }
        Some(Box::new(self.labeled_spans()))
    }
}
