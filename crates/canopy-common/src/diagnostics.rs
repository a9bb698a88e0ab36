//! Parse diagnostics.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! "This specification defines the parsing rules for HTML documents, whether
//! they are syntactically correct or not." Every recovery the tokenizer or the
//! tree builder performs is reported as a [`Diagnostic`]. Diagnostics are
//! purely observational: nothing a sink does can change how a document parses.

use serde::Serialize;
use strum_macros::Display;

use crate::warning::warn_once;

/// How serious a reported deviation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Recoverable input the parser handled in a well-defined way.
    #[strum(serialize = "warning")]
    Warning,
    /// A parse error as defined by the HTML standard.
    #[strum(serialize = "error")]
    Error,
}

/// One corrective action taken while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Human-readable description.
    pub message: String,
    /// How serious the deviation is.
    pub severity: Severity,
    /// Index of the token being processed when the diagnostic was raised.
    pub token_index: usize,
}

impl Diagnostic {
    /// Create a parse error diagnostic.
    #[must_use]
    pub fn error(message: impl Into<String>, token_index: usize) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            token_index,
        }
    }

    /// Create a warning diagnostic.
    #[must_use]
    pub fn warning(message: impl Into<String>, token_index: usize) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
            token_index,
        }
    }

    /// Whether this is a parse error rather than a warning.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

/// Receives diagnostics as they are raised.
pub trait DiagnosticSink {
    /// Observe one diagnostic.
    fn report(&mut self, diagnostic: &Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.push(diagnostic.clone());
    }
}

/// Adapts a closure into a [`DiagnosticSink`].
pub struct FnSink<F>(pub F);

impl<F: FnMut(&Diagnostic)> DiagnosticSink for FnSink<F> {
    fn report(&mut self, diagnostic: &Diagnostic) {
        (self.0)(diagnostic);
    }
}

/// Prints each distinct diagnostic once to stderr via [`warn_once`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        let _ = warn_once(
            "HTML Parser",
            &format!("{}: {}", diagnostic.severity, diagnostic.message),
        );
    }
}
