//! Tests for diagnostics sinks and document loading.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use canopy_common::diagnostics::{Diagnostic, DiagnosticSink, FnSink, Severity};
use canopy_common::source::{SourceError, read_document};
use canopy_common::warning::{clear_warnings, warn_once};

#[test]
fn test_vec_sink_collects_in_order() {
    let mut sink: Vec<Diagnostic> = Vec::new();
    sink.report(&Diagnostic::error("first", 0));
    sink.report(&Diagnostic::warning("second", 3));

    assert_eq!(sink.len(), 2);
    assert!(sink[0].is_error());
    assert_eq!(sink[1].severity, Severity::Warning);
    assert_eq!(sink[1].token_index, 3);
}

#[test]
fn test_fn_sink_forwards_to_closure() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let captured = Rc::clone(&seen);
    let mut sink = FnSink(move |d: &Diagnostic| captured.borrow_mut().push(d.message.clone()));

    sink.report(&Diagnostic::error("stray end tag", 1));

    assert_eq!(seen.borrow().as_slice(), ["stray end tag".to_string()]);
}

#[test]
fn test_severity_display() {
    assert_eq!(Severity::Error.to_string(), "error");
    assert_eq!(Severity::Warning.to_string(), "warning");
}

#[test]
fn test_warn_once_deduplicates() {
    clear_warnings();
    assert!(warn_once("Test", "dedup-check message"));
    assert!(!warn_once("Test", "dedup-check message"));
    assert!(warn_once("Other", "dedup-check message"));
}

#[test]
fn test_read_document_strips_bom() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all("\u{FEFF}<p>hi".as_bytes()).expect("write");

    let text = read_document(file.path()).expect("readable");
    assert_eq!(text, "<p>hi");
}

#[test]
fn test_read_document_rejects_invalid_utf8() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"ok\xFFbad").expect("write");

    let err = read_document(file.path()).expect_err("invalid utf-8");
    assert!(matches!(err, SourceError::InvalidUtf8 { offset: 2, .. }));
}

#[test]
fn test_read_document_missing_file() {
    let err = read_document("/definitely/not/here.html").expect_err("missing");
    assert!(matches!(err, SourceError::Io { .. }));
    assert!(err.to_string().contains("failed to read"));
}
