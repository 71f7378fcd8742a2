//! Ariadne-based diagnostic rendering for type errors.
//!
//! Renders a [`TypeError`] into a formatted, labeled message. Output is
//! colorless so test assertions and terminal output are identical.

use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};

use crate::error::TypeError;

/// Render a type error into a formatted diagnostic string.
pub fn render_diagnostic(error: &TypeError, source: &str, _filename: &str) -> String {
    let config = Config::default().with_color(false);
    let source_len = source.len();

    // Clamp the span to be valid and non-empty within source bounds;
    // ariadne needs at least a one-character label.
    let start = (error.span.start as usize).min(source_len);
    let end = (error.span.end as usize).min(source_len).max(start);
    let range: Range<usize> = if start == end {
        start..end.saturating_add(1).min(source_len)
    } else {
        start..end
    };

    let report = Report::<Range<usize>>::build(ReportKind::Error, range.clone())
        .with_message(&error.message)
        .with_config(config)
        .with_label(Label::new(range).with_message(&error.message))
        .finish();

    let mut buf = Vec::new();
    report
        .write(Source::from(source), &mut buf)
        .expect("failed to write diagnostic");
    String::from_utf8(buf).expect("diagnostic output should be valid UTF-8")
}
