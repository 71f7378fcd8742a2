//! The Liminal pipeline driver.
//!
//! Composes read source → parse → typecheck → lower → validate IR →
//! execute. Parse and type errors are reported with ariadne and reject the
//! program; IR validation failures are fatal; runtime failures never abort
//! (they surface as Result values or defaults inside the program).
//!
//! The oracle is selected from environment/config at the execution step
//! unless the caller injects one (tests do).

use std::io::{BufRead, Write};
use std::path::Path;

use liminal_rt::oracle::{config::oracle_from_env, Oracle};

/// Run a Liminal source file against the given streams.
///
/// Returns the process exit code: 0 on success, 1 on any error. When
/// `oracle` is `None`, the oracle comes from `LIMINAL_*` environment
/// variables and `liminal.ini`.
pub fn run_file(
    path: &Path,
    oracle: Option<Box<dyn Oracle>>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> i32 {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Unable to read {}: {}", path.display(), err);
            return 1;
        }
    };
    run_source(&source, &path.display().to_string(), oracle, input, out)
}

/// Run Liminal source text through the whole pipeline.
pub fn run_source(
    source: &str,
    filename: &str,
    oracle: Option<Box<dyn Oracle>>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> i32 {
    let parse = liminal_parser::parse(source);
    let typeck = liminal_typeck::check(&parse);

    if report_diagnostics(source, filename, &parse, &typeck) {
        return 1;
    }

    let prog = liminal_ir::lower(&parse, &typeck);
    if let Err(message) = liminal_ir::validate(&prog) {
        eprintln!("IR invalid: {message}");
        return 1;
    }

    if std::env::var("LIMINAL_DEBUG_IR").is_ok() {
        eprintln!("IR:\n{prog}");
    }

    let mut oracle = match oracle {
        Some(oracle) => oracle,
        None => oracle_from_env(),
    };

    match liminal_ir::execute(&prog, input, out, oracle.as_mut()) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

/// Report parse and type-check diagnostics. Returns true if there are any
/// errors.
fn report_diagnostics(
    source: &str,
    filename: &str,
    parse: &liminal_parser::Parse,
    typeck: &liminal_typeck::TypeckResult,
) -> bool {
    let mut has_errors = false;

    for error in parse.errors() {
        has_errors = true;
        use ariadne::{Config, Label, Report, ReportKind, Source};
        if source.is_empty() {
            eprintln!("Parse error: {}", error.message);
            continue;
        }
        let start = (error.span.start as usize).min(source.len().saturating_sub(1));
        let end = (error.span.end as usize).min(source.len()).max(start + 1);
        let _ = Report::<std::ops::Range<usize>>::build(ReportKind::Error, start..end)
            .with_message("Parse error")
            .with_config(Config::default().with_color(false))
            .with_label(Label::new(start..end).with_message(&error.message))
            .finish()
            .eprint(Source::from(source));
    }

    for rendered in typeck.render_errors(source, filename) {
        has_errors = true;
        eprint!("{rendered}");
    }

    has_errors
}
