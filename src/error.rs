use std::cell::Cell;

use crate::token::{Token, Type};

/// Accumulates whether scan/parse/resolve or runtime errors occurred during a
/// run, and is the single place that formats diagnostics onto stderr. Held by
/// [`crate::Rocks`] and threaded through the pipeline by reference so the
/// REPL can reset it between inputs (spec: "the REPL resets the error code
/// between inputs").
#[derive(Default)]
pub struct Diagnostics {
    had_error: Cell<bool>,
    had_runtime_error: Cell<bool>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn had_error(&self) -> bool {
        self.had_error.get() || self.had_runtime_error.get()
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error.get()
    }

    pub fn reset(&self) {
        self.had_error.set(false);
        self.had_runtime_error.set(false);
    }

    pub fn scan_error(&self, line: usize, message: impl AsRef<str>) {
        self.report(line, "", message.as_ref());
        self.had_error.set(true);
    }

    pub fn parse_error(&self, token: &Token, message: impl AsRef<str>) {
        let where_ = if token.kind == Type::Eof {
            " at end".to_string()
        } else {
            format!(" at '{}'", token.lexeme)
        };
        self.report(token.line, &where_, message.as_ref());
        self.had_error.set(true);
    }

    pub fn resolve_error(&self, token: &Token, message: impl AsRef<str>) {
        self.parse_error(token, message);
    }

    pub fn runtime_error(&self, error: &RuntimeError) {
        self.report(error.token.line, "", &error.message);
        self.had_runtime_error.set(true);
    }

    fn report(&self, line: usize, where_: &str, message: &str) {
        eprintln!("[line {line}] Error{where_}: {message}");
    }
}

/// An error raised during evaluation; carries the token it originated from so
/// the sink can report a source line.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: Token, message: impl Into<String>) -> Self {
        RuntimeError { token, message: message.into() }
    }
}
