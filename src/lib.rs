//! Rocks is a tree-walking interpreter for Lox, a small dynamically typed
//! language with lexical scoping, first-class functions, closures, and
//! single-inheritance classes.
//!
//! ## Scanning
//! The first step is scanning: converting source text into a flat list of
//! tokens. The scanner is implemented in [`scanner`] and reports lexical
//! errors (unterminated strings, unexpected characters) through
//! [`error::Diagnostics`] without stopping — it always produces a
//! best-effort token stream so later errors in the same source are found
//! in the same run.
//!
//! ## Parsing
//! The second step is parsing: converting the token list into an abstract
//! syntax tree. The parser in [`parser`] is a recursive-descent parser
//! producing [`expr::Expr`] (value-producing nodes) and [`stmt::Stmt`]
//! (side-effecting nodes). Parse errors recover by synchronizing to the
//! next statement boundary, so one malformed declaration does not hide
//! errors in the rest of the file.
//!
//! ## Resolving
//! The third step is resolving: a static pass over the AST in [`resolver`]
//! that binds every variable reference to a lexical depth ahead of
//! execution, and enforces rules that only make sense statically (no
//! `return` at top level, no `this` outside a method, no class inheriting
//! from itself, and so on).
//!
//! ## Interpreting
//! The final step is interpreting: [`interpreter::Interpreter`] walks the
//! resolved AST directly, using [`environment::Environment`] for lexical
//! scoping and [`object::Object`] as the runtime value representation.
//! Runtime errors (wrong arity, non-callable target, undefined property)
//! are reported the same way as scan/parse/resolve errors, through
//! [`error::Diagnostics`].

use std::cell::RefCell;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::rc::Rc;

pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod repl;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use error::Diagnostics;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// The process exit code used when a script had a compile-time error
/// (scan, parse, or resolve failure).
pub const EX_DATAERR: i32 = 65;
/// The process exit code used when a script raised an uncaught runtime error.
pub const EX_SOFTWARE: i32 = 70;
/// The process exit code used for CLI misuse (too many arguments).
pub const EX_USAGE: i32 = 64;

/// The interpreter's public facade: owns the persistent interpreter state
/// (the global environment) across however many `run` calls the host makes
/// — one for a whole script, or one per line in the REPL.
pub struct Rocks {
    interpreter: Interpreter,
    diagnostics: Diagnostics,
}

impl Rocks {
    pub fn new() -> Self {
        Rocks { interpreter: Interpreter::new(), diagnostics: Diagnostics::new() }
    }

    /// Builds a `Rocks` whose `print` output goes to `stdout` instead of
    /// the process's real stdout — used by tests that assert on captured
    /// output without spawning the `rocks` binary.
    pub fn with_writer(stdout: Rc<RefCell<dyn Write>>) -> Self {
        Rocks { interpreter: Interpreter::with_writer(stdout), diagnostics: Diagnostics::new() }
    }

    pub fn had_error(&self) -> bool {
        self.diagnostics.had_error()
    }

    /// Reads `path`, runs it, and exits the process with a distinguished
    /// code if it failed (65 for compile-time errors, 70 for an uncaught
    /// runtime error), matching spec's external interface.
    pub fn run_file(&mut self, path: impl AsRef<Path>) -> io::Result<()> {
        let source = std::fs::read_to_string(path)?;
        self.run(&source);

        if self.diagnostics.had_runtime_error() {
            process::exit(EX_SOFTWARE);
        }
        if self.diagnostics.had_error() {
            process::exit(EX_DATAERR);
        }
        Ok(())
    }

    /// Runs one line of source, resetting the error flags before returning
    /// so a mistake on one REPL line doesn't poison the next.
    pub fn run_line(&mut self, source: &str) {
        self.run(source);
        self.diagnostics.reset();
    }

    fn run(&mut self, source: &str) {
        let tokens = Scanner::new(source).scan_tokens(&self.diagnostics);
        if self.diagnostics.had_error() {
            return;
        }

        let statements = Parser::new(tokens, &self.diagnostics).parse();
        if self.diagnostics.had_error() {
            return;
        }

        let locals = Resolver::new(&self.diagnostics).resolve(&statements);
        if self.diagnostics.had_error() {
            return;
        }

        self.interpreter.resolve(locals);
        if let Err(error) = self.interpreter.interpret(&statements) {
            self.diagnostics.runtime_error(&error);
        }
    }
}

impl Default for Rocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_does_not_run_the_program() {
        let mut rocks = Rocks::new();
        rocks.run_line("var;");
        assert!(rocks.diagnostics.had_error());
    }

    #[test]
    fn run_line_resets_error_state_for_the_next_line() {
        let mut rocks = Rocks::new();
        rocks.run_line("var;");
        assert!(rocks.diagnostics.had_error());
        rocks.run_line("print 1;");
        assert!(!rocks.diagnostics.had_error());
    }

    #[test]
    fn runtime_error_is_reported_through_diagnostics() {
        let mut rocks = Rocks::new();
        rocks.run_line("print 1 / 0;");
        assert!(rocks.diagnostics.had_runtime_error());
    }
}
