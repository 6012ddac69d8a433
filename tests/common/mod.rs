use std::cell::RefCell;
use std::rc::Rc;

use rocks::Rocks;

/// Runs `source` as a whole program and returns everything it printed.
/// Used by tests that assert on `print` output rather than on exit codes
/// or stderr, since [`Rocks`] normally writes straight to the process's
/// stdout.
pub fn run(source: &str) -> String {
    let output = Rc::new(RefCell::new(Vec::new()));
    let mut rocks = Rocks::with_writer(Rc::clone(&output) as Rc<RefCell<dyn std::io::Write>>);
    rocks.run_line(source);
    String::from_utf8(output.borrow().clone()).expect("interpreter output to be valid UTF-8")
}

/// Runs `source` and returns its printed output alongside whether any
/// scan/parse/resolve/runtime error occurred.
pub fn run_checked(source: &str) -> (String, bool) {
    let output = Rc::new(RefCell::new(Vec::new()));
    let mut rocks = Rocks::with_writer(Rc::clone(&output) as Rc<RefCell<dyn std::io::Write>>);
    rocks.run_line(source);
    let had_error = rocks.had_error();
    (String::from_utf8(output.borrow().clone()).expect("interpreter output to be valid UTF-8"), had_error)
}
