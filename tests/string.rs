mod common;
use common::run;

#[test]
fn string_literals_print_without_quotes() {
    assert_eq!(run("print \"hello\";"), "hello\n");
}

#[test]
fn multiline_string_preserves_embedded_newline() {
    assert_eq!(run("print \"a\nb\";"), "a\nb\n");
}
