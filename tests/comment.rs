mod common;
use common::run;

#[test]
fn line_comments_do_not_affect_output() {
    assert_eq!(run("// this is a comment\nprint 1; // trailing comment"), "1\n");
}
