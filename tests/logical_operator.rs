mod common;
use common::run;

#[test]
fn or_short_circuits_and_returns_the_truthy_operand() {
    assert_eq!(run("print false or 2; print nil or false; print 1 or 2;"), "2\nfalse\n1\n");
}

#[test]
fn and_short_circuits_and_returns_the_falsy_operand() {
    assert_eq!(run("print true and 3; print false and 1; print 1 and nil;"), "3\nfalse\nnil\n");
}
