mod common;
use common::run;

#[test]
fn equality_and_truthiness() {
    assert_eq!(run("print true == true; print true == false; print !false; print !nil;"), "true\nfalse\ntrue\ntrue\n");
}
