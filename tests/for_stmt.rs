mod common;
use common::run;

#[test]
fn for_loop_desugars_correctly() {
    assert_eq!(run("for (var i = 0; i < 3; i = i + 1) print i;"), "0\n1\n2\n");
}

#[test]
fn for_loop_without_initializer_or_increment() {
    assert_eq!(run(r#"
        var i = 0;
        for (; i < 2;) { print i; i = i + 1; }
    "#), "0\n1\n");
}
