mod common;
use common::{run, run_checked};

#[test]
fn break_exits_innermost_while_loop() {
    assert_eq!(run("var i = 0; while (true) { if (i >= 3) break; print i; i = i + 1; }"), "0\n1\n2\n");
}

#[test]
fn break_exits_innermost_for_loop() {
    assert_eq!(run("for (var i = 0; i < 5; i = i + 1) { if (i == 2) break; print i; }"), "0\n1\n");
}

#[test]
fn nested_loops_break_only_the_innermost() {
    assert_eq!(run(r#"
        for (var i = 0; i < 2; i = i + 1) {
            for (var j = 0; j < 5; j = j + 1) {
                if (j == 1) break;
                print j;
            }
        }
    "#), "0\n0\n");
}

#[test]
fn break_outside_any_loop_is_a_resolve_error() {
    let (_, had_error) = run_checked("break;");
    assert!(had_error);
}

#[test]
fn break_inside_a_function_nested_in_a_loop_does_not_escape_the_loop() {
    let (_, had_error) = run_checked("while (true) { fun f() { break; } break; }");
    assert!(had_error);
}
