mod common;
use common::{run, run_checked};

#[test]
fn super_calls_the_overridden_method() {
    assert_eq!(run(r#"
        class A {
            method() { return "A method"; }
        }
        class B < A {
            method() { return super.method(); }
        }
        print B().method();
    "#), "A method\n");
}

#[test]
fn super_outside_a_class_is_a_resolve_error() {
    let (_, had_error) = run_checked("super.method();");
    assert!(had_error);
}

#[test]
fn super_in_a_class_with_no_superclass_is_a_resolve_error() {
    let (_, had_error) = run_checked("class A { method() { super.method(); } }");
    assert!(had_error);
}

#[test]
fn missing_superclass_method_is_a_runtime_error() {
    let (_, had_error) = run_checked(r#"
        class A {}
        class B < A { method() { super.nope(); } }
        B().method();
    "#);
    assert!(had_error);
}
