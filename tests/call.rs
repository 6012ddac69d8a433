mod common;
use common::run_checked;

#[test]
fn calling_a_number_is_a_runtime_error() {
    let (_, had_error) = run_checked("var a = 1; a();");
    assert!(had_error);
}

#[test]
fn wrong_arity_is_a_runtime_error() {
    let (_, had_error) = run_checked("fun f(a, b) { return a + b; } f(1);");
    assert!(had_error);
}
