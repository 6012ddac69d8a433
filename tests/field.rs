mod common;
use common::run_checked;

#[test]
fn properties_on_non_instances_are_a_runtime_error() {
    let (_, had_error) = run_checked("var a = 1; print a.field;");
    assert!(had_error);
}

#[test]
fn setting_a_property_on_non_instance_is_a_runtime_error() {
    let (_, had_error) = run_checked("var a = 1; a.field = 2;");
    assert!(had_error);
}
