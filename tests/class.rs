mod common;
use common::{run, run_checked};

#[test]
fn class_declaration_prints_as_class_name() {
    assert_eq!(run("class Foo {} print Foo;"), "<cls Foo>\n");
}

#[test]
fn instances_print_with_instance_suffix() {
    assert_eq!(run("class Foo {} print Foo();"), "<Foo instance>\n");
}

#[test]
fn fields_can_be_set_and_read_back() {
    assert_eq!(run("class Foo {} var f = Foo(); f.bar = 1; print f.bar;"), "1\n");
}

#[test]
fn undefined_field_access_is_a_runtime_error() {
    let (_, had_error) = run_checked("class Foo {} print Foo().bar;");
    assert!(had_error);
}

#[test]
fn class_cannot_inherit_from_itself() {
    let (_, had_error) = run_checked("class Foo < Foo {}");
    assert!(had_error);
}
