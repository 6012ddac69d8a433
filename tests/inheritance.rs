mod common;
use common::{run, run_checked};

#[test]
fn subclass_inherits_methods() {
    assert_eq!(run(r#"
        class Doughnut {
            cook() { return "Fry until golden brown."; }
        }
        class BostonCream < Doughnut {}
        print BostonCream().cook();
    "#), "Fry until golden brown.\n");
}

#[test]
fn inheriting_from_a_non_class_is_a_runtime_error() {
    let (_, had_error) = run_checked("var NotAClass = 1; class Foo < NotAClass {}");
    assert!(had_error);
}

#[test]
fn subclass_can_set_fields_inherited_from_base_methods() {
    assert_eq!(run(r#"
        class Base {
            setField(value) { this.field = value; }
            getField() { return this.field; }
        }
        class Derived < Base {}
        var d = Derived();
        d.setField(7);
        print d.getField();
    "#), "7\n");
}
