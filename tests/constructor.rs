mod common;
use common::run;

#[test]
fn init_runs_on_construction() {
    assert_eq!(run(r#"
        class Foo {
            init(value) { this.value = value; }
        }
        print Foo(42).value;
    "#), "42\n");
}

#[test]
fn bare_return_in_init_still_yields_the_instance() {
    assert_eq!(run(r#"
        class Foo {
            init(value) {
                this.value = value;
                if (value > 0) return;
                this.value = -1;
            }
        }
        print Foo(5).value;
    "#), "5\n");
}
