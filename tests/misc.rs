mod common;
use common::run;

#[test]
fn type_builtin_names_the_runtime_category() {
    assert_eq!(run(r#"
        print type(1);
        print type("s");
        print type(true);
        print type(nil);
        class Foo {}
        print type(Foo);
        print type(Foo());
    "#), "number\nstring\nboolean\nnil\nclass\ninstance\n");
}

#[test]
fn str_builtin_stringifies_any_value() {
    assert_eq!(run("print str(1) + str(true);"), "1true\n");
}
