mod common;
use common::{run, run_checked};

#[test]
fn this_refers_to_the_calling_instance() {
    assert_eq!(run(r#"
        class Cake {
            taste() {
                var adjective = "delicious";
                return "The " + this.flavor + " cake is " + adjective + "!";
            }
        }
        var cake = Cake();
        cake.flavor = "German chocolate";
        print cake.taste();
    "#), "The German chocolate cake is delicious!\n");
}

#[test]
fn this_outside_a_method_is_a_resolve_error() {
    let (_, had_error) = run_checked("print this;");
    assert!(had_error);
}
