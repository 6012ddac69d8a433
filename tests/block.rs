mod common;
use common::run;

#[test]
fn block_scopes_shadow_outer_names() {
    assert_eq!(run(r#"
        var a = "outer";
        {
            var a = "inner";
            print a;
        }
        print a;
    "#), "inner\nouter\n");
}

#[test]
fn nested_blocks_see_enclosing_scopes() {
    assert_eq!(run(r#"
        var a = 1;
        {
            var b = 2;
            {
                print a + b;
            }
        }
    "#), "3\n");
}
