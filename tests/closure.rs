mod common;
use common::run;

#[test]
fn closure_captures_variable_by_reference() {
    assert_eq!(run(r#"
        fun makeCounter() {
            var i = 0;
            fun count() {
                i = i + 1;
                return i;
            }
            return count;
        }
        var counter = makeCounter();
        print counter();
        print counter();
        print counter();
    "#), "1\n2\n3\n");
}

#[test]
fn independent_closures_do_not_share_state() {
    assert_eq!(run(r#"
        fun makeCounter() {
            var i = 0;
            fun count() { i = i + 1; return i; }
            return count;
        }
        var a = makeCounter();
        var b = makeCounter();
        a();
        print a();
        print b();
    "#), "2\n1\n");
}
