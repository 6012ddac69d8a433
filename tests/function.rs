mod common;
use common::run;

#[test]
fn function_prints_as_fn_name() {
    assert_eq!(run("fun add(a, b) { return a + b; } print add;"), "<fn add>\n");
}

#[test]
fn function_without_return_yields_nil() {
    assert_eq!(run("fun f() {} print f();"), "nil\n");
}

#[test]
fn recursive_function() {
    assert_eq!(run(r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(10);
    "#), "55\n");
}
