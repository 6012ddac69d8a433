mod common;
use common::run;

#[test]
fn decimal_literals_round_trip_trailing_zeros() {
    assert_eq!(run("print 1.0; print 3.14;"), "1.0\n3.14\n");
}

#[test]
fn arithmetic_uses_exact_decimal_math() {
    assert_eq!(run("print 0.1 + 0.2;"), "0.3\n");
}
