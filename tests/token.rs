mod common;
use common::run_checked;

#[test]
fn unterminated_string_is_a_scan_error() {
    let (_, had_error) = run_checked("print \"unterminated;");
    assert!(had_error);
}

#[test]
fn unexpected_character_is_a_scan_error_but_scanning_continues() {
    let (_, had_error) = run_checked("print 1; @ print 2;");
    assert!(had_error);
}
