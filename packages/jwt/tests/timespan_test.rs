//! Human-readable timespan parsing

use compact_jws::timespan::parse;

#[test]
fn test_units() {
    assert_eq!(parse("90"), Some(90.0));
    assert_eq!(parse("1s"), Some(1_000.0));
    assert_eq!(parse("2 minutes"), Some(120_000.0));
    assert_eq!(parse("2h"), Some(7_200_000.0));
    assert_eq!(parse("1.5 days"), Some(129_600_000.0));
    assert_eq!(parse("1w"), Some(604_800_000.0));
    assert_eq!(parse("1y"), Some(31_557_600_000.0));
    assert_eq!(parse("100 msecs"), Some(100.0));
}

#[test]
fn test_case_insensitive_and_signed() {
    assert_eq!(parse("1H"), Some(3_600_000.0));
    assert_eq!(parse("-10 Seconds"), Some(-10_000.0));
    assert_eq!(parse(".5s"), Some(500.0));
}

#[test]
fn test_rejects_garbage() {
    assert_eq!(parse(""), None);
    assert_eq!(parse("soon"), None);
    assert_eq!(parse("10 fortnights"), None);
    assert_eq!(parse("1h30m"), None);
    assert_eq!(parse(&"1".repeat(101)), None);
}
