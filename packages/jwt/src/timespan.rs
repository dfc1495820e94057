//! Human-readable timespan parsing
//!
//! `"90"` → 90 ms, `"2h"` → 7 200 000 ms, `"1.5 days"` → 129 600 000 ms.
//! A bare number is milliseconds; units are case-insensitive.

use once_cell::sync::Lazy;
use regex::Regex;

const SECOND: f64 = 1000.0;
const MINUTE: f64 = SECOND * 60.0;
const HOUR: f64 = MINUTE * 60.0;
const DAY: f64 = HOUR * 24.0;
const WEEK: f64 = DAY * 7.0;
const YEAR: f64 = DAY * 365.25;

const MAX_INPUT_LEN: usize = 100;

static TIMESPAN: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(-?(?:\d+)?\.?\d+) *(milliseconds?|msecs?|ms|seconds?|secs?|s|minutes?|mins?|m|hours?|hrs?|h|days?|d|weeks?|w|years?|yrs?|y)?$",
    )
    .ok()
});

/// Parse a timespan into milliseconds
///
/// Returns `None` for empty, over-long or unrecognised input.
#[must_use]
pub fn parse(input: &str) -> Option<f64> {
    if input.is_empty() || input.len() > MAX_INPUT_LEN {
        return None;
    }
    let captures = TIMESPAN.as_ref()?.captures(input)?;
    let amount: f64 = captures.get(1)?.as_str().parse().ok()?;
    let unit = captures
        .get(2)
        .map_or_else(|| "ms".to_string(), |m| m.as_str().to_ascii_lowercase());

    let factor = match unit.as_str() {
        "years" | "year" | "yrs" | "yr" | "y" => YEAR,
        "weeks" | "week" | "w" => WEEK,
        "days" | "day" | "d" => DAY,
        "hours" | "hour" | "hrs" | "hr" | "h" => HOUR,
        "minutes" | "minute" | "mins" | "min" | "m" => MINUTE,
        "seconds" | "second" | "secs" | "sec" | "s" => SECOND,
        "milliseconds" | "millisecond" | "msecs" | "msec" | "ms" => 1.0,
        _ => return None,
    };
    Some(amount * factor)
}
