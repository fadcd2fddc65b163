use chrono::DateTime;
use serde_json::Value;

/// Reads a duration in whole seconds.
///
/// Accepts a JSON number, an integer-seconds string (`"125"`) or an ISO-8601
/// duration (`"PT2M5S"`). Fractions are truncated; negative or unparseable
/// input gives `None`.
pub fn duration_seconds(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().and_then(non_negative_seconds)),
        Value::String(text) => {
            let text = text.trim();
            if let Ok(seconds) = text.parse::<u64>() {
                return Some(seconds);
            }
            if text.starts_with('P') {
                return iso8601_seconds(text);
            }
            text.parse::<f64>().ok().and_then(non_negative_seconds)
        }
        _ => None,
    }
}

fn non_negative_seconds(seconds: f64) -> Option<u64> {
    (seconds.is_finite() && seconds >= 0.0).then(|| seconds.floor() as u64)
}

/// `PnW`, `PnD` and `PTnHnMnS` forms; years and months have no fixed length and are rejected
fn iso8601_seconds(text: &str) -> Option<u64> {
    let rest = text.strip_prefix('P')?;
    let (date, time) = rest.split_once('T').unwrap_or((rest, ""));
    if date.is_empty() && time.is_empty() {
        return None;
    }
    let total = sum_units(date, &[('W', 604_800.0), ('D', 86_400.0)])?
        + sum_units(time, &[('H', 3_600.0), ('M', 60.0), ('S', 1.0)])?;
    non_negative_seconds(total)
}

/// Units must appear at most once and in the order given
fn sum_units(part: &str, units: &[(char, f64)]) -> Option<f64> {
    let mut total = 0.0;
    let mut number = String::new();
    let mut next_unit = 0;
    for c in part.chars() {
        match c {
            '0'..='9' | '.' => number.push(c),
            ',' => number.push('.'),
            unit => {
                let offset = units[next_unit..].iter().position(|(u, _)| *u == unit)?;
                let (_, factor) = units[next_unit + offset];
                next_unit += offset + 1;
                let amount: f64 = number.parse().ok()?;
                total += amount * factor;
                number.clear();
            }
        }
    }
    number.is_empty().then_some(total)
}

/// Reads a point in time as epoch seconds, from a number, an epoch-seconds
/// string or an RFC 3339 timestamp
pub fn epoch_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>().ok().or_else(|| {
                DateTime::parse_from_rfc3339(text)
                    .ok()
                    .map(|time| time.timestamp())
            })
        }
        _ => None,
    }
}
