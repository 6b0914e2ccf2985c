use chrono::{DateTime, Utc};
use std::fmt::{Display, Write};

pub const SECONDS: &str = "seconds";
pub const KILOMETRES: &str = "km";
pub const MISSING: &str = "n/a";

/// Replaces each `{i}` in `template` with the i-th argument.
///
/// Placeholders without a matching argument are kept verbatim.
pub fn format_positional(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let placeholder = tail.find('}').and_then(|close| {
            let index = &tail[..close];
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            index
                .parse::<usize>()
                .ok()
                .and_then(|i| args.get(i))
                .map(|arg| (arg, close))
        });
        match placeholder {
            Some((arg, close)) => {
                let _ = write!(out, "{arg}");
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// `"{value} {unit}"`, or `n/a` when the value is missing.
pub fn quantity(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) => format_positional("{0} {1}", &[&value, &unit]),
        None => MISSING.to_string(),
    }
}

pub fn parse_quantity(text: &str, unit: &str) -> Option<f64> {
    let number = text.trim().strip_suffix(unit)?.trim_end();
    number.parse().ok()
}

pub fn sun_position(altitude: f64, azimuth: f64) -> String {
    format_positional("{0}°/{1}°", &[&altitude, &azimuth])
}

pub fn parse_sun_position(text: &str) -> Option<(f64, f64)> {
    let (altitude, azimuth) = text.trim().split_once('/')?;
    let altitude = altitude.strip_suffix('°')?.parse().ok()?;
    let azimuth = azimuth.strip_suffix('°')?.parse().ok()?;
    Some((altitude, azimuth))
}

pub fn date(value: DateTime<Utc>) -> String {
    value.format("%-m/%-d/%Y").to_string()
}

pub fn time(value: DateTime<Utc>) -> String {
    value.format("%-I:%M:%S %p").to_string()
}
