use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

use crate::errors::{DurationParseError, Result};

const NANOS_PER_MICRO: f64 = 1_000.0;
const NANOS_PER_MILLI: f64 = 1_000_000.0;
const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Parses a duration as written in a channel resource.
///
/// Accepts Go-style strings (`"300ms"`, `"1h30m"`, `"1.5s"`, `"0"`) and the
/// ISO-8601 subset used by delivery specs (`"PT0.2S"`, `"P1DT2H"`).
pub fn parse_duration(input: &str) -> Result<Duration> {
    let input = input.trim();

    if input.is_empty() {
        return Err(DurationParseError::Empty);
    }

    if input.starts_with('P') || input.starts_with('p') {
        return parse_iso8601_duration(input);
    }

    parse_go_duration(input)
}

fn parse_go_duration(input: &str) -> Result<Duration> {
    // "0" is the only unit-less value Go accepts
    if input == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total_nanos: f64 = 0.0;
    let mut rest = input;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| DurationParseError::MissingUnit(input.to_string()))?;
        if number_len == 0 {
            return Err(DurationParseError::InvalidNumber(input.to_string()));
        }
        let value: f64 = rest[..number_len]
            .parse()
            .map_err(|_| DurationParseError::InvalidNumber(input.to_string()))?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit_nanos = match &rest[..unit_len] {
            "ns" => 1.0,
            "us" | "µs" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SEC,
            "m" => 60.0 * NANOS_PER_SEC,
            "h" => 3_600.0 * NANOS_PER_SEC,
            other => return Err(DurationParseError::UnknownUnit(other.to_string())),
        };
        rest = &rest[unit_len..];

        total_nanos += value * unit_nanos;
    }

    nanos_to_duration(total_nanos, input)
}

fn parse_iso8601_duration(input: &str) -> Result<Duration> {
    let upper = input.to_uppercase();
    let mut chars = upper.chars();

    // leading 'P' already checked by the caller
    chars.next();

    let mut in_time_part = false;
    let mut current = String::new();
    let mut total_nanos: f64 = 0.0;
    let mut saw_component = false;

    for c in chars {
        match c {
            'T' => in_time_part = true,
            '0'..='9' | '.' => current.push(c),
            unit => {
                let value: f64 = current
                    .parse()
                    .map_err(|_| DurationParseError::InvalidNumber(input.to_string()))?;
                current.clear();
                let seconds = match (unit, in_time_part) {
                    ('W', false) => 7.0 * 86_400.0,
                    ('D', false) => 86_400.0,
                    ('H', true) => 3_600.0,
                    ('M', true) => 60.0,
                    ('S', true) => 1.0,
                    _ => return Err(DurationParseError::UnknownUnit(unit.to_string())),
                };
                total_nanos += value * seconds * NANOS_PER_SEC;
                saw_component = true;
            }
        }
    }

    if !current.is_empty() {
        return Err(DurationParseError::MissingUnit(input.to_string()));
    }
    if !saw_component {
        return Err(DurationParseError::InvalidNumber(input.to_string()));
    }

    nanos_to_duration(total_nanos, input)
}

fn nanos_to_duration(nanos: f64, input: &str) -> Result<Duration> {
    if !nanos.is_finite() || nanos > u64::MAX as f64 {
        return Err(DurationParseError::Overflow(input.to_string()));
    }
    Ok(Duration::from_nanos(nanos.round() as u64))
}

/// Deserializes an optional duration string; empty strings count as unset.
pub(crate) fn deserialize_opt_duration<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_duration(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// JetStream encodes durations as integer nanoseconds.
pub(crate) mod nanos {
    use super::*;

    pub(crate) fn serialize<S>(value: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nanos = i64::try_from(value.as_nanos()).unwrap_or(i64::MAX);
        serializer.serialize_i64(nanos)
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = i64::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos.max(0) as u64))
    }
}

pub(crate) fn is_zero(value: &Duration) -> bool {
    value.is_zero()
}
