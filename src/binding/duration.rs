//! Duration strings of the form `[d.]hh:mm[:ss[.fffffff]]`, or a bare day count.
//!
//! Fractions are resolution-limited to 100ns ticks, up to seven digits.

use std::time::Duration;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;
const NANOS_PER_TICK: u32 = 100;
const FRACTION_DIGITS: usize = 7;

/// Parses a duration string. Returns `None` if the input does not follow the
/// grammar, a component is out of range, or the span is negative.
pub fn parse(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.starts_with('-') {
        return None;
    }

    let Some(colon) = s.find(':') else {
        let days = parse_component(s, u64::MAX / SECS_PER_DAY)?;
        return Some(Duration::from_secs(days * SECS_PER_DAY));
    };

    // A '.' before the first ':' separates days from hours.
    let (days, clock) = match s[..colon].split_once('.') {
        Some((days, _)) => (parse_component(days, u64::MAX / SECS_PER_DAY)?, &s[days.len() + 1..]),
        None => (0, s),
    };

    let mut parts = clock.split(':');
    let hours = parse_component(parts.next()?, 23)?;
    let minutes = parse_component(parts.next()?, 59)?;
    let (seconds, nanos) = match parts.next() {
        Some(rest) => parse_seconds(rest)?,
        None => (0, 0),
    };
    if parts.next().is_some() {
        return None;
    }

    let secs = (days * SECS_PER_DAY)
        .checked_add(hours * SECS_PER_HOUR + minutes * SECS_PER_MINUTE + seconds)?;
    Some(Duration::new(secs, nanos))
}

/// Formats a duration as `[d.]hh:mm:ss[.fffffff]`, truncated to whole ticks.
pub fn format(d: Duration) -> String {
    let total = d.as_secs();
    let days = total / SECS_PER_DAY;
    let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;
    let ticks = d.subsec_nanos() / NANOS_PER_TICK;

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{days}."));
    }
    out.push_str(&format!("{hours:02}:{minutes:02}:{seconds:02}"));
    if ticks > 0 {
        out.push_str(&format!(".{ticks:07}"));
    }
    out
}

fn parse_seconds(s: &str) -> Option<(u64, u32)> {
    let (whole, fraction) = match s.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (s, None),
    };
    let seconds = parse_component(whole, 59)?;

    let nanos = match fraction {
        None => 0,
        Some(f) if f.is_empty() || f.len() > FRACTION_DIGITS => return None,
        Some(f) if !f.bytes().all(|b| b.is_ascii_digit()) => return None,
        Some(f) => {
            let padded = format!("{f:0<width$}", width = FRACTION_DIGITS);
            padded.parse::<u32>().ok()? * NANOS_PER_TICK
        }
    };

    Some((seconds, nanos))
}

fn parse_component(s: &str, max: u64) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u64>().ok().filter(|v| *v <= max)
}
