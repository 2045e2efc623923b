//! Parsing of human readable playback offsets.
//!
//! Four recognizers are tried against the same input, in a fixed order, and
//! the last one that matches wins. The textual formats overlap (`1m30s`
//! contains both a `30s` and a `1m` match) so running them all and keeping
//! the most specific, latest result yields the intended value without a
//! mutually exclusive grammar.
//!
//! A recognizer only needs its literals to be present somewhere in the input;
//! it does not have to consume the whole string.

use std::fmt;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref SECONDS: Regex = Regex::new(r"(\d+)\s*s").expect("seconds pattern");
    static ref MINUTES: Regex = Regex::new(r"(\d+)\s*m").expect("minutes pattern");
    static ref MINUTES_SECONDS: Regex =
        Regex::new(r"(\d+)\s*m\s*(\d+)\s*s").expect("minutes and seconds pattern");
    static ref CLOCK: Regex = Regex::new(r"(\d+):(\d+):(\d+)").expect("clock pattern");
}

/// Which textual form produced a parsed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    /// `{d}s`
    Seconds,
    /// `{d}m`
    Minutes,
    /// `{a}m{b}s`, optionally with whitespace around the unit letters.
    MinutesSeconds,
    /// `H:M:S` with components of any width.
    Clock,
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeFormat::Seconds => "seconds",
            TimeFormat::Minutes => "minutes",
            TimeFormat::MinutesSeconds => "minutes+seconds",
            TimeFormat::Clock => "clock",
        };
        f.write_str(name)
    }
}

/// Canonical offset together with the recognizer that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTime {
    pub seconds: u64,
    pub format: TimeFormat,
}

type Recognizer = fn(&str) -> Option<u64>;

const RECOGNIZERS: [(TimeFormat, Recognizer); 4] = [
    (TimeFormat::Seconds, recognize_seconds),
    (TimeFormat::Minutes, recognize_minutes),
    (TimeFormat::MinutesSeconds, recognize_minutes_seconds),
    (TimeFormat::Clock, recognize_clock),
];

/// Parses `expression` into a whole number of seconds from playback start.
///
/// Returns `None` when no recognizer matched.
pub fn parse_seconds(expression: &str) -> Option<u64> {
    parse_detailed(expression).map(|parsed| parsed.seconds)
}

/// Like [`parse_seconds`] but also reports which format won.
pub fn parse_detailed(expression: &str) -> Option<ParsedTime> {
    // Every recognizer runs; later matches overwrite earlier ones.
    RECOGNIZERS
        .iter()
        .filter_map(|(format, recognize)| {
            recognize(expression).map(|seconds| ParsedTime {
                seconds,
                format: *format,
            })
        })
        .last()
}

/// Formats a whole second count as `H:MM:SS`.
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}

fn recognize_seconds(expression: &str) -> Option<u64> {
    let caps = SECONDS.captures(expression)?;
    component(&caps, 1)
}

fn recognize_minutes(expression: &str) -> Option<u64> {
    let caps = MINUTES.captures(expression)?;
    component(&caps, 1)?.checked_mul(60)
}

fn recognize_minutes_seconds(expression: &str) -> Option<u64> {
    let caps = MINUTES_SECONDS.captures(expression)?;
    let minutes = component(&caps, 1)?;
    let seconds = component(&caps, 2)?;
    minutes.checked_mul(60)?.checked_add(seconds)
}

fn recognize_clock(expression: &str) -> Option<u64> {
    let caps = CLOCK.captures(expression)?;
    let hours = component(&caps, 1)?;
    let minutes = component(&caps, 2)?;
    let seconds = component(&caps, 3)?;
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

// Digit runs too long for a u64 make the recognizer fail rather than wrap.
fn component(caps: &Captures<'_>, index: usize) -> Option<u64> {
    caps.get(index)?.as_str().parse().ok()
}
