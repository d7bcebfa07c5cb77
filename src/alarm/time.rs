use std::fmt;

use chrono::{DateTime, TimeZone, Timelike};
use once_cell::sync::Lazy;
use regex_lite::Regex;

static TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([01]?[0-9]|2[0-3]):([0-5][0-9])").expect("valid time pattern"));

/// An hour/minute pair on a 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlarmTime {
    hour: u8,
    minute: u8,
}

impl AlarmTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Local wall-clock time of `instant` in `zone`.
    pub fn from_instant<Tz: TimeZone, Z: TimeZone>(instant: &DateTime<Tz>, zone: &Z) -> Self {
        let local = instant.with_timezone(zone);
        Self {
            hour: local.hour() as u8,
            minute: local.minute() as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl fmt::Display for AlarmTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// First time-shaped substring of `text`, if any.
///
/// This does not check that the match is really the alarm field: a label such
/// as "Alarm in 3:45" reads as 03:45.
pub fn parse_time(text: &str) -> Option<AlarmTime> {
    let caps = TIME_PATTERN.captures(text)?;
    let hour = caps.get(1)?.as_str().parse().ok()?;
    let minute = caps.get(2)?.as_str().parse().ok()?;
    AlarmTime::new(hour, minute)
}

/// Scans `candidates` in order and returns the first time found.
pub fn extract<I, S>(candidates: I) -> Option<AlarmTime>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .find_map(|candidate| parse_time(candidate.as_ref()))
}
