pub mod source;
pub mod time;

pub use source::{
    AlarmClockQuery, FormattedAlarmQuery, LocalZone, NextAlarmSource, Resolution, SourceUnavailable,
};
pub use time::{extract, parse_time, AlarmTime};
