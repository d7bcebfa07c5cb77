use chrono::{DateTime, FixedOffset, Local, Utc};
use thiserror::Error;

use super::time::{parse_time, AlarmTime};
use crate::icon::SurfaceId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("next alarm source unavailable: {0}")]
pub struct SourceUnavailable(pub String);

/// Structured next-alarm accessor, e.g. the host alarm manager.
pub trait AlarmClockQuery {
    /// Trigger instant of the next scheduled alarm, `None` when no alarm is set.
    fn next_trigger(&self) -> Result<Option<DateTime<Utc>>, SourceUnavailable>;
}

/// Formatted next-alarm accessor, e.g. a system setting holding "Mon 7:05".
pub trait FormattedAlarmQuery {
    fn formatted_next_alarm(&self) -> Result<String, SourceUnavailable>;
}

/// Zone used to turn a trigger instant into wall-clock hour and minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalZone {
    #[default]
    System,
    Fixed(FixedOffset),
}

impl LocalZone {
    pub fn alarm_time(&self, instant: &DateTime<Utc>) -> AlarmTime {
        match self {
            LocalZone::System => AlarmTime::from_instant(instant, &Local),
            LocalZone::Fixed(offset) => AlarmTime::from_instant(instant, offset),
        }
    }
}

/// What a next-alarm query resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An alarm is set for this time.
    At(AlarmTime),
    /// No alarm is set any more; held icons must be dropped.
    Cleared,
    /// The source answered but no time could be read from it.
    Unreadable,
    Unavailable(SourceUnavailable),
}

/// How the host publishes the next alarm. Chosen once at start-up.
pub enum NextAlarmSource {
    EventSourced {
        query: Box<dyn AlarmClockQuery>,
        zone: LocalZone,
    },
    PolledText(Box<dyn FormattedAlarmQuery>),
}

impl NextAlarmSource {
    pub fn event_sourced(query: impl AlarmClockQuery + 'static, zone: LocalZone) -> Self {
        NextAlarmSource::EventSourced {
            query: Box::new(query),
            zone,
        }
    }

    pub fn polled_text(query: impl FormattedAlarmQuery + 'static) -> Self {
        NextAlarmSource::PolledText(Box::new(query))
    }

    pub fn name(&self) -> &'static str {
        match self {
            NextAlarmSource::EventSourced { .. } => "event-sourced",
            NextAlarmSource::PolledText(_) => "polled-text",
        }
    }

    /// Persistent surfaces this source keeps in sync.
    pub fn persistent_surfaces(&self) -> Vec<SurfaceId> {
        match self {
            NextAlarmSource::EventSourced { .. } => {
                vec![SurfaceId::StatusBarSlot, SurfaceId::ExpandedHeader]
            }
            NextAlarmSource::PolledText(_) => vec![SurfaceId::StatusBarSlot],
        }
    }

    /// Resolves the current next alarm. `inline_text` is the formatted value
    /// delivered with a change signal, used instead of querying when present.
    pub fn resolve(&self, inline_text: Option<&str>) -> Resolution {
        match self {
            NextAlarmSource::EventSourced { query, zone } => match query.next_trigger() {
                Ok(Some(instant)) => Resolution::At(zone.alarm_time(&instant)),
                Ok(None) => Resolution::Cleared,
                Err(err) => Resolution::Unavailable(err),
            },
            NextAlarmSource::PolledText(query) => {
                let text = match inline_text {
                    Some(text) => text.to_string(),
                    None => match query.formatted_next_alarm() {
                        Ok(text) => text,
                        Err(err) => return Resolution::Unavailable(err),
                    },
                };
                if text.is_empty() {
                    // Some hosts drop the status slot outright instead of hiding it.
                    return Resolution::Cleared;
                }
                parse_time(&text).map_or(Resolution::Unreadable, Resolution::At)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{ScriptedText, ScriptedTrigger};
    use super::*;
    use chrono::TimeZone;

    fn utc_plus(hours: i32) -> LocalZone {
        LocalZone::Fixed(FixedOffset::east_opt(hours * 3600).unwrap())
    }

    #[test]
    fn event_sourced_converts_trigger_to_local_time() {
        let trigger = ScriptedTrigger::new(Some(Utc.with_ymd_and_hms(2024, 5, 6, 5, 30, 0).unwrap()));
        let source = NextAlarmSource::event_sourced(trigger, utc_plus(2));
        assert_eq!(
            source.resolve(None),
            Resolution::At(AlarmTime::new(7, 30).unwrap())
        );
    }

    #[test]
    fn event_sourced_without_alarm_is_cleared() {
        let source = NextAlarmSource::event_sourced(ScriptedTrigger::new(None), LocalZone::System);
        assert_eq!(source.resolve(None), Resolution::Cleared);
    }

    #[test]
    fn event_sourced_ignores_inline_text() {
        let source = NextAlarmSource::event_sourced(ScriptedTrigger::new(None), utc_plus(0));
        assert_eq!(source.resolve(Some("Mon 7:05")), Resolution::Cleared);
    }

    #[test]
    fn event_sourced_query_failure_is_unavailable() {
        let trigger = ScriptedTrigger::new(None);
        trigger.set(Err(SourceUnavailable("alarm service not bound".into())));
        let source = NextAlarmSource::event_sourced(trigger, utc_plus(0));
        assert!(matches!(source.resolve(None), Resolution::Unavailable(_)));
    }

    #[test]
    fn polled_text_parses_formatted_value() {
        let source = NextAlarmSource::polled_text(ScriptedText::new("Tue 6:45"));
        assert_eq!(
            source.resolve(None),
            Resolution::At(AlarmTime::new(6, 45).unwrap())
        );
    }

    #[test]
    fn polled_text_prefers_inline_payload() {
        let source = NextAlarmSource::polled_text(ScriptedText::new("Tue 6:45"));
        assert_eq!(
            source.resolve(Some("Wed 8:10")),
            Resolution::At(AlarmTime::new(8, 10).unwrap())
        );
    }

    #[test]
    fn polled_text_empty_is_cleared_and_garbage_is_unreadable() {
        let empty = NextAlarmSource::polled_text(ScriptedText::new(""));
        assert_eq!(empty.resolve(None), Resolution::Cleared);

        let garbage = NextAlarmSource::polled_text(ScriptedText::new("soon"));
        assert_eq!(garbage.resolve(None), Resolution::Unreadable);
    }

    #[test]
    fn polled_text_query_failure_is_unavailable() {
        let text = ScriptedText::new("");
        text.set(Err(SourceUnavailable("resolver gone".into())));
        let source = NextAlarmSource::polled_text(text);
        assert!(matches!(source.resolve(None), Resolution::Unavailable(_)));
    }

    #[test]
    fn persistent_surfaces_follow_variant() {
        let event = NextAlarmSource::event_sourced(ScriptedTrigger::new(None), LocalZone::System);
        assert_eq!(
            event.persistent_surfaces(),
            vec![SurfaceId::StatusBarSlot, SurfaceId::ExpandedHeader]
        );

        let polled = NextAlarmSource::polled_text(ScriptedText::new(""));
        assert_eq!(polled.persistent_surfaces(), vec![SurfaceId::StatusBarSlot]);
    }
}
