use crate::alarm::AlarmTime;
use crate::icon::SurfaceId;

/// Where a group of surfaces stands relative to the last known alarm.
///
/// `Stale` only exists while an event is being handled; every handler leaves
/// the group `Uninitialized` or `Synced` before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Uninitialized,
    Synced(AlarmTime),
    Stale,
}

/// Surfaces that are always updated together by one event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SurfaceGroup {
    /// Compact and expanded icons of one notification.
    Notification(String),
    /// Status-bar slot and header, driven by the next-alarm source.
    Persistent,
}

impl SurfaceGroup {
    pub fn of(surface: &SurfaceId) -> Self {
        if surface.is_persistent() {
            return SurfaceGroup::Persistent;
        }
        match surface.notification_key() {
            Some(key) => SurfaceGroup::Notification(key.to_string()),
            None => SurfaceGroup::Persistent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surfaces_map_to_their_group() {
        assert_eq!(
            SurfaceGroup::of(&SurfaceId::NotificationExpanded("clock:3".into())),
            SurfaceGroup::Notification("clock:3".into())
        );
        assert_eq!(SurfaceGroup::of(&SurfaceId::ExpandedHeader), SurfaceGroup::Persistent);
        assert!(SurfaceId::StatusBarSlot.is_persistent());
        assert!(!SurfaceId::NotificationCompact("clock:3".into()).is_persistent());
    }
}
