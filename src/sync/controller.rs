use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::{
    alarm::{extract, AlarmTime, NextAlarmSource, Resolution},
    icon::{DrawingBackend, IconSurfaceCache, Rgb, SurfaceId},
    parcel::set_text_payloads,
    settings::{IconConfig, DEFAULT_CLOCK_PACKAGES},
};

use super::{AlarmEvent, IgnoreReason, NotificationPosted, Outcome, SurfaceGroup, SyncState};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Turns host events into icon updates.
///
/// Every event is handled to completion before the next one; nothing is
/// queued or retried, since only the latest alarm time matters.
pub struct AlarmSyncOrchestrator<B: DrawingBackend> {
    cache: IconSurfaceCache<B>,
    source: NextAlarmSource,
    config: IconConfig,
    packages: HashSet<String>,
    groups: HashMap<SurfaceGroup, SyncState>,
    startup_pending: bool,
}

impl<B: DrawingBackend> AlarmSyncOrchestrator<B> {
    pub fn new(backend: B, source: NextAlarmSource, config: IconConfig) -> Self {
        log_info!("Alarm sync using {} next-alarm source", source.name());
        Self {
            cache: IconSurfaceCache::new(backend),
            source,
            config,
            packages: DEFAULT_CLOCK_PACKAGES.iter().map(|p| p.to_string()).collect(),
            groups: HashMap::new(),
            startup_pending: true,
        }
    }

    /// Replaces the set of packages whose notifications are parsed.
    pub fn with_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages = packages.into_iter().map(Into::into).collect();
        self
    }

    /// New style and color apply to icons built from now on.
    pub fn update_config(&mut self, config: IconConfig) {
        self.config = config;
    }

    pub fn config(&self) -> IconConfig {
        self.config
    }

    pub fn cache(&self) -> &IconSurfaceCache<B> {
        &self.cache
    }

    pub fn icon(&self, surface: &SurfaceId) -> Option<Arc<B::Icon>> {
        self.cache.icon(surface)
    }

    pub fn state(&self, group: &SurfaceGroup) -> SyncState {
        self.groups.get(group).copied().unwrap_or_default()
    }

    pub fn handle(&mut self, event: AlarmEvent) -> Outcome {
        match event {
            AlarmEvent::NotificationPosted(notification) => self.on_notification_posted(&notification),
            AlarmEvent::NotificationRemoved { key } => self.on_notification_removed(&key),
            AlarmEvent::NextAlarmChanged { formatted } => self.on_next_alarm_changed(formatted.as_deref()),
            AlarmEvent::StartUp => self.on_start_up(),
            AlarmEvent::SurfaceTornDown(surface) => self.on_surface_torn_down(&surface),
            AlarmEvent::ChromeColorChanged { surface, color } => self.on_chrome_color_changed(&surface, color),
        }
    }

    pub fn on_notification_posted(&mut self, notification: &NotificationPosted) -> Outcome {
        if !self.packages.contains(&notification.package) {
            return Outcome::Ignored(IgnoreReason::UnrecognizedPackage(notification.package.clone()));
        }

        let mut candidates = match set_text_payloads(&notification.actions) {
            Ok(texts) => texts,
            Err(err) => {
                log_debug!("Skipping notification {}: {err}", notification.key);
                return Outcome::Ignored(IgnoreReason::Decode(err));
            }
        };
        if let Some(title) = notification.title.as_deref() {
            candidates.retain(|text| text != title);
        }

        let Some(time) = extract(&candidates) else {
            log_debug!("No alarm time in notification {}", notification.key);
            return Outcome::Ignored(IgnoreReason::NoTimeFound);
        };

        let mut surfaces = vec![SurfaceId::NotificationCompact(notification.key.clone())];
        if notification.has_expanded_view {
            surfaces.push(SurfaceId::NotificationExpanded(notification.key.clone()));
        }

        self.apply(SurfaceGroup::Notification(notification.key.clone()), surfaces, time)
    }

    pub fn on_notification_removed(&mut self, key: &str) -> Outcome {
        let evicted = self.cache.evict_where(|surface| surface.notification_key() == Some(key));
        self.groups.remove(&SurfaceGroup::Notification(key.to_string()));
        Outcome::Evicted(evicted)
    }

    pub fn on_next_alarm_changed(&mut self, formatted: Option<&str>) -> Outcome {
        let surfaces = self.source.persistent_surfaces();

        match self.source.resolve(formatted) {
            Resolution::At(time) => self.apply(SurfaceGroup::Persistent, surfaces, time),
            Resolution::Cleared => {
                let evicted: Vec<SurfaceId> = surfaces
                    .into_iter()
                    .filter(|surface| self.cache.evict(surface).is_some())
                    .collect();
                self.groups.insert(SurfaceGroup::Persistent, SyncState::Uninitialized);
                log_info!("Next alarm cleared; dropped {} icon(s)", evicted.len());
                Outcome::Evicted(evicted)
            }
            Resolution::Unreadable => {
                log_debug!("Next alarm value has no readable time; keeping current icons");
                Outcome::Ignored(IgnoreReason::NoTimeFound)
            }
            Resolution::Unavailable(err) => {
                log_warn!("{err}; keeping current icons");
                Outcome::Ignored(IgnoreReason::SourceUnavailable(err))
            }
        }
    }

    /// Runs one full resync the first time it is called.
    pub fn on_start_up(&mut self) -> Outcome {
        if !self.startup_pending {
            return Outcome::Ignored(IgnoreReason::StartUpAlreadyHandled);
        }
        self.startup_pending = false;
        self.on_next_alarm_changed(None)
    }

    pub fn on_surface_torn_down(&mut self, surface: &SurfaceId) -> Outcome {
        let evicted = self.cache.evict(surface).is_some();

        let group = SurfaceGroup::of(surface);
        let group_empty = match &group {
            SurfaceGroup::Notification(key) => !self.cache.contains(&SurfaceId::NotificationCompact(key.clone()))
                && !self.cache.contains(&SurfaceId::NotificationExpanded(key.clone())),
            SurfaceGroup::Persistent => self
                .source
                .persistent_surfaces()
                .iter()
                .all(|s| !self.cache.contains(s)),
        };
        if group_empty {
            match group {
                // An absent entry already reads as `Uninitialized`.
                SurfaceGroup::Notification(_) => {
                    self.groups.remove(&group);
                }
                SurfaceGroup::Persistent => {
                    self.groups.insert(group, SyncState::Uninitialized);
                }
            }
        }

        Outcome::Evicted(if evicted { vec![surface.clone()] } else { Vec::new() })
    }

    pub fn on_chrome_color_changed(&mut self, surface: &SurfaceId, color: Rgb) -> Outcome {
        if self.cache.restyle(surface, color) {
            Outcome::Restyled(surface.clone())
        } else {
            Outcome::Ignored(IgnoreReason::NoIconHeld(surface.clone()))
        }
    }

    fn apply(&mut self, group: SurfaceGroup, surfaces: Vec<SurfaceId>, time: AlarmTime) -> Outcome {
        let prior = self.groups.insert(group.clone(), SyncState::Stale).unwrap_or_default();

        let IconConfig {
            clock_style,
            clock_color,
        } = self.config;

        match self
            .cache
            .ensure_rendered_all(&surfaces, time, clock_style, clock_color)
        {
            Ok(_) => {
                self.groups.insert(group, SyncState::Synced(time));
                log_info!("Clock icon set to {time} on {} surface(s)", surfaces.len());
                Outcome::Updated { time, surfaces }
            }
            Err(err) => {
                // Nothing in the group changed, so it is still where it was.
                let settled = match prior {
                    SyncState::Stale => SyncState::Uninitialized,
                    other => other,
                };
                self.groups.insert(group, settled);
                log_warn!("Failed to render clock icon for {time}: {err}");
                Outcome::RenderFailed(err)
            }
        }
    }
}
