pub mod cache;
pub mod raster;
pub mod style;

pub use cache::IconSurfaceCache;
pub use raster::{ClockFace, RasterClock, RasterClockBackend};
pub use style::{ClockStyle, Rgb};

use std::fmt;

use thiserror::Error;

use crate::alarm::AlarmTime;

/// A place where the clock icon is shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SurfaceId {
    /// Small status icon of one notification.
    NotificationCompact(String),
    /// Larger companion icon in the expanded notification view.
    NotificationExpanded(String),
    /// Persistent `alarm_clock` slot in the status bar.
    StatusBarSlot,
    /// Alarm line in the expanded status-bar header.
    ExpandedHeader,
}

impl SurfaceId {
    pub fn notification_key(&self) -> Option<&str> {
        match self {
            SurfaceId::NotificationCompact(key) | SurfaceId::NotificationExpanded(key) => Some(key),
            SurfaceId::StatusBarSlot | SurfaceId::ExpandedHeader => None,
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.notification_key().is_none()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceId::NotificationCompact(key) => write!(f, "notification[{key}]"),
            SurfaceId::NotificationExpanded(key) => write!(f, "notification[{key}]/expanded"),
            SurfaceId::StatusBarSlot => f.write_str("status-bar/alarm_clock"),
            SurfaceId::ExpandedHeader => f.write_str("header/alarm"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("invalid icon size {0}px")]
    InvalidSize(u32),
    #[error("drawing backend failed: {0}")]
    Backend(String),
}

/// Capability that turns a time into a displayable clock icon.
///
/// Icons are shared with the UI that shows them, so `mutate` and `restyle`
/// work through `&Self::Icon` and must update the same object in place.
pub trait DrawingBackend {
    type Icon;

    fn render(&self, style: ClockStyle, color: Rgb, time: AlarmTime) -> Result<Self::Icon, RenderError>;

    fn mutate(&self, icon: &Self::Icon, time: AlarmTime);

    fn restyle(&self, icon: &Self::Icon, color: Rgb);
}
