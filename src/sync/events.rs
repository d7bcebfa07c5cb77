use crate::alarm::{AlarmTime, SourceUnavailable};
use crate::icon::{RenderError, Rgb, SurfaceId};
use crate::parcel::DecodeError;

/// A notification delivered by the host, with its raw action stream.
#[derive(Debug, Clone)]
pub struct NotificationPosted {
    /// Stable notification identity, e.g. `"<package>:<id>"`.
    pub key: String,
    pub package: String,
    /// Encoded action stream of the notification's content view.
    pub actions: Vec<u8>,
    /// Title text, which is never read as the alarm time.
    pub title: Option<String>,
    /// Whether the notification also shows an expanded view.
    pub has_expanded_view: bool,
}

/// Everything the host can tell the orchestrator.
#[derive(Debug, Clone)]
pub enum AlarmEvent {
    NotificationPosted(NotificationPosted),
    NotificationRemoved { key: String },
    /// The next alarm changed. Hosts that publish the formatted value with the
    /// signal pass it along; otherwise the source is queried.
    NextAlarmChanged { formatted: Option<String> },
    /// Fired once when the host UI comes up.
    StartUp,
    /// A widget that showed an icon no longer exists.
    SurfaceTornDown(SurfaceId),
    /// Text color of the chrome around a surface changed.
    ChromeColorChanged { surface: SurfaceId, color: Rgb },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    UnrecognizedPackage(String),
    Decode(DecodeError),
    NoTimeFound,
    SourceUnavailable(SourceUnavailable),
    StartUpAlreadyHandled,
    NoIconHeld(SurfaceId),
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Updated {
        time: AlarmTime,
        surfaces: Vec<SurfaceId>,
    },
    /// Surfaces whose icons were dropped; may be empty when none were held.
    Evicted(Vec<SurfaceId>),
    Restyled(SurfaceId),
    Ignored(IgnoreReason),
    RenderFailed(RenderError),
}
