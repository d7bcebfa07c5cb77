pub mod alarm;
pub mod icon;
pub mod parcel;
pub mod settings;
pub mod sync;
pub mod utils;

pub use alarm::{AlarmTime, LocalZone, NextAlarmSource, SourceUnavailable};
pub use icon::{ClockStyle, DrawingBackend, IconSurfaceCache, RasterClockBackend, Rgb, SurfaceId};
pub use parcel::{decode, set_text_payloads, DecodeError};
pub use settings::{IconConfig, SettingsStore};
pub use sync::{AlarmEvent, AlarmSyncOrchestrator, NotificationPosted, Outcome};
pub use utils::logging::init_logging;
