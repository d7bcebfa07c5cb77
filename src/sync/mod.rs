pub mod controller;
pub mod events;
pub mod state;

pub use controller::AlarmSyncOrchestrator;
pub use events::{AlarmEvent, IgnoreReason, NotificationPosted, Outcome};
pub use state::{SurfaceGroup, SyncState};
