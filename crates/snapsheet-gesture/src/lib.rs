//! Gesture state machine for Snapsheet
//!
//! Owns the lifetime of a drag (start, move samples, release), the
//! sheet's open/close lifecycle, and the handoff between an inner
//! scrollable region and the sheet itself. All resolution math lives
//! below in `snapsheet-geometry`; all rendering/animation lives above
//! and only consumes the controller's outputs.

mod controller;
mod scroll_lock;
mod velocity;

pub use controller::*;
pub use scroll_lock::*;
pub use velocity::*;

pub mod prelude {
    pub use crate::controller::{SheetConfig, SheetController, SheetLifecycle};
    pub use crate::scroll_lock::{ScrollDecision, ScrollLockCoordinator, ScrollOwnership};
    pub use crate::velocity::VelocityTracker;
    pub use snapsheet_geometry::prelude::*;
}
