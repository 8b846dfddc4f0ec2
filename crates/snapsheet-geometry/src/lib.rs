//! Snap-point geometry & gesture-release resolution for Snapsheet
//!
//! This crate is the numeric half of the sheet widget: it turns raw
//! snap-point specifications into absolute offsets, and turns a live
//! drag position plus release velocity into the offset the sheet
//! should settle at. It is pure and synchronous; the gesture state
//! machine and any rendering/animation layers live above it.

mod constants;
mod resolver;
mod snap_points;

pub use constants::*;
pub use resolver::*;
pub use snap_points::*;

pub mod prelude {
    pub use crate::constants::{CLOSE_TOLERANCE_PX, DRAG_VELOCITY_THRESHOLD};
    pub use crate::resolver::{
        is_closed, resolve, resolve_with_velocity, validate_snap_to, Detent, Resolution,
        SnapTargets,
    };
    pub use crate::snap_points::{in_descending_order, normalize, SnapPoints, SnapSpec};
}
