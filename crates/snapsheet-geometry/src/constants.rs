//! Shared gesture constants for consistent sheet behaviour.
//!
//! These thresholds are intentionally shared between the resolver and
//! the gesture layer so that release resolution, close detection, and
//! scroll handoff never disagree about what counts as "fast" or
//! "at the edge".
//!
//! All values are in logical pixels (velocities in logical pixels per
//! millisecond, matching the unit of the gesture stream's velocity
//! samples).

/// Release velocity above which the resolved snap index shifts one
/// step in the fling's direction instead of settling on the nearest
/// snap target.
///
/// Kept deliberately low so a casual flick still advances the sheet
/// one detent rather than requiring a hard throw.
pub const DRAG_VELOCITY_THRESHOLD: f32 = 40.0;

/// Tolerance, in pixels, when comparing a resting offset against the
/// sheet height to decide "fully closed".
///
/// Animated values can land fractionally short of the exact sheet
/// height; without the tolerance the close notification would never
/// fire for those frames.
pub const CLOSE_TOLERANCE_PX: f32 = 2.0;

/// Minimum finger travel, in pixels, before a touch-move sample at the
/// top snap state is allowed to transfer gesture ownership between the
/// scrollable content and the sheet.
///
/// Filters out sub-pixel jitter that would otherwise flap ownership on
/// every sample.
pub const SCROLL_HANDOFF_THRESHOLD: f32 = 1.0;
