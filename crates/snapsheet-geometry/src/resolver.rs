//! Release resolution: from a live drag offset to a snap target.
//!
//! Offsets here are measured from the sheet's fully-open position
//! (0 = fully open, growing toward the bottom of the viewport), while
//! configured snap points are measured from the top of the viewport.
//! The resolver bridges the two: it converts the snap-point set into
//! bottom-relative *targets*, picks the one nearest the current drag
//! offset, and optionally shifts one index in the direction of a fast
//! fling.

use smallvec::SmallVec;

use crate::constants::{CLOSE_TOLERANCE_PX, DRAG_VELOCITY_THRESHOLD};
use crate::snap_points::SnapPoints;

/// How the sheet may rest relative to its own rendered height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Detent {
    /// Only the configured snap points are valid resting states.
    #[default]
    FullHeight,
    /// Additionally allows resting at the sheet's natural content
    /// height, i.e. an implicit target at offset 0.
    ContentHeight,
}

/// The outcome of a release resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// The offset the sheet should settle at, already clamped to
    /// `[0, sheet_height]`.
    pub offset: f32,
    /// Index into the deduplicated target list.
    pub target_index: usize,
    /// Index into the *configured* snap-point set that produced the
    /// chosen target. This is the index external observers see, so it
    /// stays consistent with the caller's ordering even after targets
    /// collapse during deduplication.
    pub source_index: usize,
}

/// Bottom-relative snap targets derived from a snap-point set.
///
/// Each target carries the index of the configured snap point it came
/// from, so a resolution can be reported in the caller's terms without
/// a lossy value-based reverse search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapTargets {
    values: SmallVec<[f32; 8]>,
    sources: SmallVec<[usize; 8]>,
}

impl SnapTargets {
    /// Builds the target list for a sheet of `sheet_height` pixels.
    ///
    /// Snap points taller than the rendered sheet clamp to the sheet
    /// height (a target can never be negative). Duplicate target
    /// values keep their first occurrence only, and the smallest
    /// value is dropped outright when it was duplicated, collapsing
    /// degenerate near-zero targets that would give two configured
    /// snap points the same pixel position. With
    /// [`Detent::ContentHeight`] an implicit `0` target is inserted at
    /// the front unless one is already present.
    ///
    /// An empty snap-point set yields an empty target list: the detent
    /// only augments configured points, it never conjures a target out
    /// of nothing (the no-snap-points halfway fallback must stay in
    /// charge there).
    pub fn build(snap_points: &SnapPoints, sheet_height: f32, detent: Detent) -> Self {
        if snap_points.is_empty() {
            return SnapTargets::default();
        }
        let raw: SmallVec<[f32; 8]> = snap_points
            .as_slice()
            .iter()
            .map(|point| sheet_height - point.min(sheet_height))
            .collect();

        let min = raw.iter().copied().fold(f32::INFINITY, f32::min);
        let min_count = raw.iter().filter(|value| **value == min).count();

        let mut targets = SnapTargets::default();
        for (index, value) in raw.iter().copied().enumerate() {
            if value == min && min_count > 1 {
                continue;
            }
            if targets.values.contains(&value) {
                continue;
            }
            targets.values.push(value);
            targets.sources.push(index);
        }

        if detent == Detent::ContentHeight && !targets.values.contains(&0.0) {
            targets.values.insert(0, 0.0);
            // The implicit top-of-content target reports as the
            // most-open configured index.
            targets.sources.insert(0, 0);
        }

        targets
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Configured snap-point index behind the target at `index`.
    pub fn source_index(&self, index: usize) -> Option<usize> {
        self.sources.get(index).copied()
    }

    /// Index of the target nearest `offset`.
    ///
    /// Full linear scan with a strict improvement test: equidistant
    /// candidates resolve to the first (most-open) one scanned, and
    /// the tie-break stays deterministic regardless of list content.
    pub fn closest(&self, offset: f32) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, value) in self.values.iter().copied().enumerate() {
            let distance = (value - offset).abs();
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((index, distance)),
            }
        }
        best.map(|(index, _)| index)
    }
}

/// Clamps a prospective resting offset into the sheet's valid range.
pub fn validate_snap_to(target: f32, sheet_height: f32) -> f32 {
    target.max(0.0).min(sheet_height.max(0.0))
}

/// Whether a resting offset counts as "sheet fully closed".
///
/// Compared against the rounded sheet height with a small tolerance so
/// an animated value landing fractionally short still closes.
pub fn is_closed(offset: f32, sheet_height: f32) -> bool {
    offset + CLOSE_TOLERANCE_PX >= sheet_height.round()
}

/// Resolves the snap target nearest to `current_offset`.
///
/// Degraded inputs resolve safely rather than erroring: an unmeasured
/// sheet (`sheet_height == 0`) stays where it is at offset 0, and an
/// empty snap-point set rests at the fixed halfway position.
pub fn resolve(
    snap_points: &SnapPoints,
    sheet_height: f32,
    current_offset: f32,
    detent: Detent,
) -> Resolution {
    resolve_with_velocity(
        snap_points,
        sheet_height,
        current_offset,
        detent,
        0.0,
        DRAG_VELOCITY_THRESHOLD,
    )
}

/// Like [`resolve`], but when `velocity_y` exceeds `velocity_threshold`
/// in magnitude the resolved index shifts one step in the fling's
/// direction: positive velocity (toward closed) increments the index,
/// negative decrements it, clamped to the target range either way.
pub fn resolve_with_velocity(
    snap_points: &SnapPoints,
    sheet_height: f32,
    current_offset: f32,
    detent: Detent,
    velocity_y: f32,
    velocity_threshold: f32,
) -> Resolution {
    if sheet_height <= 0.0 {
        return Resolution {
            offset: 0.0,
            target_index: 0,
            source_index: 0,
        };
    }

    let targets = SnapTargets::build(snap_points, sheet_height, detent);
    let nearest = match targets.closest(current_offset) {
        Some(index) => index,
        // No snap points configured (or all of them collapsed):
        // always rest halfway, regardless of velocity or distance.
        None => {
            return Resolution {
                offset: validate_snap_to(sheet_height * 0.5, sheet_height),
                target_index: 0,
                source_index: 0,
            };
        }
    };

    let mut target_index = nearest;
    if velocity_y.abs() > velocity_threshold {
        if velocity_y > 0.0 {
            target_index = (target_index + 1).min(targets.len() - 1);
        } else {
            target_index = target_index.saturating_sub(1);
        }
    }

    Resolution {
        offset: validate_snap_to(targets.values()[target_index], sheet_height),
        target_index,
        source_index: targets.source_index(target_index).unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap_points::{normalize, SnapSpec};

    fn points(raw: &[f32], viewport_height: f32) -> SnapPoints {
        let specs: Vec<SnapSpec> = raw.iter().copied().map(SnapSpec::from_value).collect();
        normalize(&specs, viewport_height)
    }

    #[test]
    fn targets_clamp_points_taller_than_the_sheet() {
        // A 1000px snap point on a 600px sheet cannot go negative.
        let snap = points(&[1000.0, 300.0], 1000.0);
        let targets = SnapTargets::build(&snap, 600.0, Detent::FullHeight);
        assert_eq!(targets.values(), &[0.0, 300.0]);
    }

    #[test]
    fn duplicate_targets_collapse_keeping_first_occurrence() {
        let snap = points(&[1000.0, 300.0, 100.0, 300.0], 1000.0);
        let targets = SnapTargets::build(&snap, 1000.0, Detent::FullHeight);
        assert_eq!(targets.values(), &[0.0, 700.0, 900.0]);
        assert_eq!(targets.source_index(0), Some(0));
        assert_eq!(targets.source_index(1), Some(1));
        assert_eq!(targets.source_index(2), Some(2));
    }

    #[test]
    fn duplicated_smallest_target_is_dropped_entirely() {
        // Both oversized points clamp to target 0 on a 1000px sheet;
        // the degenerate pair disappears instead of surviving as one 0.
        let snap = points(&[1200.0, 1000.0, 300.0], 1000.0);
        let targets = SnapTargets::build(&snap, 1000.0, Detent::FullHeight);
        assert_eq!(targets.values(), &[700.0]);
        assert_eq!(targets.source_index(0), Some(2));
    }

    #[test]
    fn content_height_detent_inserts_leading_zero() {
        let snap = points(&[300.0, 100.0], 1000.0);
        let targets = SnapTargets::build(&snap, 1000.0, Detent::ContentHeight);
        assert_eq!(targets.values(), &[0.0, 700.0, 900.0]);
        assert_eq!(targets.source_index(0), Some(0));
        assert_eq!(targets.source_index(1), Some(0));
    }

    #[test]
    fn content_height_detent_skips_insertion_when_zero_present() {
        let snap = points(&[1000.0, 300.0], 1000.0);
        let targets = SnapTargets::build(&snap, 1000.0, Detent::ContentHeight);
        assert_eq!(targets.values(), &[0.0, 700.0]);
    }

    #[test]
    fn resolves_to_nearest_target() {
        let snap = points(&[1000.0, 300.0, 100.0, 300.0], 1000.0);
        let resolution = resolve(&snap, 1000.0, 650.0, Detent::FullHeight);
        assert_eq!(resolution.offset, 700.0);
        assert_eq!(resolution.target_index, 1);
        assert_eq!(resolution.source_index, 1);
    }

    #[test]
    fn equidistant_targets_resolve_to_the_more_open_one() {
        let snap = points(&[1000.0, 800.0], 1000.0);
        // 100 is exactly halfway between targets 0 and 200.
        let resolution = resolve(&snap, 1000.0, 100.0, Detent::FullHeight);
        assert_eq!(resolution.target_index, 0);
        assert_eq!(resolution.offset, 0.0);
    }

    #[test]
    fn fast_downward_fling_shifts_one_index_toward_closed() {
        let snap = points(&[1000.0, 300.0, 100.0], 1000.0);
        let resolution =
            resolve_with_velocity(&snap, 1000.0, 650.0, Detent::FullHeight, 50.0, 40.0);
        assert_eq!(resolution.offset, 900.0);
        assert_eq!(resolution.target_index, 2);
    }

    #[test]
    fn fast_upward_fling_shifts_one_index_toward_open() {
        let snap = points(&[1000.0, 300.0, 100.0], 1000.0);
        let resolution =
            resolve_with_velocity(&snap, 1000.0, 650.0, Detent::FullHeight, -50.0, 40.0);
        assert_eq!(resolution.offset, 0.0);
        assert_eq!(resolution.target_index, 0);
    }

    #[test]
    fn velocity_at_threshold_does_not_shift() {
        let snap = points(&[1000.0, 300.0, 100.0], 1000.0);
        let resolution =
            resolve_with_velocity(&snap, 1000.0, 650.0, Detent::FullHeight, 40.0, 40.0);
        assert_eq!(resolution.target_index, 1);
    }

    #[test]
    fn velocity_shift_clamps_at_the_ends() {
        let snap = points(&[1000.0, 300.0, 100.0], 1000.0);

        let down =
            resolve_with_velocity(&snap, 1000.0, 950.0, Detent::FullHeight, 200.0, 40.0);
        assert_eq!(down.target_index, 2);

        let up = resolve_with_velocity(&snap, 1000.0, 10.0, Detent::FullHeight, -200.0, 40.0);
        assert_eq!(up.target_index, 0);
    }

    #[test]
    fn no_snap_points_always_rest_halfway() {
        let snap = SnapPoints::default();
        let resolution =
            resolve_with_velocity(&snap, 800.0, 790.0, Detent::FullHeight, 500.0, 40.0);
        assert_eq!(resolution.offset, 400.0);
    }

    #[test]
    fn no_snap_points_rest_halfway_under_either_detent() {
        // The content-height detent must not smuggle an implicit 0
        // target into an empty set; the halfway fallback wins on both
        // resolve paths.
        let snap = SnapPoints::default();
        let targets = SnapTargets::build(&snap, 800.0, Detent::ContentHeight);
        assert!(targets.is_empty());

        let plain = resolve(&snap, 800.0, 790.0, Detent::ContentHeight);
        assert_eq!(plain.offset, 400.0);

        let flung =
            resolve_with_velocity(&snap, 800.0, 790.0, Detent::ContentHeight, 500.0, 40.0);
        assert_eq!(flung.offset, 400.0);
    }

    #[test]
    fn unmeasured_sheet_stays_put() {
        let snap = points(&[300.0, 100.0], 1000.0);
        let resolution = resolve(&snap, 0.0, 0.0, Detent::FullHeight);
        assert_eq!(resolution.offset, 0.0);
        assert_eq!(resolution.target_index, 0);
    }

    #[test]
    fn resolve_is_idempotent() {
        let snap = points(&[-0.001, 0.3, 0.1, 0.3], 1000.0);
        let first = resolve_with_velocity(&snap, 1000.0, 650.0, Detent::FullHeight, 50.0, 40.0);
        let second = resolve_with_velocity(&snap, 1000.0, 650.0, Detent::FullHeight, 50.0, 40.0);
        assert_eq!(first, second);
    }

    #[test]
    fn close_tolerance_matches_two_pixels() {
        assert!(!is_closed(905.0, 1000.0));
        assert!(is_closed(999.0, 1000.0));
        assert!(is_closed(998.0, 1000.0));
        assert!(!is_closed(997.9, 1000.0));
    }

    #[test]
    fn validate_snap_to_clamps_into_sheet_range() {
        assert_eq!(validate_snap_to(-10.0, 1000.0), 0.0);
        assert_eq!(validate_snap_to(1200.0, 1000.0), 1000.0);
        assert_eq!(validate_snap_to(420.0, 1000.0), 420.0);
        assert_eq!(validate_snap_to(10.0, -5.0), 0.0);
    }
}
