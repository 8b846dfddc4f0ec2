//! Property-based invariant tests for snap-point resolution.
//!
//! These verify the resolver's universal guarantees over randomized
//! configurations:
//!
//! 1. Normalizing a descending spec list yields a descending sequence,
//!    whatever mix of fraction / absolute / bottom-offset forms is used
//! 2. The resolved offset is never farther from the drag position than
//!    any other candidate target
//! 3. Resolution is idempotent
//! 4. The velocity shift never pushes the index out of range, and the
//!    resolved offset always stays inside `[0, sheet_height]`

use proptest::prelude::*;
use snapsheet_geometry::{
    in_descending_order, normalize, resolve, resolve_with_velocity, Detent, SnapPoints, SnapSpec,
    SnapTargets, DRAG_VELOCITY_THRESHOLD,
};

const VIEWPORT: f32 = 1000.0;

/// Expresses a pixel offset in one of the three spec forms, all of
/// which must normalize back to the same absolute value.
fn spec_for(px: u32, form: u8) -> SnapSpec {
    match form % 3 {
        0 if (1..=1000).contains(&px) => SnapSpec::Fraction(px as f32 / 1000.0),
        1 => SnapSpec::FromBottom(px as f32 - VIEWPORT),
        _ => SnapSpec::FromTop(px as f32),
    }
}

/// Strategy: a valid (descending) spec list with randomized forms.
/// Includes the empty configuration, which must fall back to the
/// halfway resting position.
fn descending_specs() -> impl Strategy<Value = Vec<SnapSpec>> {
    prop::collection::vec((0u32..=1000, 0u8..3), 0..6).prop_map(|mut raw| {
        raw.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        raw.into_iter().map(|(px, form)| spec_for(px, form)).collect()
    })
}

fn detent_strategy() -> impl Strategy<Value = Detent> {
    prop_oneof![Just(Detent::FullHeight), Just(Detent::ContentHeight)]
}

fn snap_points(specs: &[SnapSpec]) -> SnapPoints {
    normalize(specs, VIEWPORT)
}

proptest! {
    #[test]
    fn normalize_preserves_descending_order(specs in descending_specs()) {
        let snap = snap_points(&specs);
        prop_assert!(in_descending_order(snap.as_slice()));
    }

    #[test]
    fn normalized_forms_agree_on_pixel_values(
        raw in prop::collection::vec((0u32..=1000, 0u8..3), 0..6)
    ) {
        let mut pixels: Vec<u32> = raw.iter().map(|(px, _)| *px).collect();
        pixels.sort_unstable_by(|a, b| b.cmp(a));
        let specs: Vec<SnapSpec> = pixels
            .iter()
            .zip(raw.iter())
            .map(|(px, (_, form))| spec_for(*px, *form))
            .collect();

        let snap = snap_points(&specs);
        for (resolved, px) in snap.as_slice().iter().zip(&pixels) {
            // Fraction forms round-trip through an f32 division.
            prop_assert!((resolved - *px as f32).abs() < 0.5);
        }
    }

    #[test]
    fn resolved_offset_is_the_closest_candidate(
        specs in descending_specs(),
        detent in detent_strategy(),
        sheet_height in 100.0f32..1200.0,
        current_offset in 0.0f32..1300.0,
    ) {
        let snap = snap_points(&specs);
        let targets = SnapTargets::build(&snap, sheet_height, detent);
        prop_assume!(!targets.is_empty());

        let resolution = resolve(&snap, sheet_height, current_offset, detent);
        let chosen_distance = (resolution.offset - current_offset).abs();
        for candidate in targets.values() {
            let candidate_distance = (candidate - current_offset).abs();
            prop_assert!(
                chosen_distance <= candidate_distance + 1e-3,
                "target {} at distance {} beats chosen {} at distance {}",
                candidate,
                candidate_distance,
                resolution.offset,
                chosen_distance
            );
        }
    }

    #[test]
    fn resolution_is_idempotent(
        specs in descending_specs(),
        detent in detent_strategy(),
        sheet_height in 0.0f32..1200.0,
        current_offset in 0.0f32..1300.0,
        velocity in -500.0f32..500.0,
    ) {
        let snap = snap_points(&specs);
        let first = resolve_with_velocity(
            &snap, sheet_height, current_offset, detent, velocity, DRAG_VELOCITY_THRESHOLD,
        );
        let second = resolve_with_velocity(
            &snap, sheet_height, current_offset, detent, velocity, DRAG_VELOCITY_THRESHOLD,
        );
        prop_assert_eq!(first, second);
    }

    #[test]
    fn empty_snap_point_set_always_rests_halfway(
        detent in detent_strategy(),
        sheet_height in 100.0f32..1200.0,
        current_offset in 0.0f32..1300.0,
        velocity in -500.0f32..500.0,
    ) {
        let snap = SnapPoints::default();
        let resolution = resolve_with_velocity(
            &snap, sheet_height, current_offset, detent, velocity, DRAG_VELOCITY_THRESHOLD,
        );
        prop_assert_eq!(resolution.offset, sheet_height * 0.5);
    }

    #[test]
    fn velocity_shift_stays_in_bounds(
        specs in descending_specs(),
        detent in detent_strategy(),
        sheet_height in 100.0f32..1200.0,
        current_offset in 0.0f32..1300.0,
        velocity in -500.0f32..500.0,
    ) {
        let snap = snap_points(&specs);
        let targets = SnapTargets::build(&snap, sheet_height, detent);
        prop_assume!(!targets.is_empty());

        let resolution = resolve_with_velocity(
            &snap, sheet_height, current_offset, detent, velocity, DRAG_VELOCITY_THRESHOLD,
        );
        prop_assert!(resolution.target_index < targets.len());
        prop_assert!(resolution.offset >= 0.0);
        prop_assert!(resolution.offset <= sheet_height);
    }
}
