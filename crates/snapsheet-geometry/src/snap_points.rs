//! Snap-point specification and normalization.
//!
//! Callers configure the sheet with a mix of viewport fractions,
//! absolute pixel offsets, and offsets measured up from the bottom
//! edge. [`normalize`] resolves that mix into one ordered list of
//! absolute top-of-viewport offsets, which the resolver then works
//! against. Normalization is idempotent and cheap; it is simply rerun
//! whenever the viewport height or the configuration changes.

use smallvec::SmallVec;

/// A raw snap-point specification supplied at configuration time.
///
/// Index 0 of the configured list is expected to be the tallest /
/// most-open state; resolved values must come out in descending order
/// (see [`normalize`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapSpec {
    /// Fraction of the viewport height, in `(0, 1]`.
    Fraction(f32),
    /// Absolute pixel offset from the top of the viewport.
    FromTop(f32),
    /// Offset added to the viewport height; typically negative, e.g.
    /// `FromBottom(-34.0)` rests 34 px below the top edge.
    FromBottom(f32),
}

impl SnapSpec {
    /// Classifies a plain number the way the sheet's public API has
    /// always interpreted one: values in `(0, 1]` are viewport
    /// fractions, negative values are bottom offsets, and any other
    /// positive value is an absolute pixel offset.
    pub fn from_value(value: f32) -> Self {
        if value > 0.0 && value <= 1.0 {
            SnapSpec::Fraction(value)
        } else if value < 0.0 {
            SnapSpec::FromBottom(value)
        } else {
            SnapSpec::FromTop(value)
        }
    }

    /// Resolves this spec to an absolute top-of-viewport offset.
    fn resolve(self, viewport_height: f32) -> f32 {
        match self {
            SnapSpec::Fraction(fraction) => (fraction * viewport_height).round(),
            SnapSpec::FromBottom(offset) => viewport_height + offset,
            SnapSpec::FromTop(offset) => offset,
        }
    }
}

impl From<f32> for SnapSpec {
    fn from(value: f32) -> Self {
        SnapSpec::from_value(value)
    }
}

/// Resolved absolute snap-point offsets, index 0 being the most-open
/// state.
///
/// Holds no history: a new `SnapPoints` is produced from scratch on
/// every normalization pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapPoints {
    points: SmallVec<[f32; 8]>,
}

impl SnapPoints {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The resolved offset at `index`, or `None` out of range.
    pub fn get(&self, index: usize) -> Option<f32> {
        self.points.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.points
    }
}

/// Returns true when every value is `<=` its predecessor.
pub fn in_descending_order(values: &[f32]) -> bool {
    values.windows(2).all(|pair| pair[0] >= pair[1])
}

/// Resolves raw snap specs against the current viewport height.
///
/// A viewport height of `0` means "not yet measured"; resolved values
/// are meaningless then, so the ordering check is skipped rather than
/// failed. At a known height a non-descending result is a caller
/// configuration bug: it is reported once per pass through the `log`
/// facade and the un-validated values are kept, since a mis-ordered
/// sheet is still better than a crashed application.
pub fn normalize(specs: &[SnapSpec], viewport_height: f32) -> SnapPoints {
    let points: SmallVec<[f32; 8]> = specs
        .iter()
        .map(|spec| spec.resolve(viewport_height))
        .collect();

    if viewport_height > 0.0 && !in_descending_order(&points) {
        log::error!(
            "snap points need to be in descending order, got: {:?}",
            points.as_slice()
        );
    }

    SnapPoints { points }
}
