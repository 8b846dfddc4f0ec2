//! 1-D velocity estimation over the drag's offset samples.
//!
//! Feeds two consumers: the live velocity-sign indicator (a purely
//! visual cue on the drag handle) and the release resolution when the
//! host's end event does not carry its own velocity reading.
//! Velocities are in pixels per millisecond, the same unit the
//! resolver's fling threshold is expressed in.

/// Ring buffer size for offset samples.
const HISTORY_SIZE: usize = 16;

/// Only samples within the last 100ms contribute to the estimate.
const HORIZON_MS: i64 = 100;

/// A gap this long between samples means the pointer stopped moving;
/// older samples must not be allowed to fake a velocity.
const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Clone, Copy)]
struct Sample {
    time_ms: i64,
    offset: f32,
}

/// Velocity tracker over the sheet's vertical offset.
///
/// Samples are pushed on every drag move; [`velocity`](Self::velocity)
/// reads the secant across the recent-history window. Returns 0.0
/// whenever fewer than two usable samples exist, which doubles as the
/// "pointer stopped" answer.
#[derive(Clone, Default)]
pub struct VelocityTracker {
    samples: [Option<Sample>; HISTORY_SIZE],
    index: usize,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the sheet offset observed at `time_ms`.
    pub fn add_sample(&mut self, time_ms: i64, offset: f32) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample { time_ms, offset });
    }

    /// Current velocity estimate in pixels per millisecond.
    ///
    /// Positive means the sheet is moving toward closed (downward).
    pub fn velocity(&self) -> f32 {
        let newest = match self.samples[self.index] {
            Some(sample) => sample,
            None => return 0.0,
        };

        // Walk backwards to the oldest sample still inside the horizon
        // that is not separated from its successor by a stopped gap.
        let mut oldest = newest;
        let mut previous = newest;
        let mut cursor = self.index;
        for _ in 1..HISTORY_SIZE {
            cursor = if cursor == 0 { HISTORY_SIZE - 1 } else { cursor - 1 };
            let sample = match self.samples[cursor] {
                Some(sample) => sample,
                None => break,
            };
            if newest.time_ms - sample.time_ms > HORIZON_MS {
                break;
            }
            if previous.time_ms - sample.time_ms > ASSUME_STOPPED_MS {
                break;
            }
            oldest = sample;
            previous = sample;
        }

        let elapsed = newest.time_ms - oldest.time_ms;
        if elapsed <= 0 {
            return 0.0;
        }

        (newest.offset - oldest.offset) / elapsed as f32
    }

    /// Sign of the instantaneous velocity: `1` downward, `-1` upward,
    /// `0` when the pointer is effectively still.
    ///
    /// Reads the two newest samples only, so a direction reversal
    /// mid-drag flips the sign immediately instead of waiting for the
    /// averaging window to catch up.
    pub fn velocity_sign(&self) -> i8 {
        let newest = match self.samples[self.index] {
            Some(sample) => sample,
            None => return 0,
        };
        let previous_index = if self.index == 0 { HISTORY_SIZE - 1 } else { self.index - 1 };
        let previous = match self.samples[previous_index] {
            Some(sample) => sample,
            None => return 0,
        };

        if newest.offset > previous.offset {
            1
        } else if newest.offset < previous.offset {
            -1
        } else {
            0
        }
    }

    /// Clears all samples, ready for the next drag.
    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }
}
