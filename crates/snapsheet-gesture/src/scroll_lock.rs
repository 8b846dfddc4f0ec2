//! Scroll handoff between the sheet and an inner scrollable region.
//!
//! Only meaningful when the sheet's most-open snap state exposes a
//! scrollable region. While that state is active the coordinator
//! watches each touch sample and decides who owns the gesture: the
//! content (which scrolls) or the sheet (which drags). At any other
//! snap state the content is disabled outright and the sheet owns
//! every sample.

use snapsheet_geometry::SCROLL_HANDOFF_THRESHOLD;

/// Who currently consumes touch motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOwnership {
    /// The inner region scrolls; drag samples are not forwarded to the
    /// sheet controller.
    Content,
    /// The sheet drags.
    Sheet,
}

/// Per-sample verdict handed back to the host input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollDecision {
    pub ownership: ScrollOwnership,
    /// The host must suppress the platform's default scroll handling
    /// for this sample (the moment the sheet takes the gesture over).
    pub suppress_default_scroll: bool,
}

/// Sample-by-sample gesture ownership state machine.
#[derive(Debug, Clone)]
pub struct ScrollLockCoordinator {
    ownership: ScrollOwnership,
    previous_touch_y: f32,
    at_topmost_snap: bool,
}

impl Default for ScrollLockCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollLockCoordinator {
    pub fn new() -> Self {
        Self {
            ownership: ScrollOwnership::Content,
            previous_touch_y: 0.0,
            at_topmost_snap: false,
        }
    }

    /// Current owner. Forced to the sheet away from the topmost snap
    /// state, where the inner region does not scroll at all.
    pub fn ownership(&self) -> ScrollOwnership {
        if self.at_topmost_snap {
            self.ownership
        } else {
            ScrollOwnership::Sheet
        }
    }

    /// Begins tracking a touch sequence at vertical position `y`.
    pub fn touch_start(&mut self, y: f32) {
        self.previous_touch_y = y;
    }

    /// Feeds one touch-move sample; `scroll_top` is the inner region's
    /// current scroll offset.
    ///
    /// At the topmost snap state: a downward finger movement past the
    /// threshold while the content sits at its scroll top cedes the
    /// gesture to the sheet and suppresses default scrolling for this
    /// sample. An upward movement past the threshold while the content
    /// still owns the gesture leaves ownership with the content; the
    /// branch is explicit because flipping it here is the classic bug.
    pub fn touch_move(&mut self, y: f32, scroll_top: f32) -> ScrollDecision {
        let movement = y - self.previous_touch_y;
        self.previous_touch_y = y;

        if !self.at_topmost_snap {
            return ScrollDecision {
                ownership: ScrollOwnership::Sheet,
                suppress_default_scroll: false,
            };
        }

        let mut suppress_default_scroll = false;
        if scroll_top == 0.0 && movement > SCROLL_HANDOFF_THRESHOLD {
            // Finger moving down with nothing left to scroll: the drag
            // takes over to collapse the sheet.
            self.ownership = ScrollOwnership::Sheet;
            suppress_default_scroll = true;
        } else if movement < -SCROLL_HANDOFF_THRESHOLD
            && self.ownership == ScrollOwnership::Content
        {
            // Finger moving up while the content scrolls: stays with
            // the content.
            self.ownership = ScrollOwnership::Content;
        }

        ScrollDecision {
            ownership: self.ownership,
            suppress_default_scroll,
        }
    }

    /// Called whenever the sheet commits to a snap index.
    ///
    /// Returns the gesture to the content and reports whether the host
    /// should reset the inner region's scroll offset (it should any
    /// time the sheet rests below the topmost state, where the region
    /// is not scrollable).
    pub fn snap_index_changed(&mut self, at_topmost_snap: bool) -> bool {
        self.at_topmost_snap = at_topmost_snap;
        self.ownership = ScrollOwnership::Content;
        !at_topmost_snap
    }
}
