//! The sheet's drag lifecycle and open/close state machine.
//!
//! One [`SheetController`] exists per sheet instance. It consumes the
//! host input system's gesture stream (start, move deltas, release),
//! keeps the live offset clamped, and on release asks the resolver
//! where to settle. Everything observable from outside flows through
//! listener slots set explicitly on the controller; there are no
//! ambient callbacks.

use std::cell::RefCell;
use std::rc::Rc;

use snapsheet_geometry::{
    is_closed, normalize, resolve_with_velocity, validate_snap_to, Detent, SnapPoints, SnapSpec,
    CLOSE_TOLERANCE_PX, DRAG_VELOCITY_THRESHOLD,
};

use crate::scroll_lock::{ScrollLockCoordinator, ScrollOwnership};
use crate::velocity::VelocityTracker;

/// Where the sheet is in its open/close life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetLifecycle {
    #[default]
    Closed,
    Opening,
    Open,
    /// A release is being committed to its resolved target.
    Snapping,
    /// The last resolution decided "fully closed"; the host is
    /// expected to finish the transition via [`SheetController::set_open`].
    Closing,
}

/// Configuration inputs, fixed for the lifetime of a controller.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    /// Raw snap-point specs, most-open first. `None` means the sheet
    /// has a single implicit resting position at half its height.
    pub snap_specs: Option<Vec<SnapSpec>>,
    pub detent: Detent,
    /// Snap index the sheet rests at when opened.
    pub initial_snap_index: usize,
    /// Fling threshold handed to the resolver, px/ms.
    pub velocity_threshold: f32,
    pub drag_enabled: bool,
    /// Forwarded untouched to the rendering layer; resolution math
    /// never depends on it.
    pub reduced_motion: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            snap_specs: None,
            detent: Detent::FullHeight,
            initial_snap_index: 0,
            velocity_threshold: DRAG_VELOCITY_THRESHOLD,
            drag_enabled: true,
            reduced_motion: false,
        }
    }
}

impl SheetConfig {
    /// Snap points given as plain numbers, classified the way the
    /// public API always has: `(0, 1]` fractions, negative bottom
    /// offsets, other positives absolute.
    pub fn with_snap_values(mut self, values: &[f32]) -> Self {
        self.snap_specs = Some(values.iter().copied().map(SnapSpec::from_value).collect());
        self
    }

    pub fn with_snap_specs(mut self, specs: Vec<SnapSpec>) -> Self {
        self.snap_specs = Some(specs);
        self
    }

    pub fn with_detent(mut self, detent: Detent) -> Self {
        self.detent = detent;
        self
    }

    pub fn with_initial_snap_index(mut self, index: usize) -> Self {
        self.initial_snap_index = index;
        self
    }

    pub fn with_velocity_threshold(mut self, threshold: f32) -> Self {
        self.velocity_threshold = threshold;
        self
    }

    pub fn with_drag_enabled(mut self, enabled: bool) -> Self {
        self.drag_enabled = enabled;
        self
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }
}

/// Mutable gesture state, owned exclusively by the controller.
#[derive(Debug, Clone, Copy, Default)]
struct GestureState {
    /// Vertical offset: 0 = fully open, grows toward closed.
    offset: f32,
    snap_index: usize,
    dragging: bool,
    /// `1` moving toward closed, `-1` toward open, `0` at rest. A
    /// purely visual cue; never feeds resolution.
    velocity_sign: i8,
}

/// Listener slots, set explicitly instead of closed over ambiently.
#[derive(Default)]
struct Listeners {
    on_snap: Option<Box<dyn FnMut(usize)>>,
    on_close: Option<Box<dyn FnMut()>>,
    on_open_start: Option<Box<dyn FnMut()>>,
    on_open_end: Option<Box<dyn FnMut()>>,
    on_close_start: Option<Box<dyn FnMut()>>,
    on_close_end: Option<Box<dyn FnMut()>>,
    /// Fired when a drag begins so the host can blur a focused
    /// editable inside the sheet (ghost-caret workaround on touch
    /// devices). The controller never touches the host's focus state
    /// itself.
    on_blur_request: Option<Box<dyn FnMut()>>,
}

/// Drag gesture controller for one sheet instance.
pub struct SheetController {
    config: SheetConfig,
    snap_points: SnapPoints,
    viewport_height: f32,
    sheet_height: f32,
    gesture: GestureState,
    lifecycle: SheetLifecycle,
    tracker: VelocityTracker,
    scroll_lock: Option<Rc<RefCell<ScrollLockCoordinator>>>,
    listeners: Listeners,
}

impl SheetController {
    pub fn new(config: SheetConfig) -> Self {
        let mut controller = Self {
            gesture: GestureState {
                snap_index: config.initial_snap_index,
                ..GestureState::default()
            },
            config,
            snap_points: SnapPoints::default(),
            viewport_height: 0.0,
            sheet_height: 0.0,
            lifecycle: SheetLifecycle::Closed,
            tracker: VelocityTracker::new(),
            scroll_lock: None,
            listeners: Listeners::default(),
        };
        controller.renormalize();
        controller
    }

    // ---- measurement inputs -------------------------------------------------

    /// Updates the measured viewport height and recomputes the snap
    /// points against it. Height `0` means "not yet measured".
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height;
        self.renormalize();
    }

    /// Updates the sheet's rendered height.
    pub fn set_sheet_height(&mut self, height: f32) {
        self.sheet_height = height;
    }

    fn renormalize(&mut self) {
        self.snap_points = match &self.config.snap_specs {
            Some(specs) => normalize(specs, self.viewport_height),
            None => SnapPoints::default(),
        };
    }

    // ---- listener slots -----------------------------------------------------

    pub fn set_on_snap(&mut self, listener: impl FnMut(usize) + 'static) {
        self.listeners.on_snap = Some(Box::new(listener));
    }

    pub fn set_on_close(&mut self, listener: impl FnMut() + 'static) {
        self.listeners.on_close = Some(Box::new(listener));
    }

    pub fn set_on_open_start(&mut self, listener: impl FnMut() + 'static) {
        self.listeners.on_open_start = Some(Box::new(listener));
    }

    pub fn set_on_open_end(&mut self, listener: impl FnMut() + 'static) {
        self.listeners.on_open_end = Some(Box::new(listener));
    }

    pub fn set_on_close_start(&mut self, listener: impl FnMut() + 'static) {
        self.listeners.on_close_start = Some(Box::new(listener));
    }

    pub fn set_on_close_end(&mut self, listener: impl FnMut() + 'static) {
        self.listeners.on_close_end = Some(Box::new(listener));
    }

    pub fn set_on_blur_request(&mut self, listener: impl FnMut() + 'static) {
        self.listeners.on_blur_request = Some(Box::new(listener));
    }

    /// Shares a scroll handoff coordinator with the host input layer.
    /// The host feeds it touch samples; the controller consults it as
    /// a gate and keeps its snap-state flag in sync.
    pub fn attach_scroll_lock(&mut self, lock: Rc<RefCell<ScrollLockCoordinator>>) {
        lock.borrow_mut()
            .snap_index_changed(self.gesture.snap_index == 0);
        self.scroll_lock = Some(lock);
    }

    // ---- open/close lifecycle ----------------------------------------------

    /// Flips the sheet's open flag, walking `Opening -> Open` or
    /// `Closing -> Closed` and firing the lifecycle listeners. Also
    /// emits the synthetic snap notification: the initial snap index
    /// on open, the most-closed configured index on close.
    pub fn set_open(&mut self, open: bool) {
        if open == self.is_open() {
            return;
        }

        if open {
            self.lifecycle = SheetLifecycle::Opening;
            self.notify_open_start();

            // A misconfigured initial index clamps to the most-closed
            // configured state so observers never see an index outside
            // the snap-point set.
            let initial = self
                .config
                .initial_snap_index
                .min(self.snap_points.len().saturating_sub(1));
            self.gesture.snap_index = initial;
            self.gesture.offset = match self.snap_points.get(initial) {
                Some(point) => validate_snap_to(self.sheet_height - point, self.sheet_height),
                None => 0.0,
            };
            self.sync_scroll_lock();

            self.lifecycle = SheetLifecycle::Open;
            self.notify_open_end();

            if !self.snap_points.is_empty() {
                self.notify_snap(initial);
            }
        } else {
            self.lifecycle = SheetLifecycle::Closing;
            self.notify_close_start();

            self.gesture.offset = self.sheet_height;
            self.gesture.dragging = false;
            self.gesture.velocity_sign = 0;

            self.lifecycle = SheetLifecycle::Closed;
            self.notify_close_end();

            if !self.snap_points.is_empty() {
                self.notify_snap(self.snap_points.len() - 1);
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle != SheetLifecycle::Closed
    }

    // ---- gesture stream -----------------------------------------------------

    /// Begins a drag at `time_ms`. Requests a focus blur from the host
    /// and arms the velocity tracker.
    pub fn drag_start(&mut self, time_ms: i64) {
        if !self.config.drag_enabled || !self.is_open() || self.gesture.dragging {
            return;
        }
        self.gesture.dragging = true;
        self.tracker.reset();
        self.tracker.add_sample(time_ms, self.gesture.offset);
        self.notify_blur_request();
    }

    /// Applies one move sample. The offset can never go above the
    /// fully-open position; the velocity-sign indicator follows the
    /// sign of the instantaneous velocity and holds its value through
    /// zero readings. Samples are dropped while the inner scrollable
    /// region owns the gesture.
    pub fn drag_by(&mut self, delta_y: f32, time_ms: i64) {
        if !self.gesture.dragging || !self.sheet_owns_gesture() {
            return;
        }

        self.gesture.offset = (self.gesture.offset + delta_y).max(0.0);
        self.tracker.add_sample(time_ms, self.gesture.offset);
        match self.tracker.velocity_sign() {
            0 => {}
            sign => self.gesture.velocity_sign = sign,
        }
    }

    /// Ends the drag and commits the release resolution.
    ///
    /// `velocity_y` is the host's end-of-gesture velocity in px/ms;
    /// pass `None` to fall back to the tracker's own estimate.
    pub fn drag_end(&mut self, velocity_y: Option<f32>) {
        if !self.gesture.dragging {
            return;
        }
        let velocity = velocity_y.unwrap_or_else(|| self.tracker.velocity());

        self.gesture.dragging = false;
        self.lifecycle = SheetLifecycle::Snapping;

        let resolution = resolve_with_velocity(
            &self.snap_points,
            self.sheet_height,
            self.gesture.offset,
            self.config.detent,
            velocity,
            self.config.velocity_threshold,
        );

        self.gesture.offset = resolution.offset;
        self.gesture.velocity_sign = 0;

        if !self.snap_points.is_empty() {
            log::debug!(
                "drag end at velocity {velocity}: settling at {} (snap index {})",
                resolution.offset,
                resolution.source_index
            );
            self.gesture.snap_index = resolution.source_index;
            self.sync_scroll_lock();
            self.notify_snap(resolution.source_index);
        }

        if self.sheet_height > 0.0 && is_closed(resolution.offset, self.sheet_height) {
            self.lifecycle = SheetLifecycle::Closing;
            self.notify_close();
        } else {
            self.lifecycle = SheetLifecycle::Open;
        }
    }

    /// Abnormal end of the gesture stream (pointer lost). Identical to
    /// a release with zero velocity so the state machine can never be
    /// left stuck in `dragging`.
    pub fn gesture_cancelled(&mut self) {
        self.drag_end(Some(0.0));
    }

    /// Programmatic snap. An index outside the snap-point set is a
    /// silent no-op.
    pub fn snap_to(&mut self, index: usize) {
        let point = match self.snap_points.get(index) {
            Some(point) => point,
            None => return,
        };

        let target = validate_snap_to(self.sheet_height - point, self.sheet_height);
        self.gesture.offset = target;
        self.gesture.snap_index = index;
        self.sync_scroll_lock();
        self.notify_snap(index);

        if self.sheet_height > 0.0 && target >= self.sheet_height {
            self.lifecycle = SheetLifecycle::Closing;
            self.notify_close();
        }
    }

    // ---- outputs for the rendering collaborator -----------------------------

    /// Live vertical offset, 0 = fully open.
    pub fn offset(&self) -> f32 {
        self.gesture.offset
    }

    /// Snap index the sheet currently rests at (or last committed to).
    pub fn current_snap_index(&self) -> usize {
        self.gesture.snap_index
    }

    pub fn lifecycle(&self) -> SheetLifecycle {
        self.lifecycle
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.dragging
    }

    /// `1` moving toward closed, `-1` toward open, `0` at rest.
    pub fn velocity_sign(&self) -> i8 {
        self.gesture.velocity_sign
    }

    /// Whether the sheet should render at all: once the offset reaches
    /// the viewport height (within the close tolerance) there is
    /// nothing left on screen.
    pub fn is_visible(&self) -> bool {
        self.gesture.offset + CLOSE_TOLERANCE_PX < self.viewport_height
    }

    // ---- internals ----------------------------------------------------------

    fn sheet_owns_gesture(&self) -> bool {
        match &self.scroll_lock {
            Some(lock) => lock.borrow().ownership() == ScrollOwnership::Sheet,
            None => true,
        }
    }

    fn sync_scroll_lock(&mut self) {
        if let Some(lock) = &self.scroll_lock {
            lock.borrow_mut()
                .snap_index_changed(self.gesture.snap_index == 0);
        }
    }

    fn notify_snap(&mut self, index: usize) {
        if let Some(listener) = self.listeners.on_snap.as_mut() {
            listener(index);
        }
    }

    fn notify_close(&mut self) {
        if let Some(listener) = self.listeners.on_close.as_mut() {
            listener();
        }
    }

    fn notify_open_start(&mut self) {
        if let Some(listener) = self.listeners.on_open_start.as_mut() {
            listener();
        }
    }

    fn notify_open_end(&mut self) {
        if let Some(listener) = self.listeners.on_open_end.as_mut() {
            listener();
        }
    }

    fn notify_close_start(&mut self) {
        if let Some(listener) = self.listeners.on_close_start.as_mut() {
            listener();
        }
    }

    fn notify_close_end(&mut self) {
        if let Some(listener) = self.listeners.on_close_end.as_mut() {
            listener();
        }
    }

    fn notify_blur_request(&mut self) {
        if let Some(listener) = self.listeners.on_blur_request.as_mut() {
            listener();
        }
    }
}
