//! Gesture session: the touch/mouse state machine
//!
//! A session starts in [`InputMode::Mouse`]. The first touchstart switches it
//! to [`InputMode::Touch`] for the rest of the gesture; in that mode the
//! compatibility mouse events some platforms fire after touches are swallowed.
//! Once every finger has lifted, the session returns to mouse mode when either
//! a mouseup arrives or the reset job comes due, whichever is first.
//!
//! # Ordering
//!
//! - touchstart: `down` then `over`
//! - touchmove: `move`, then `out` (old target) and `over` (new target) when the
//!   target changed
//! - touchend: `up` then `out`
//!
//! Only the finger that started the gesture drives `move`; other fingers are
//! ignored.

use std::rc::Rc;
use std::time::{Duration, Instant};

use kinetic_core::{JobQueue, NodeId, NodeTree, Point};
use kinetic_platform::{InputEvent, MouseEvent, PlatformProfile, TouchBatch, TouchPhase};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::notify::{GestureKind, GestureSink};
use crate::synthetic::{PointerId, SyntheticEvent};
use crate::target::TargetResolver;

fn default_reset_delay_ms() -> u64 {
    250
}

/// Gesture session configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Idle time after the last finger lifts before mouse handling is restored
    #[serde(default = "default_reset_delay_ms")]
    pub reset_delay_ms: u64,
    /// The application fills the viewport; tracked touch moves ask the host
    /// to suppress default scrolling
    #[serde(default)]
    pub fixed_viewport: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            reset_delay_ms: default_reset_delay_ms(),
            fixed_viewport: false,
        }
    }
}

impl GestureConfig {
    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}

/// Which handler set is active
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputMode {
    #[default]
    Mouse,
    Touch,
}

/// What the host should do with the raw event after the session saw it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventResponse {
    /// Notifications were emitted
    Handled,
    /// Notifications were emitted; suppress the platform's default action
    PreventDefault,
    /// Nothing was emitted for this event
    Ignored,
}

/// Per-gesture bookkeeping
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureState {
    /// Fingers currently down
    pub active_touch_count: usize,
    /// Pointer that started the gesture
    pub tracked_identifier: Option<PointerId>,
    /// Last event an `over` was emitted (or refreshed) for
    pub last_over: Option<SyntheticEvent>,
    /// Node hit testing skips (the node being dragged)
    pub excluded_target: Option<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum GestureJob {
    ResetMode,
}

/// Session-scoped gesture state machine
#[derive(Debug)]
pub struct GestureSession {
    mode: InputMode,
    state: GestureState,
    config: GestureConfig,
    resolver: TargetResolver,
    jobs: JobQueue<GestureJob>,
    drag_node: Option<NodeId>,
}

impl GestureSession {
    /// Create a session, picking the target strategy for `profile`
    pub fn new(config: GestureConfig, profile: &PlatformProfile) -> Self {
        Self::with_resolver(config, TargetResolver::for_platform(profile))
    }

    pub fn with_resolver(config: GestureConfig, resolver: TargetResolver) -> Self {
        Self {
            mode: InputMode::Mouse,
            state: GestureState::default(),
            config,
            resolver,
            jobs: JobQueue::new(),
            drag_node: None,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn resolver(&self) -> &TargetResolver {
        &self.resolver
    }

    /// Set (or clear) the node currently being dragged
    ///
    /// Hit testing skips it from the next move on, so drop targets under the
    /// dragged node can be found.
    pub fn set_drag_node(&mut self, node: Option<NodeId>) {
        self.drag_node = node;
    }

    pub fn drag_node(&self) -> Option<NodeId> {
        self.drag_node
    }

    pub fn is_reset_pending(&self) -> bool {
        self.jobs.is_pending(&GestureJob::ResetMode)
    }

    /// When the host should next call [`GestureSession::poll`]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.jobs.deadline(&GestureJob::ResetMode)
    }

    /// Feed one raw input event through the active mode
    ///
    /// Malformed events return an error and leave the session untouched.
    pub fn handle<T, S>(
        &mut self,
        event: &InputEvent,
        now: Instant,
        tree: &T,
        sink: &mut S,
    ) -> Result<EventResponse>
    where
        T: NodeTree + ?Sized,
        S: GestureSink + ?Sized,
    {
        match event {
            InputEvent::Touch(batch) => match (batch.phase, self.mode) {
                (TouchPhase::Start, mode) => {
                    batch.primary()?;
                    if mode == InputMode::Mouse {
                        tracing::debug!("GestureSession: entering touch mode");
                        self.mode = InputMode::Touch;
                    }
                    self.touch_start(batch, tree, sink)
                }
                (TouchPhase::Move, InputMode::Touch) => self.touch_move(batch, tree, sink),
                (TouchPhase::End | TouchPhase::Cancel, InputMode::Touch) => {
                    self.touch_end(batch, now, tree, sink)
                }
                (phase, InputMode::Mouse) => {
                    tracing::trace!("GestureSession: {:?} outside a touch gesture", phase);
                    Ok(EventResponse::Ignored)
                }
            },
            InputEvent::Mouse(mouse) => match self.mode {
                InputMode::Mouse => Ok(self.mouse(mouse, tree, sink)),
                InputMode::Touch => {
                    // compatibility events: only a mouseup means anything here
                    if let MouseEvent::ButtonReleased { .. } = mouse {
                        self.confirm_reset();
                    }
                    Ok(EventResponse::Ignored)
                }
            },
        }
    }

    /// Run due deferred jobs. Returns true if the session went back to mouse
    /// mode.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut reset = false;
        for job in self.jobs.take_due(now) {
            match job {
                GestureJob::ResetMode => reset |= self.confirm_reset(),
            }
        }
        reset
    }

    /// Return to mouse mode if no finger is down
    pub fn confirm_reset(&mut self) -> bool {
        if self.mode != InputMode::Touch || self.state.active_touch_count != 0 {
            return false;
        }
        tracing::debug!("GestureSession: restoring mouse mode");
        self.mode = InputMode::Mouse;
        self.state = GestureState::default();
        self.jobs.stop(&GestureJob::ResetMode);
        true
    }

    // =========================================================================
    // Touch mode
    // =========================================================================

    fn touch_start<T, S>(&mut self, batch: &TouchBatch, tree: &T, sink: &mut S) -> Result<EventResponse>
    where
        T: NodeTree + ?Sized,
        S: GestureSink + ?Sized,
    {
        let batch = Rc::new(batch.clone());
        self.jobs.stop(&GestureJob::ResetMode);
        self.state.active_touch_count += batch.changed_count();
        self.state.excluded_target = None;

        let event = self.make_touch_event(&batch, tree)?;
        self.state.tracked_identifier = Some(event.pointer);
        sink.emit(GestureKind::Down, &event);

        // over is a separate event object
        let mut event = self.make_touch_event(&batch, tree)?;
        if let Some(mut previous) = self.state.last_over.take() {
            // another finger already hovers something: close that over first
            previous.related_target = event.target;
            event.related_target = previous.target;
            sink.emit(GestureKind::Out, &previous);
        }
        sink.emit(GestureKind::Over, &event);
        self.state.last_over = Some(event);

        tracing::trace!(
            "GestureSession: touchstart, {} active",
            self.state.active_touch_count
        );
        Ok(EventResponse::Handled)
    }

    fn touch_move<T, S>(&mut self, batch: &TouchBatch, tree: &T, sink: &mut S) -> Result<EventResponse>
    where
        T: NodeTree + ?Sized,
        S: GestureSink + ?Sized,
    {
        let batch = Rc::new(batch.clone());
        batch.primary()?;
        self.jobs.stop(&GestureJob::ResetMode);
        self.state.excluded_target = self.drag_node;

        let event = self.make_touch_event(&batch, tree)?;
        if self.state.tracked_identifier != Some(event.pointer) {
            tracing::trace!("GestureSession: ignoring move from untracked {:?}", event.pointer);
            return Ok(EventResponse::Ignored);
        }

        sink.emit(GestureKind::Move, &event);
        self.track_over(event, sink);

        if self.config.fixed_viewport {
            Ok(EventResponse::PreventDefault)
        } else {
            Ok(EventResponse::Handled)
        }
    }

    fn touch_end<T, S>(
        &mut self,
        batch: &TouchBatch,
        now: Instant,
        tree: &T,
        sink: &mut S,
    ) -> Result<EventResponse>
    where
        T: NodeTree + ?Sized,
        S: GestureSink + ?Sized,
    {
        let batch = Rc::new(batch.clone());
        let event = self.make_touch_event(&batch, tree)?;
        sink.emit(GestureKind::Up, &event);

        // up must precede out: a lifted finger is not a drag-out
        if let Some(over) = self.state.last_over.take() {
            sink.emit(GestureKind::Out, &over);
        }

        let ended = batch.changed_count();
        if ended > self.state.active_touch_count {
            tracing::warn!(
                "GestureSession: {} touches ended but only {} were active",
                ended,
                self.state.active_touch_count
            );
        }
        self.state.active_touch_count = self.state.active_touch_count.saturating_sub(ended);

        if self.state.active_touch_count == 0 {
            self.jobs
                .start(GestureJob::ResetMode, self.config.reset_delay(), now);
        }

        tracing::trace!(
            "GestureSession: touchend, {} active",
            self.state.active_touch_count
        );
        Ok(EventResponse::Handled)
    }

    fn make_touch_event<T: NodeTree + ?Sized>(
        &self,
        batch: &Rc<TouchBatch>,
        tree: &T,
    ) -> Result<SyntheticEvent> {
        let point = batch.primary()?;
        let target = self.resolver.resolve(
            tree,
            point.client(),
            point.screen(),
            self.state.excluded_target,
        );
        Ok(SyntheticEvent::from_touch(point, Rc::clone(batch), target))
    }

    // =========================================================================
    // Mouse mode
    // =========================================================================

    fn mouse<T, S>(&mut self, mouse: &MouseEvent, tree: &T, sink: &mut S) -> EventResponse
    where
        T: NodeTree + ?Sized,
        S: GestureSink + ?Sized,
    {
        let (x, y) = match *mouse {
            MouseEvent::Left => {
                // pointer left the window
                return match self.state.last_over.take() {
                    Some(over) => {
                        sink.emit(GestureKind::Out, &over);
                        EventResponse::Handled
                    }
                    None => EventResponse::Ignored,
                };
            }
            MouseEvent::Moved { x, y }
            | MouseEvent::ButtonPressed { x, y, .. }
            | MouseEvent::ButtonReleased { x, y, .. } => (x, y),
        };

        let position = Point::new(x, y);
        let target = tree.element_from_point(position, self.drag_node);
        let event = SyntheticEvent::from_mouse(mouse, position, target);

        match mouse {
            MouseEvent::ButtonPressed { .. } => {
                self.state.tracked_identifier = Some(PointerId::Mouse);
                sink.emit(GestureKind::Down, &event);
            }
            MouseEvent::ButtonReleased { .. } => {
                self.state.tracked_identifier = None;
                sink.emit(GestureKind::Up, &event);
            }
            _ => sink.emit(GestureKind::Move, &event),
        }
        self.track_over(event, sink);
        EventResponse::Handled
    }

    // =========================================================================
    // Over / out
    // =========================================================================

    /// Emit out/over when the pointer crossed into a different target, with
    /// `related_target` cross-linked like native mouseover/mouseout
    fn track_over<S: GestureSink + ?Sized>(&mut self, mut event: SyntheticEvent, sink: &mut S) {
        match self.state.last_over.take() {
            Some(mut previous) if previous.target != event.target => {
                previous.related_target = event.target;
                event.related_target = previous.target;
                sink.emit(GestureKind::Out, &previous);
                sink.emit(GestureKind::Over, &event);
            }
            Some(_) => {}
            None => sink.emit(GestureKind::Over, &event),
        }
        self.state.last_over = Some(event);
    }
}
