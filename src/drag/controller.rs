//! The drag state machine.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::state::{resize_direction, DragKind, DragState, Stage, StageField};
use crate::cell::{Uninstaller, Value, Var};
use crate::constraint::{free, run, Constraint};
use crate::measure::Measure;
use crate::scheduler::{self, FrameId, TimerId};
use crate::state::{keyboard, pointer, selection, KeyboardEvent};
use crate::types::{any_direction, no_direction, Direction, Point, Rect};

// =============================================================================
// TYPES
// =============================================================================

/// Which rectangle of the target a session works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasureMode {
    #[default]
    Absolute,
    Relative,
}

pub type StateCallback = Rc<dyn Fn(&DragState)>;

/// Picks the constraint for the stage being resolved.
pub type ConstraintFn = Rc<dyn Fn(Stage) -> Constraint>;

/// Configuration for a [`DragController`].
#[derive(Clone, Default)]
pub struct DragProps {
    pub draggable: bool,
    pub resizable: bool,

    /// What is being dragged. Without a target, presses are ignored.
    pub target: Option<Rc<dyn Measure>>,
    pub mode: MeasureMode,
    /// Receives every resolved rectangle.
    pub geom: Option<Var<Rect>>,
    /// External session cell, shared with whoever renders the drag.
    pub state: Option<Var<Option<DragState>>>,

    /// Wait before cleanup after a drag that moved, or after a cancel.
    pub delay_out: Duration,
    /// Defaults to [`free`] at every stage.
    pub constraint: Option<ConstraintFn>,
    /// Resize edges under the hovering pointer.
    pub hover_dir: Option<Var<Direction>>,

    pub on_start: Option<StateCallback>,
    pub on_update: Option<StateCallback>,
    pub on_finish: Option<StateCallback>,
    pub on_cancel: Option<StateCallback>,
    pub on_done: Option<StateCallback>,
}

#[derive(Clone, Copy)]
enum Pending {
    Timer(TimerId),
    Frame(FrameId),
}

struct Inner {
    props: DragProps,
    state: Var<Option<DragState>>,
    busy: Value<bool>,
    /// Global listeners and selection suppression of the running session
    session: RefCell<Vec<Uninstaller>>,
    pending: Cell<Option<Pending>>,
}

impl Inner {
    fn release(&self) {
        let session = self.session.take();
        for uninstall in session {
            uninstall();
        }
    }

    fn cancel_pending(&self) {
        match self.pending.take() {
            Some(Pending::Timer(id)) => scheduler::clear_timeout(id),
            Some(Pending::Frame(id)) => scheduler::cancel_frame(id),
            None => {}
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.cancel_pending();
        self.release();
    }
}

/// Turns pointer and key input into a [`DragState`] and resolved geometry.
///
/// States run `Idle -> Start -> Update* -> Finish | Cancel -> Idle`. While a
/// session is live the controller listens to the whole surface through
/// [`pointer`] and [`keyboard`], so the drag survives the pointer leaving the
/// target, and text selection is suppressed.
///
/// Handles are cheap clones of one controller.
#[derive(Clone)]
pub struct DragController {
    inner: Rc<Inner>,
}

impl DragController {
    pub fn new(props: DragProps) -> Self {
        let state = props.state.clone().unwrap_or_else(|| Var::new(None));
        let busy = state.map(|s| s.is_some_and(|s| s.stage != Stage::Idle));
        Self {
            inner: Rc::new(Inner {
                props,
                state,
                busy,
                session: RefCell::new(Vec::new()),
                pending: Cell::new(None),
            }),
        }
    }

    /// The session cell. `None` until the first press.
    pub fn state(&self) -> Var<Option<DragState>> {
        self.inner.state.clone()
    }

    /// True from press until cleanup.
    pub fn busy(&self) -> Value<bool> {
        self.inner.busy.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.busy.get()
    }

    // -------------------------------------------------------------------------
    // Inputs
    // -------------------------------------------------------------------------

    /// Press on the target. Starts a resize when `p` is within the border
    /// band of a resizable target, otherwise a drag if the target is
    /// draggable. Returns true if a session started.
    pub fn pointer_down(&self, p: Point) -> bool {
        let props = &self.inner.props;
        if !props.draggable && !props.resizable {
            return false;
        }
        let Some((start, abs)) = self.measure() else {
            return false;
        };

        let dir = if props.resizable {
            resize_direction(p, &abs)
        } else {
            Direction::empty()
        };
        if !props.draggable && no_direction(dir) {
            return false;
        }

        let kind = if props.resizable && any_direction(dir) {
            DragKind::Resize
        } else {
            DragKind::Drag
        };
        self.begin(DragState::begin(start, p, dir, kind))
    }

    /// Press on the target's background. The session is anchored at the
    /// target's centroid, and the first move to `p` is applied at once.
    pub fn background_down(&self, p: Point) -> bool {
        if !self.inner.props.draggable {
            return false;
        }
        let Some((start, abs)) = self.measure() else {
            return false;
        };

        let started = self.begin(DragState::begin(start, abs.centroid(), Direction::empty(), DragKind::Drag));
        if started {
            self.pointer_move(p);
        }
        started
    }

    pub fn pointer_move(&self, p: Point) {
        let Some(st) = self.tracking() else {
            return;
        };
        let updated = self.update(st.with_stage(Stage::Update), p);
        self.inner.state.set(Some(updated));
        self.emit(&self.inner.props.on_update, &updated);
    }

    pub fn pointer_up(&self, p: Point) {
        let Some(st) = self.tracking() else {
            return;
        };
        let updated = self.update(st.with_stage(Stage::Finish), p);
        tracing::debug!(place = ?updated.place, delta = ?updated.delta, "drag finished");
        self.inner.state.set(Some(updated));
        self.emit(&self.inner.props.on_update, &updated);
        self.emit(&self.inner.props.on_finish, &updated);

        if updated.delta == Point::ZERO {
            self.defer_to_frame();
        } else {
            self.defer(self.inner.props.delay_out);
        }
    }

    /// Escape snaps the target back to where it started.
    pub fn key_down(&self, event: &KeyboardEvent) {
        if event.code != "Escape" {
            return;
        }
        let Some(st) = self.tracking() else {
            return;
        };
        let updated = self.update(st.with_stage(Stage::Cancel), st.origin);
        tracing::debug!(place = ?updated.place, "drag cancelled");
        self.inner.state.set(Some(updated));
        self.emit(&self.inner.props.on_update, &updated);
        self.emit(&self.inner.props.on_cancel, &updated);

        event.prevent_default();
        self.defer(self.inner.props.delay_out);
    }

    /// Pointer hovering over the target: publish the resize edges under it.
    pub fn hover(&self, p: Point) {
        let props = &self.inner.props;
        let Some(hover_dir) = &props.hover_dir else {
            return;
        };
        if !props.resizable {
            return;
        }
        let Some(target) = &props.target else {
            return;
        };
        match target.absolute() {
            Ok(abs) => hover_dir.set(resize_direction(p, &abs)),
            Err(err) => tracing::warn!(%err, "cannot measure drag target"),
        }
    }

    pub fn hover_out(&self) {
        if let Some(hover_dir) = &self.inner.props.hover_dir {
            hover_dir.set(Direction::empty());
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// `(start, absolute)` rectangles of the target.
    fn measure(&self) -> Option<(Rect, Rect)> {
        let props = &self.inner.props;
        let target = props.target.as_ref()?;
        let measured = target.absolute().and_then(|abs| {
            let start = match props.mode {
                MeasureMode::Absolute => abs,
                MeasureMode::Relative => target.relative()?,
            };
            Ok((start, abs))
        });
        match measured {
            Ok(rects) => Some(rects),
            Err(err) => {
                tracing::warn!(%err, "cannot measure drag target");
                None
            }
        }
    }

    /// Current session, if it is still following the pointer.
    fn tracking(&self) -> Option<DragState> {
        self.inner.state.get().filter(|st| st.stage.is_tracking())
    }

    fn begin(&self, initial: DragState) -> bool {
        if self.tracking().is_some() {
            return false;
        }
        // A session still waiting for cleanup is finished off first
        if self.inner.pending.get().is_some() {
            self.inner.cancel_pending();
            self.done();
        }

        tracing::debug!(kind = ?initial.kind, dir = ?initial.dir, start = ?initial.start, "drag started");
        self.inner.state.set(Some(initial));
        self.emit(&self.inner.props.on_start, &initial);
        self.engage();
        true
    }

    /// Listen to the whole surface for the rest of the session.
    fn engage(&self) {
        let weak = Rc::downgrade(&self.inner);
        let on_move = {
            let weak = weak.clone();
            pointer::on_move(move |e| {
                with_controller(&weak, |c| c.pointer_move(e.point()));
                false
            })
        };
        let on_up = {
            let weak = weak.clone();
            pointer::on_up(move |e| {
                with_controller(&weak, |c| c.pointer_up(e.point()));
                false
            })
        };
        let on_key = keyboard::on(move |e| {
            with_controller(&weak, |c| c.key_down(e));
            false
        });

        let mut session = self.inner.session.borrow_mut();
        session.push(Box::new(on_move));
        session.push(Box::new(on_up));
        session.push(Box::new(on_key));
        session.push(Box::new(selection::suppress()));
    }

    fn update(&self, st: DragState, p: Point) -> DragState {
        let props = &self.inner.props;
        let con = props
            .constraint
            .as_ref()
            .map_or_else(free, |pick| pick(st.stage));
        let d = p - st.origin;
        let start = st.start;

        let place = match st.kind {
            DragKind::Drag => run(&con, &start, &start.moved(d), st.dir),
            DragKind::Resize if any_direction(st.dir) => {
                let dir = st.dir;
                let to = Rect::new(
                    if dir.left() { start.right.min(start.left + d.x) } else { start.left },
                    if dir.top() { start.bottom.min(start.top + d.y) } else { start.top },
                    if dir.right() { start.left.max(start.right + d.x) } else { start.right },
                    if dir.bottom() { start.top.max(start.bottom + d.y) } else { start.bottom },
                );
                run(&con, &start, &to, dir)
            }
            DragKind::Resize => st.place,
        };

        if let Some(geom) = &props.geom {
            geom.set(place);
        }
        DragState { delta: d, place, ..st }
    }

    fn defer(&self, delay: Duration) {
        let weak = Rc::downgrade(&self.inner);
        let id = scheduler::set_timeout(delay, move || {
            with_controller(&weak, |c| {
                c.inner.pending.set(None);
                c.done();
            })
        });
        self.inner.pending.set(Some(Pending::Timer(id)));
    }

    fn defer_to_frame(&self) {
        let weak = Rc::downgrade(&self.inner);
        let id = scheduler::request_frame(move || {
            with_controller(&weak, |c| {
                c.inner.pending.set(None);
                c.done();
            })
        });
        self.inner.pending.set(Some(Pending::Frame(id)));
    }

    fn done(&self) {
        if let Some(st) = self.inner.state.total() {
            st.prop(StageField).set(Stage::Idle);
        }
        self.inner.release();
        tracing::debug!("drag done");

        if let Some(st) = self.inner.state.get() {
            self.emit(&self.inner.props.on_done, &st);
        }
    }

    fn emit(&self, cb: &Option<StateCallback>, st: &DragState) {
        if let Some(cb) = cb {
            cb(st);
        }
    }
}

fn with_controller(weak: &Weak<Inner>, f: impl FnOnce(&DragController)) {
    if let Some(inner) = weak.upgrade() {
        f(&DragController { inner });
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{grid, inside};
    use crate::measure::FixedMeasure;
    use crate::state::pointer::PointerButton;
    use crate::state::PointerEvent;
    use crate::types::{pt, range};

    fn setup() {
        pointer::reset_pointer_state();
        keyboard::reset_keyboard_state();
        selection::reset_selection_state();
        scheduler::reset_scheduler();
    }

    fn target() -> Rect {
        Rect::new(100.0, 100.0, 200.0, 150.0)
    }

    fn props() -> DragProps {
        DragProps {
            draggable: true,
            target: Some(Rc::new(FixedMeasure(target()))),
            ..Default::default()
        }
    }

    fn stage(c: &DragController) -> Option<Stage> {
        c.state().get().map(|s| s.stage)
    }

    #[test]
    fn test_press_without_capability_is_ignored() {
        setup();
        let c = DragController::new(DragProps {
            draggable: false,
            ..props()
        });
        assert!(!c.pointer_down(pt(150.0, 125.0)));
        assert_eq!(stage(&c), None);

        let no_target = DragController::new(DragProps {
            target: None,
            ..props()
        });
        assert!(!no_target.pointer_down(pt(150.0, 125.0)));
    }

    #[test]
    fn test_drag_moves_from_origin() {
        setup();
        let geom = Var::new(target());
        let c = DragController::new(DragProps {
            geom: Some(geom.clone()),
            ..props()
        });

        assert!(c.pointer_down(pt(150.0, 125.0)));
        assert_eq!(stage(&c), Some(Stage::Start));
        assert!(c.is_busy());
        assert!(selection::is_suppressed());

        c.pointer_move(pt(160.0, 125.0));
        c.pointer_move(pt(170.0, 135.0));
        let st = c.state().get().unwrap();
        assert_eq!(st.stage, Stage::Update);
        assert_eq!(st.delta, pt(20.0, 10.0));
        assert_eq!(geom.get(), Rect::new(120.0, 110.0, 220.0, 160.0));
    }

    #[test]
    fn test_resize_from_right_edge() {
        setup();
        let c = DragController::new(DragProps {
            draggable: false,
            resizable: true,
            ..props()
        });

        // Middle of the target is not a resize handle
        assert!(!c.pointer_down(pt(150.0, 125.0)));

        assert!(c.pointer_down(pt(195.0, 125.0)));
        let st = c.state().get().unwrap();
        assert_eq!(st.kind, DragKind::Resize);
        assert_eq!(st.dir, Direction::RIGHT);

        c.pointer_move(pt(225.0, 140.0));
        assert_eq!(c.state().get().unwrap().place, Rect::new(100.0, 100.0, 230.0, 150.0));

        // The dragged edge cannot cross the anchored one
        c.pointer_move(pt(0.0, 125.0));
        assert_eq!(c.state().get().unwrap().place, Rect::new(100.0, 100.0, 100.0, 150.0));
    }

    #[test]
    fn test_constraint_chosen_per_stage() {
        setup();
        let area = Rect::new(0.0, 0.0, 300.0, 300.0);
        let c = DragController::new(DragProps {
            constraint: Some(Rc::new(move |s| match s {
                Stage::Finish => grid(50.0),
                _ => inside(area),
            })),
            ..props()
        });

        c.pointer_down(pt(150.0, 125.0));
        c.pointer_move(pt(400.0, 125.0));
        assert_eq!(c.state().get().unwrap().place, Rect::new(200.0, 100.0, 300.0, 150.0));

        c.pointer_up(pt(162.0, 125.0));
        assert_eq!(c.state().get().unwrap().place, Rect::new(100.0, 100.0, 200.0, 150.0));
    }

    #[test]
    fn test_global_handlers_follow_session() {
        setup();
        let c = DragController::new(props());
        c.pointer_down(pt(150.0, 125.0));

        pointer::dispatch(PointerEvent::move_to(155.0, 130.0));
        assert_eq!(c.state().get().unwrap().delta, pt(5.0, 5.0));

        pointer::dispatch(PointerEvent::up(PointerButton::Left, 155.0, 130.0));
        assert_eq!(stage(&c), Some(Stage::Finish));

        // Moves after release are ignored
        pointer::dispatch(PointerEvent::move_to(190.0, 190.0));
        assert_eq!(c.state().get().unwrap().delta, pt(5.0, 5.0));

        scheduler::advance(Duration::ZERO);
        assert_eq!(stage(&c), Some(Stage::Idle));
        assert!(!c.is_busy());
        assert!(!selection::is_suppressed());
        assert_eq!(pointer::handler_count(pointer::PointerAction::Move), 0);
        assert_eq!(keyboard::handler_count(), 0);
    }

    #[test]
    fn test_click_without_motion_cleans_up_next_frame() {
        setup();
        let done = Rc::new(Cell::new(0));
        let d = done.clone();
        let c = DragController::new(DragProps {
            delay_out: Duration::from_millis(300),
            on_done: Some(Rc::new(move |_| d.set(d.get() + 1))),
            ..props()
        });

        c.pointer_down(pt(150.0, 125.0));
        c.pointer_up(pt(150.0, 125.0));
        assert_eq!(scheduler::pending_timers(), 0);
        assert_eq!(scheduler::pending_frames(), 1);

        scheduler::run_frame();
        assert_eq!(done.get(), 1);
        assert_eq!(stage(&c), Some(Stage::Idle));
    }

    #[test]
    fn test_escape_cancels_and_prevents_default() {
        setup();
        let geom = Var::new(target());
        let c = DragController::new(DragProps {
            geom: Some(geom.clone()),
            ..props()
        });

        c.pointer_down(pt(150.0, 125.0));
        c.pointer_move(pt(180.0, 125.0));

        let other = KeyboardEvent::new("a");
        c.key_down(&other);
        assert_eq!(stage(&c), Some(Stage::Update));
        assert!(!other.default_prevented());

        let esc = KeyboardEvent::new("Escape");
        c.key_down(&esc);
        assert!(esc.default_prevented());
        assert_eq!(stage(&c), Some(Stage::Cancel));
        assert_eq!(geom.get(), target());

        scheduler::advance(Duration::ZERO);
        assert_eq!(stage(&c), Some(Stage::Idle));
    }

    #[test]
    fn test_background_press_applies_first_move() {
        setup();
        let c = DragController::new(props());
        assert!(c.background_down(pt(160.0, 125.0)));

        let st = c.state().get().unwrap();
        assert_eq!(st.origin, pt(150.0, 125.0));
        assert_eq!(st.stage, Stage::Update);
        assert_eq!(st.place, Rect::new(110.0, 100.0, 210.0, 150.0));
    }

    #[test]
    fn test_hover_direction() {
        setup();
        let hover_dir = Var::new(Direction::empty());
        let c = DragController::new(DragProps {
            resizable: true,
            hover_dir: Some(hover_dir.clone()),
            ..props()
        });

        c.hover(pt(105.0, 145.0));
        assert_eq!(hover_dir.get(), Direction::LEFT | Direction::BOTTOM);
        c.hover_out();
        assert_eq!(hover_dir.get(), Direction::empty());
    }

    #[test]
    fn test_new_press_finishes_pending_session() {
        setup();
        let done = Rc::new(Cell::new(0));
        let d = done.clone();
        let c = DragController::new(DragProps {
            delay_out: Duration::from_millis(500),
            on_done: Some(Rc::new(move |_| d.set(d.get() + 1))),
            ..props()
        });

        c.pointer_down(pt(150.0, 125.0));
        c.pointer_up(pt(160.0, 125.0));
        assert_eq!(done.get(), 0);

        assert!(c.pointer_down(pt(150.0, 125.0)));
        assert_eq!(done.get(), 1);
        assert_eq!(stage(&c), Some(Stage::Start));
        assert_eq!(scheduler::pending_timers(), 0);

        // Only the new session's listeners remain
        assert_eq!(pointer::handler_count(pointer::PointerAction::Up), 1);
    }

    #[test]
    fn test_relative_mode_and_range_constraint() {
        setup();
        struct Nested;
        impl Measure for Nested {
            fn absolute(&self) -> Result<Rect, crate::measure::MeasureError> {
                Ok(Rect::new(100.0, 100.0, 200.0, 150.0))
            }
            fn relative(&self) -> Result<Rect, crate::measure::MeasureError> {
                Ok(Rect::new(10.0, 10.0, 110.0, 60.0))
            }
        }
        let c = DragController::new(DragProps {
            target: Some(Rc::new(Nested)),
            mode: MeasureMode::Relative,
            constraint: Some(Rc::new(|_| crate::constraint::bounded(range(0.0, 1000.0), range(0.0, 1000.0)))),
            ..props()
        });

        c.pointer_down(pt(150.0, 125.0));
        c.pointer_move(pt(155.0, 125.0));
        assert_eq!(c.state().get().unwrap().place, Rect::new(15.0, 10.0, 115.0, 60.0));
    }
}
