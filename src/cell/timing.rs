//! Time-windowed derived cells.
//!
//! Each is a plain stored cell fed by a lazy link to its source; the link
//! only defers the write through the [`scheduler`](crate::scheduler).

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use super::var::{Value, Var};
use crate::scheduler::{self, FrameId, TimerId};

struct Throttle<A> {
    waiting: bool,
    pending: Option<A>,
    timer: Option<TimerId>,
}

fn throttle_fire<A>(out: Var<A>, value: A, state: Rc<RefCell<Throttle<A>>>, window: Duration)
where
    A: Clone + PartialEq + 'static,
{
    out.set(value);
    let previous = {
        let mut s = state.borrow_mut();
        s.waiting = true;
        s.pending = None;
        s.timer.take()
    };
    if let Some(id) = previous {
        scheduler::clear_timeout(id);
    }

    let timer_state = state.clone();
    let id = scheduler::set_timeout(window, move || {
        let next = {
            let mut s = timer_state.borrow_mut();
            s.timer = None;
            let next = s.pending.take();
            if next.is_none() {
                s.waiting = false;
            }
            next
        };
        if let Some(next) = next {
            throttle_fire(out, next, timer_state, window);
        }
    });
    state.borrow_mut().timer = Some(id);
}

impl<A: Clone + PartialEq + 'static> Value<A> {
    /// Follows the source once it has been quiet for `wait`. Every change
    /// restarts the window; installation counts as a change.
    pub fn debounce(&self, wait: Duration) -> Value<A> {
        let out = Var::new(self.get());
        let timer: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));
        let _ = out.listen_to_value(
            self,
            move |out, v, _| {
                if let Some(id) = timer.take() {
                    scheduler::clear_timeout(id);
                }
                let out = out.clone();
                let v = v.clone();
                timer.set(Some(scheduler::set_timeout(wait, move || out.set(v))));
            },
            true,
        );
        out.read_only()
    }

    /// Follows the source at most once per `window`. A change arriving
    /// inside the window is held and delivered when the window closes,
    /// which opens a new window.
    pub fn throttle(&self, window: Duration) -> Value<A> {
        let out = Var::new(self.get());
        let state = Rc::new(RefCell::new(Throttle {
            waiting: false,
            pending: None,
            timer: None,
        }));
        let _ = out.listen_to_value(
            self,
            move |out, v, _| {
                let waiting = {
                    let mut s = state.borrow_mut();
                    if s.waiting {
                        s.pending = Some(v.clone());
                    }
                    s.waiting
                };
                if !waiting {
                    throttle_fire(out.clone(), v.clone(), state.clone(), window);
                }
            },
            false,
        );
        out.read_only()
    }

    /// Follows the source at most once per frame, with the latest value.
    pub fn batch(&self) -> Value<A> {
        let out = Var::new(self.get());
        let frame: Rc<Cell<Option<FrameId>>> = Rc::new(Cell::new(None));
        let _ = out.listen_to_value(
            self,
            move |out, v, _| {
                if let Some(id) = frame.take() {
                    scheduler::cancel_frame(id);
                }
                let out = out.clone();
                let v = v.clone();
                frame.set(Some(scheduler::request_frame(move || out.set(v))));
            },
            false,
        );
        out.read_only()
    }
}
