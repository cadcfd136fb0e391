//! Scheduler Module - Timers and animation frames driven by the host loop
//!
//! A per-thread virtual clock. Nothing runs on its own: the host advances
//! time with [`advance`] (or [`pump`], which measures real elapsed time) and
//! flushes frame callbacks with [`run_frame`]. Tests drive the clock by hand.
//!
//! # API
//!
//! - `set_timeout(delay, f)` / `clear_timeout(id)` - One-shot timers
//! - `request_frame(f)` / `cancel_frame(id)` - Next-frame callbacks
//! - `advance(d)` - Move the clock, firing due timers in order
//! - `run_frame()` - Run callbacks queued for this frame
//! - `pump()` - `advance` by wall-clock time, then `run_frame`
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use spark_ui_core::scheduler;
//!
//! scheduler::set_timeout(Duration::from_millis(100), || println!("later"));
//! scheduler::advance(Duration::from_millis(100)); // prints "later"
//! ```

use std::cell::RefCell;
use std::time::Duration;

use web_time::Instant;

// =============================================================================
// TYPES
// =============================================================================

/// Handle for a pending timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Handle for a pending frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

struct Timer {
    id: u64,
    due: Duration,
    callback: Box<dyn FnOnce()>,
}

struct Scheduler {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer>,
    frames: Vec<(u64, Box<dyn FnOnce()>)>,
    last_pump: Option<Instant>,
}

impl Scheduler {
    fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            timers: Vec::new(),
            frames: Vec::new(),
            last_pump: None,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Remove the earliest timer due at or before `limit`. Ties fire in
    /// scheduling order.
    fn take_due(&mut self, limit: Duration) -> Option<Timer> {
        let ix = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= limit)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(ix, _)| ix)?;
        Some(self.timers.remove(ix))
    }
}

thread_local! {
    static SCHEDULER: RefCell<Scheduler> = RefCell::new(Scheduler::new());
}

// =============================================================================
// TIMERS
// =============================================================================

/// Run `f` once, `delay` after the current virtual time.
pub fn set_timeout<F>(delay: Duration, f: F) -> TimerId
where
    F: FnOnce() + 'static,
{
    SCHEDULER.with(|s| {
        let mut s = s.borrow_mut();
        let id = s.next_id();
        let due = s.now + delay;
        s.timers.push(Timer {
            id,
            due,
            callback: Box::new(f),
        });
        TimerId(id)
    })
}

/// Drop a pending timer. Unknown or already fired ids are ignored.
pub fn clear_timeout(id: TimerId) {
    SCHEDULER.with(|s| s.borrow_mut().timers.retain(|t| t.id != id.0));
}

/// Move the clock forward by `d`, firing every timer that falls due on the
/// way. Timers scheduled by a firing timer run too if they fall inside the
/// window. Returns the number of timers fired.
pub fn advance(d: Duration) -> usize {
    let target = SCHEDULER.with(|s| s.borrow().now + d);
    let mut fired = 0;
    loop {
        let timer = SCHEDULER.with(|s| {
            let mut s = s.borrow_mut();
            let timer = s.take_due(target);
            if let Some(timer) = &timer {
                s.now = timer.due;
            }
            timer
        });
        match timer {
            Some(timer) => {
                (timer.callback)();
                fired += 1;
            }
            None => break,
        }
    }
    SCHEDULER.with(|s| s.borrow_mut().now = target);
    fired
}

/// Current virtual time since the scheduler was created or reset.
pub fn now() -> Duration {
    SCHEDULER.with(|s| s.borrow().now)
}

// =============================================================================
// FRAMES
// =============================================================================

/// Run `f` on the next [`run_frame`].
pub fn request_frame<F>(f: F) -> FrameId
where
    F: FnOnce() + 'static,
{
    SCHEDULER.with(|s| {
        let mut s = s.borrow_mut();
        let id = s.next_id();
        s.frames.push((id, Box::new(f)));
        FrameId(id)
    })
}

pub fn cancel_frame(id: FrameId) {
    SCHEDULER.with(|s| s.borrow_mut().frames.retain(|(fid, _)| *fid != id.0));
}

/// Run every frame callback queued so far. Callbacks requested while the
/// frame runs wait for the next one. Returns the number run.
pub fn run_frame() -> usize {
    let frames = SCHEDULER.with(|s| std::mem::take(&mut s.borrow_mut().frames));
    let count = frames.len();
    for (_, f) in frames {
        f();
    }
    count
}

// =============================================================================
// HOST LOOP
// =============================================================================

/// Advance by the wall-clock time since the previous pump, then run a frame.
/// The first call only starts the stopwatch.
pub fn pump() {
    let now = Instant::now();
    let elapsed = SCHEDULER.with(|s| {
        let mut s = s.borrow_mut();
        let elapsed = s.last_pump.map(|t| now.duration_since(t));
        s.last_pump = Some(now);
        elapsed
    });
    if let Some(elapsed) = elapsed {
        advance(elapsed);
    }
    run_frame();
}

/// Number of timers waiting to fire.
pub fn pending_timers() -> usize {
    SCHEDULER.with(|s| s.borrow().timers.len())
}

/// Number of callbacks waiting for the next frame.
pub fn pending_frames() -> usize {
    SCHEDULER.with(|s| s.borrow().frames.len())
}

/// Reset scheduler state (for testing)
pub fn reset_scheduler() {
    let old = SCHEDULER.with(|s| std::mem::replace(&mut *s.borrow_mut(), Scheduler::new()));
    // Callbacks may own cells whose drop touches the scheduler.
    drop(old);
}

// =============================================================================
// TESTS
// =============================================================================
