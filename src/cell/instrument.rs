//! Optional diagnostic counters for listener bookkeeping.
//!
//! Nothing is recorded unless a hook is enabled. A leak-free UI returns
//! the effect and downstream counts to zero once every widget unmounts;
//! upstream listeners belong to long-lived zooms and may stay positive.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use spark_ui_core::cell::instrument::{self, Counters};
//!
//! let counters = Rc::new(Counters::default());
//! let disable = instrument::enable(counters.clone());
//! // ... mount and unmount widgets ...
//! assert!(counters.is_balanced());
//! disable();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::Uninstaller;

/// Which of a cell's three listener groups changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Effect,
    Upstream,
    Downstream,
}

/// Receives listener-count changes from every cell on this thread.
pub trait Instrument {
    fn listener_added(&self, kind: ListenerKind);
    fn listener_removed(&self, kind: ListenerKind);
}

/// Running totals per listener kind.
#[derive(Debug, Default)]
pub struct Counters {
    effects: Cell<i64>,
    upstream: Cell<i64>,
    downstream: Cell<i64>,
}

impl Counters {
    pub fn effects(&self) -> i64 {
        self.effects.get()
    }

    pub fn upstream(&self) -> i64 {
        self.upstream.get()
    }

    pub fn downstream(&self) -> i64 {
        self.downstream.get()
    }

    /// True when no effect or downstream listener is outstanding.
    pub fn is_balanced(&self) -> bool {
        self.effects.get() == 0 && self.downstream.get() == 0
    }

    fn slot(&self, kind: ListenerKind) -> &Cell<i64> {
        match kind {
            ListenerKind::Effect => &self.effects,
            ListenerKind::Upstream => &self.upstream,
            ListenerKind::Downstream => &self.downstream,
        }
    }
}

impl Instrument for Counters {
    fn listener_added(&self, kind: ListenerKind) {
        let slot = self.slot(kind);
        slot.set(slot.get() + 1);
    }

    fn listener_removed(&self, kind: ListenerKind) {
        let slot = self.slot(kind);
        slot.set(slot.get() - 1);
    }
}

thread_local! {
    static HOOK: RefCell<Option<Rc<dyn Instrument>>> = const { RefCell::new(None) };
}

/// Route listener bookkeeping on this thread to `hook`, replacing any
/// previous hook. The returned closure disables it again, unless another
/// hook has been enabled in the meantime.
pub fn enable(hook: Rc<dyn Instrument>) -> Uninstaller {
    let installed = hook.clone();
    HOOK.with(|h| *h.borrow_mut() = Some(hook));
    Box::new(move || {
        HOOK.with(|h| {
            let mut h = h.borrow_mut();
            if h.as_ref().is_some_and(|cur| Rc::ptr_eq(cur, &installed)) {
                *h = None;
            }
        });
    })
}

/// Stop recording.
pub fn disable() {
    HOOK.with(|h| *h.borrow_mut() = None);
}

/// Check if a hook is enabled on this thread.
pub fn is_enabled() -> bool {
    HOOK.with(|h| h.borrow().is_some())
}

pub(crate) fn record(kind: ListenerKind, added: bool) {
    let hook = HOOK.with(|h| h.borrow().clone());
    if let Some(hook) = hook {
        if added {
            hook.listener_added(kind);
        } else {
            hook.listener_removed(kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_by_default() {
        disable();
        assert!(!is_enabled());
        record(ListenerKind::Effect, true);
    }

    #[test]
    fn test_counts_and_disable() {
        let counters = Rc::new(Counters::default());
        let off = enable(counters.clone());
        assert!(is_enabled());

        record(ListenerKind::Effect, true);
        record(ListenerKind::Downstream, true);
        assert_eq!(counters.effects(), 1);
        assert!(!counters.is_balanced());

        record(ListenerKind::Effect, false);
        record(ListenerKind::Downstream, false);
        assert!(counters.is_balanced());

        off();
        assert!(!is_enabled());
        record(ListenerKind::Effect, true);
        assert_eq!(counters.effects(), 0);
    }

    #[test]
    fn test_stale_disable_keeps_newer_hook() {
        let first = Rc::new(Counters::default());
        let second = Rc::new(Counters::default());
        let off_first = enable(first);
        let off_second = enable(second.clone());

        off_first();
        assert!(is_enabled());
        record(ListenerKind::Upstream, true);
        assert_eq!(second.upstream(), 1);

        off_second();
        assert!(!is_enabled());
    }
}
