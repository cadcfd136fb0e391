//! Bridges between cells and a component's mount/unmount lifecycle.

use std::cell::RefCell;
use std::rc::Rc;

use super::var::{Value, Var};
use super::Uninstaller;

/// Tracks a cell's value for a component that re-renders on change.
///
/// Subscribes on [`mount`](Binding::mount) and unsubscribes on
/// [`unmount`](Binding::unmount) or drop, so an unmounted component never
/// keeps an upstream chain alive.
pub struct Binding<A> {
    source: Value<A>,
    current: Rc<RefCell<A>>,
    off: RefCell<Option<Uninstaller>>,
}

impl<A: Clone + 'static> Binding<A> {
    pub fn new(source: impl Into<Value<A>>) -> Self {
        let source = source.into();
        let current = Rc::new(RefCell::new(source.get()));
        Self {
            source,
            current,
            off: RefCell::new(None),
        }
    }

    /// Start following the cell; `rerender` runs after every change with
    /// the new value. Mounting twice replaces the previous subscription.
    pub fn mount<F>(&self, rerender: F)
    where
        F: Fn(&A) + 'static,
    {
        self.unmount();
        *self.current.borrow_mut() = self.source.get();
        let current = self.current.clone();
        let off = self.source.effect(
            move |v, _| {
                *current.borrow_mut() = v.clone();
                rerender(v);
            },
            false,
        );
        *self.off.borrow_mut() = Some(off);
    }

    pub fn unmount(&self) {
        let off = self.off.borrow_mut().take();
        if let Some(off) = off {
            off();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.off.borrow().is_some()
    }

    /// Value as of the last mount or change.
    pub fn current(&self) -> A {
        self.current.borrow().clone()
    }

    pub fn source(&self) -> &Value<A> {
        &self.source
    }
}

impl<A> Drop for Binding<A> {
    fn drop(&mut self) {
        if let Some(off) = self.off.get_mut().take() {
            off();
        }
    }
}

/// State that a parent may own. Reads and writes go to the parent's cell
/// when one was given, otherwise to local state seeded with a default.
#[derive(Clone)]
pub struct Controlled<A> {
    cell: Var<A>,
    external: bool,
}

impl<A: Clone + PartialEq + 'static> Controlled<A> {
    pub fn new(external: Option<Var<A>>, default: A) -> Self {
        match external {
            Some(cell) => Self {
                cell,
                external: true,
            },
            None => Self {
                cell: Var::new(default),
                external: false,
            },
        }
    }

    pub fn get(&self) -> A {
        self.cell.get()
    }

    pub fn set(&self, value: A) {
        self.cell.set(value)
    }

    pub fn cell(&self) -> &Var<A> {
        &self.cell
    }

    /// Check if the state lives in a parent's cell.
    pub fn is_controlled(&self) -> bool {
        self.external
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::ListenerKind;
    use std::cell::Cell;

    #[test]
    fn test_mount_rerenders() {
        let v = Var::new(1);
        let binding = Binding::new(v.clone());
        let renders = Rc::new(Cell::new(0));
        let renders_clone = renders.clone();
        binding.mount(move |_| renders_clone.set(renders_clone.get() + 1));

        v.set(2);
        assert_eq!(renders.get(), 1);
        assert_eq!(binding.current(), 2);

        binding.unmount();
        v.set(3);
        assert_eq!(renders.get(), 1);
        assert_eq!(binding.current(), 2);
    }

    #[test]
    fn test_mount_resyncs_current() {
        let v = Var::new(1);
        let binding = Binding::new(v.clone());
        v.set(5);
        binding.mount(|_| {});
        assert_eq!(binding.current(), 5);
    }

    #[test]
    fn test_drop_releases_chain() {
        let v = Var::new(1);
        {
            let binding = Binding::new(v.map(|x| x + 1));
            binding.mount(|_| {});
            assert_eq!(v.listener_count(ListenerKind::Downstream), 1);
        }
        assert_eq!(v.listener_count(ListenerKind::Downstream), 0);
    }

    #[test]
    fn test_controlled() {
        let local: Controlled<i32> = Controlled::new(None, 3);
        assert!(!local.is_controlled());
        local.set(4);
        assert_eq!(local.get(), 4);

        let parent = Var::new(10);
        let controlled = Controlled::new(Some(parent.clone()), 3);
        controlled.set(11);
        assert_eq!(parent.get(), 11);
    }
}
