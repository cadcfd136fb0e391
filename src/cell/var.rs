//! `Value<A>` (read-only) and `Var<A>` (read-write) cell handles.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use super::instrument::ListenerKind;
use super::node::{Equality, Installer, Node};
use super::Uninstaller;
use crate::lens::{Iso, Lens, WithField};

fn partial_eq<A: PartialEq>() -> Equality<A> {
    Rc::new(|a: &A, b: &A| a == b)
}

// =============================================================================
// Value
// =============================================================================

/// A read-only observable cell.
///
/// Cloning a `Value` creates a new handle to the **same** cell.
pub struct Value<A> {
    pub(crate) node: Rc<Node<A>>,
}

impl<A> Clone for Value<A> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
        }
    }
}

impl<A: Clone + fmt::Debug + 'static> fmt::Debug for Value<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&self.get()).finish()
    }
}

impl<A: Clone + 'static> Value<A> {
    pub(crate) fn from_node(node: Rc<Node<A>>) -> Self {
        Self { node }
    }

    /// A cell that never changes.
    pub fn constant(value: A) -> Self
    where
        A: PartialEq,
    {
        Self::from_node(Node::stored(value, partial_eq()))
    }

    /// Current value. Derived cells compute it from upstream on every call.
    pub fn get(&self) -> A {
        self.node.get()
    }

    /// Register a durable side effect. The first effect (or downstream
    /// listener) installs this cell's upstream links. With `run`, `cb` is
    /// invoked once right away with `(current, None)`.
    ///
    /// Returns the uninstaller.
    pub fn effect<F>(&self, cb: F, run: bool) -> Uninstaller
    where
        F: Fn(&A, Option<&A>) + 'static,
    {
        let cb: Rc<dyn Fn(&A, Option<&A>)> = Rc::new(cb);
        let uninstall = self.node.listen(ListenerKind::Effect, cb.clone());
        if run {
            cb(&self.get(), None);
        }
        uninstall
    }

    /// An empty effect, which keeps the upstream chain installed.
    pub fn keep_alive(&self) -> Uninstaller {
        self.effect(|_, _| {}, false)
    }

    /// Observe changes as a downstream node would. Installs upstream links
    /// like [`Value::effect`], but never runs immediately.
    pub fn listen_down<F>(&self, cb: F) -> Uninstaller
    where
        F: Fn(&A, Option<&A>) + 'static,
    {
        self.node.listen(ListenerKind::Downstream, Rc::new(cb))
    }

    /// Number of live listeners of one kind.
    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.node.listener_count(kind)
    }

    /// Check if this cell currently holds live subscriptions upstream.
    pub fn is_installed(&self) -> bool {
        self.node.is_installed()
    }

    /// Tear down this cell's upstream links for good.
    pub fn dispose(&self) {
        self.node.dispose()
    }

    /// Check if both handles point at the same cell.
    pub fn ptr_eq(&self, other: &Value<A>) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    // -------------------------------------------------------------------------
    // Derived cells
    // -------------------------------------------------------------------------

    /// Derived read-only cell. Reads are always `f(self.get())`, subscribed
    /// or not.
    pub fn map<B, F>(&self, f: F) -> Value<B>
    where
        B: Clone + PartialEq + 'static,
        F: Fn(&A) -> B + 'static,
    {
        self.map_with_previous(move |a, _| f(a))
    }

    /// Like [`Value::map`], but `f` also sees the previous source value when
    /// reacting to a change (`None` for plain reads).
    pub fn map_with_previous<B, F>(&self, f: F) -> Value<B>
    where
        B: Clone + PartialEq + 'static,
        F: Fn(&A, Option<&A>) -> B + 'static,
    {
        let f = Rc::new(f);
        let source = self.clone();
        let read = f.clone();
        let node = Node::computed(f(&self.get(), None), partial_eq(), move || {
            read(&source.get(), None)
        });
        let _ = node.follow(&self.node, false, move |b, v, o| b.set(f(v, o)));
        Value::from_node(node)
    }

    /// Monadic flat-map: follows whichever inner cell `f` picks for the
    /// current source value. Exactly one inner subscription is live while
    /// this cell is installed.
    pub fn bind<B, F>(&self, f: F) -> Value<B>
    where
        B: Clone + PartialEq + 'static,
        F: Fn(&A, Option<&A>) -> Value<B> + 'static,
    {
        let f = Rc::new(f);
        let source = self.clone();
        let read = f.clone();
        let node = Node::computed(f(&self.get(), None).get(), partial_eq(), move || {
            read(&source.get(), None).get()
        });

        let weak = Rc::downgrade(&node);
        let source = self.clone();
        let installer: Installer = Rc::new(move || {
            let Some(node) = weak.upgrade() else {
                return Box::new(|| {}) as Uninstaller;
            };
            let inner_off = Rc::new(std::cell::RefCell::new(None::<Uninstaller>));

            let attach = {
                let inner_off = inner_off.clone();
                let node = node.clone();
                Rc::new(move |inner: Value<B>| {
                    let target = node.clone();
                    let off = inner.listen_down(move |w, _| target.set(w.clone()));
                    *inner_off.borrow_mut() = Some(off);
                })
            };
            let detach = {
                let inner_off = inner_off.clone();
                Rc::new(move || {
                    let off = inner_off.borrow_mut().take();
                    if let Some(off) = off {
                        off();
                    }
                })
            };

            attach(f(&source.get(), None));

            let outer_off = {
                let f = f.clone();
                let attach = attach.clone();
                let detach = detach.clone();
                source.listen_down(move |v, o| {
                    detach();
                    let inner = f(v, o);
                    let current = inner.get();
                    attach(inner);
                    node.set(current);
                })
            };

            Box::new(move || {
                outer_off();
                detach();
            }) as Uninstaller
        });
        let _ = node.listen_to(installer);
        Value::from_node(node)
    }

    /// A boolean cell tracking `self == a` under `eq`.
    pub fn equals(&self, a: A) -> Value<bool>
    where
        A: PartialEq,
    {
        self.map(move |b| *b == a)
    }
}

impl<T: Clone + 'static> Value<Option<T>> {
    /// [`Value::map`] over the present case; `None` stays `None`.
    pub fn map_maybe<B, F>(&self, f: F) -> Value<Option<B>>
    where
        B: Clone + PartialEq + 'static,
        F: Fn(&T) -> Option<B> + 'static,
    {
        self.map(move |a| a.as_ref().and_then(&f))
    }
}

/// Combine two cells with `f`.
pub fn lift2<A, B, Z, F>(a: &Value<A>, b: &Value<B>, f: F) -> Value<Z>
where
    A: Clone + PartialEq + 'static,
    B: Clone + PartialEq + 'static,
    Z: Clone + PartialEq + 'static,
    F: Fn(&A, &B) -> Z + 'static,
{
    Var::pack((a.clone(), b.clone()), false)
        .read_only()
        .map(move |(a, b)| f(a, b))
}

/// Combine three cells with `f`.
pub fn lift3<A, B, C, Z, F>(a: &Value<A>, b: &Value<B>, c: &Value<C>, f: F) -> Value<Z>
where
    A: Clone + PartialEq + 'static,
    B: Clone + PartialEq + 'static,
    C: Clone + PartialEq + 'static,
    Z: Clone + PartialEq + 'static,
    F: Fn(&A, &B, &C) -> Z + 'static,
{
    Var::pack((a.clone(), b.clone(), c.clone()), false)
        .read_only()
        .map(move |(a, b, c)| f(a, b, c))
}

/// Combine four cells with `f`.
pub fn lift4<A, B, C, D, Z, F>(a: &Value<A>, b: &Value<B>, c: &Value<C>, d: &Value<D>, f: F) -> Value<Z>
where
    A: Clone + PartialEq + 'static,
    B: Clone + PartialEq + 'static,
    C: Clone + PartialEq + 'static,
    D: Clone + PartialEq + 'static,
    Z: Clone + PartialEq + 'static,
    F: Fn(&A, &B, &C, &D) -> Z + 'static,
{
    Var::pack((a.clone(), b.clone(), c.clone(), d.clone()), false)
        .read_only()
        .map(move |(a, b, c, d)| f(a, b, c, d))
}

// =============================================================================
// Var
// =============================================================================

/// A read-write observable cell.
///
/// Dereferences to [`Value`] for every read and subscribe operation.
/// Cloning a `Var` creates a new handle to the **same** cell.
pub struct Var<A> {
    value: Value<A>,
}

impl<A> Clone for Var<A> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
        }
    }
}

impl<A> Deref for Var<A> {
    type Target = Value<A>;

    fn deref(&self) -> &Value<A> {
        &self.value
    }
}

impl<A> From<Var<A>> for Value<A> {
    fn from(var: Var<A>) -> Self {
        var.value
    }
}

impl<A: Clone + fmt::Debug + 'static> fmt::Debug for Var<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Var").field(&self.get()).finish()
    }
}

impl<A: Clone + PartialEq + 'static> Var<A> {
    /// A new source cell using `PartialEq` to detect no-op writes.
    pub fn new(value: A) -> Self {
        Self::with_equality(value, |a: &A, b: &A| a == b)
    }
}

impl<A: Clone + Default + PartialEq + 'static> Default for Var<A> {
    fn default() -> Self {
        Self::new(A::default())
    }
}

impl<A: Clone + 'static> Var<A> {
    /// A new source cell with a custom no-op test.
    pub fn with_equality<E>(value: A, equality: E) -> Self
    where
        E: Fn(&A, &A) -> bool + 'static,
    {
        Self::from_node(Node::stored(value, Rc::new(equality)))
    }

    pub(crate) fn from_node(node: Rc<Node<A>>) -> Self {
        Self {
            value: Value::from_node(node),
        }
    }

    /// Read-only view of the same cell.
    pub fn read_only(&self) -> Value<A> {
        self.value.clone()
    }

    /// Replace the value and notify upstream, downstream, then effect
    /// listeners. Dropped if equal to the current value, or if this cell is
    /// already in the middle of its own write.
    pub fn set(&self, value: A) {
        self.node.set(value)
    }

    /// `set(f(get()))`.
    pub fn modify<F>(&self, f: F)
    where
        F: FnOnce(&A) -> A,
    {
        self.node.set(f(&self.node.get()))
    }

    /// [`Var::set`] returning the cell, for construction chains.
    pub fn setting(self, value: A) -> Self {
        self.set(value);
        self
    }

    /// [`Var::modify`] returning the cell.
    pub fn modifying<F>(self, f: F) -> Self
    where
        F: FnOnce(&A) -> A,
    {
        self.modify(f);
        self
    }

    /// Check if a write to this cell is currently propagating.
    pub fn is_busy(&self) -> bool {
        self.node.is_busy()
    }

    // -------------------------------------------------------------------------
    // Raw wiring
    // -------------------------------------------------------------------------

    /// Listener that runs before downstream listeners and effects. Does not
    /// install upstream links; used for write-back into a parent cell.
    pub fn listen_up<F>(&self, cb: F) -> Uninstaller
    where
        F: Fn(&A, Option<&A>) + 'static,
    {
        self.node.listen(ListenerKind::Upstream, Rc::new(cb))
    }

    /// Queue a lazily installed subscription.
    pub fn listen_to<F>(&self, subscribe: F) -> Uninstaller
    where
        F: Fn() -> Uninstaller + 'static,
    {
        self.node.listen_to(Rc::new(subscribe))
    }

    /// Queue a lazily installed subscription to `source`. `cb` is handed this
    /// cell on every call so it never has to capture it.
    pub fn listen_to_value<B, F>(&self, source: &Value<B>, cb: F, autorun: bool) -> Uninstaller
    where
        B: Clone + 'static,
        F: Fn(&Var<A>, &B, Option<&B>) + 'static,
    {
        self.node.follow(&source.node, autorun, move |node, v, o| {
            cb(&Var::from_node(node.clone()), v, o)
        })
    }

    // -------------------------------------------------------------------------
    // Zooms
    // -------------------------------------------------------------------------

    /// Derived read-write cell. Writes go through `write(new, current_parent)`
    /// and are committed back into this cell.
    pub fn zoom<B, R, W>(&self, read: R, write: W) -> Var<B>
    where
        B: Clone + PartialEq + 'static,
        R: Fn(&A) -> B + 'static,
        W: Fn(B, &A) -> A + 'static,
    {
        let read = Rc::new(read);
        let source = self.clone();
        let compute = read.clone();
        let node = Node::computed(read(&self.get()), partial_eq(), move || compute(&source.get()));
        let _ = node.follow(&self.node, false, move |b, v, _| b.set(read(v)));

        let zoomed = Var::from_node(node);
        let parent = self.clone();
        // The parent outlives the zoom only through this listener.
        let _ = zoomed.listen_up(move |b, _| {
            let b = b.clone();
            parent.modify(|a| write(b, a));
        });
        zoomed
    }

    /// Intercept writes: `f(new, old)` decides what is actually stored.
    pub fn censor<F>(&self, f: F) -> Var<A>
    where
        A: PartialEq,
        F: Fn(A, &A) -> A + 'static,
    {
        self.zoom(|a| a.clone(), f)
    }

    /// Zoom through a [`Lens`].
    pub fn lens<B>(&self, lens: Lens<A, B>) -> Var<B>
    where
        B: Clone + PartialEq + 'static,
    {
        let writer = lens.clone();
        self.zoom(move |a| lens.apply(a).into_get(), move |b, a| writer.apply(a).set(b))
    }

    /// Zoom through an [`Iso`].
    pub fn iso<B>(&self, iso: Iso<A, B>) -> Var<B>
    where
        B: Clone + PartialEq + 'static,
    {
        let bw = iso.clone();
        self.zoom(move |a| iso.fw(a), move |b, _| bw.bw(&b))
    }

    /// Zoom into one field via the [`WithField`] structural update.
    pub fn prop<K>(&self, key: K) -> Var<A::Field>
    where
        K: Clone + 'static,
        A: WithField<K>,
        A::Field: PartialEq,
    {
        let write_key = key.clone();
        self.zoom(
            move |a| a.field(&key),
            move |b, a| a.with_field(&write_key, b),
        )
    }

    /// Widen to an optional cell. Writing `None` keeps the current value.
    pub fn partial(&self) -> Var<Option<A>>
    where
        A: PartialEq,
    {
        self.zoom(|a| Some(a.clone()), |b, a| b.unwrap_or_else(|| a.clone()))
    }
}

impl<T: Clone + PartialEq + 'static> Var<Option<T>> {
    /// Total view with a fallback for `None`. Writes always store `Some`.
    pub fn or(&self, default: T) -> Var<T> {
        self.zoom(move |a| a.clone().unwrap_or_else(|| default.clone()), |b, _| Some(b))
    }

    /// Total view of a cell that is `Some` right now, keeping the last seen
    /// value as the fallback. `None` if the cell is empty.
    pub fn total(&self) -> Option<Var<T>> {
        let fallback = self.get()?;
        Some(self.zoom(move |a| a.clone().unwrap_or_else(|| fallback.clone()), |b, _| Some(b)))
    }
}

impl Var<bool> {
    pub fn toggle(&self) {
        self.modify(|v| !v)
    }

    /// Inverted two-way view.
    pub fn negation(&self) -> Var<bool> {
        self.zoom(|b| !b, |b, _| !b)
    }

    pub fn on(&self) {
        self.set(true)
    }

    pub fn off(&self) {
        self.set(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn counter() -> (Rc<Cell<usize>>, impl Fn(&i32, Option<&i32>) + 'static) {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        (count, move |_: &i32, _: Option<&i32>| count_clone.set(count_clone.get() + 1))
    }

    #[test]
    fn test_get_set() {
        let v = Var::new(1);
        assert_eq!(v.get(), 1);
        v.set(2);
        assert_eq!(v.get(), 2);
        v.modify(|x| x * 10);
        assert_eq!(v.get(), 20);
    }

    #[test]
    fn test_set_same_value_is_noop() {
        let v = Var::new(5);
        let (count, cb) = counter();
        let _off = v.effect(cb, false);

        v.set(v.get());
        assert_eq!(count.get(), 0);

        v.set(6);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_custom_equality() {
        // Only the tens digit matters
        let v = Var::with_equality(10, |a: &i32, b: &i32| a / 10 == b / 10);
        let (count, cb) = counter();
        let _off = v.effect(cb, false);

        v.set(15);
        assert_eq!(count.get(), 0);
        assert_eq!(v.get(), 10);

        v.set(25);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_effect_receives_new_and_old() {
        let v = Var::new(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _off = v.effect(
            move |a, o| seen_clone.borrow_mut().push((*a, o.copied())),
            true,
        );

        v.set(2);
        assert_eq!(*seen.borrow(), vec![(1, None), (2, Some(1))]);
    }

    #[test]
    fn test_uninstall_effect() {
        let v = Var::new(1);
        let (count, cb) = counter();
        let off = v.effect(cb, false);

        v.set(2);
        off();
        v.set(3);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_listener_order() {
        let v = Var::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        let _e = v.effect(move |_, _| l.borrow_mut().push("effect"), false);
        let l = log.clone();
        let _d = v.listen_down(move |_, _| l.borrow_mut().push("down"));
        let l = log.clone();
        let _u = v.listen_up(move |_, _| l.borrow_mut().push("up"));

        v.set(1);
        assert_eq!(*log.borrow(), vec!["up", "down", "effect"]);
    }

    #[test]
    fn test_map_is_lazy() {
        let base = Var::new(2);
        let doubled = base.map(|x| x * 2);

        // Reads work without subscribing
        assert_eq!(doubled.get(), 4);
        assert_eq!(base.listener_count(ListenerKind::Downstream), 0);

        let (count, cb) = counter();
        let off = doubled.effect(cb, false);
        assert_eq!(base.listener_count(ListenerKind::Downstream), 1);

        base.set(3);
        assert_eq!(doubled.get(), 6);
        assert_eq!(count.get(), 1);

        off();
        assert_eq!(base.listener_count(ListenerKind::Downstream), 0);
        assert!(!doubled.is_installed());
    }

    #[test]
    fn test_map_does_not_swallow_change_after_idle() {
        let base = Var::new(1);
        let same = base.map(|x| *x);

        // Drift while unobserved
        base.set(5);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _off = same.effect(move |a, _| seen_clone.borrow_mut().push(*a), false);

        // 5 -> 1 must be reported even though the stale copy was 1
        base.set(1);
        assert_eq!(*seen.borrow(), vec![1]);
    }

    #[test]
    fn test_map_with_previous() {
        let base = Var::new(1);
        let delta = base.map_with_previous(|a, o| a - o.copied().unwrap_or(*a));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _off = delta.effect(move |d, _| seen_clone.borrow_mut().push(*d), false);

        base.set(4);
        base.set(10);
        assert_eq!(*seen.borrow(), vec![3, 6]);
    }

    #[test]
    fn test_zoom_writes_back() {
        let pair = Var::new((1, 2));
        let first = pair.zoom(|p| p.0, |x, p| (x, p.1));

        first.set(10);
        assert_eq!(pair.get(), (10, 2));
        assert_eq!(first.get(), 10);

        pair.set((7, 8));
        assert_eq!(first.get(), 7);
    }

    #[test]
    fn test_zoom_write_back_fires_once() {
        let pair = Var::new((1, 2));
        let first = pair.zoom(|p| p.0, |x, p| (x, p.1));

        let (zoom_count, cb) = counter();
        let _off = first.effect(cb, false);
        let parent_count = Rc::new(Cell::new(0));
        let pc = parent_count.clone();
        let _off2 = pair.effect(move |_, _| pc.set(pc.get() + 1), false);

        first.set(10);
        assert_eq!(zoom_count.get(), 1);
        assert_eq!(parent_count.get(), 1);

        pair.set((11, 2));
        assert_eq!(zoom_count.get(), 2);
        assert_eq!(parent_count.get(), 2);
    }

    #[test]
    fn test_unobserved_zoom_write_after_drift() {
        let base = Var::new(1);
        let same = base.zoom(|x| *x, |x, _| x);

        base.set(2);
        same.set(1);
        assert_eq!(base.get(), 1);
    }

    #[test]
    fn test_bind_switches_inner() {
        let use_left = Var::new(true);
        let left = Var::new(1);
        let right = Var::new(100);

        let (l, r) = (left.clone(), right.clone());
        let chosen = use_left.bind(move |b, _| if *b { l.read_only() } else { r.read_only() });

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let off = chosen.effect(move |v, _| seen_clone.borrow_mut().push(*v), false);

        left.set(2);
        use_left.set(false);
        left.set(3); // no longer followed
        right.set(101);

        assert_eq!(*seen.borrow(), vec![2, 100, 101]);
        assert_eq!(left.listener_count(ListenerKind::Downstream), 0);
        assert_eq!(right.listener_count(ListenerKind::Downstream), 1);

        off();
        assert_eq!(right.listener_count(ListenerKind::Downstream), 0);
        assert_eq!(use_left.listener_count(ListenerKind::Downstream), 0);
    }

    #[test]
    fn test_option_or() {
        let v: Var<Option<i32>> = Var::new(None);
        let total = v.or(7);
        assert_eq!(total.get(), 7);
        total.set(3);
        assert_eq!(v.get(), Some(3));
    }

    #[test]
    fn test_total_requires_value() {
        let empty: Var<Option<i32>> = Var::new(None);
        assert!(empty.total().is_none());

        let full = Var::new(Some(4));
        let total = full.total().unwrap();
        full.set(None);
        assert_eq!(total.get(), 4);
    }

    #[test]
    fn test_bool_helpers() {
        let flag = Var::new(false);
        let not = flag.negation();
        assert!(not.get());

        flag.toggle();
        assert!(flag.get());
        assert!(!not.get());

        not.set(true);
        assert!(!flag.get());
    }

    #[test]
    fn test_censor() {
        let v = Var::new(0);
        let clamped = v.censor(|n, _| n.clamp(0, 10));
        clamped.set(50);
        assert_eq!(v.get(), 10);
    }

    #[test]
    fn test_censor_listeners_see_what_stuck() {
        let v = Var::new(0);
        let clamped = v.censor(|n, _| n.clamp(0, 10));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _off = clamped.effect(move |n, _| seen_clone.borrow_mut().push(*n), false);

        clamped.set(50);
        assert_eq!(clamped.get(), 10);
        assert_eq!(*seen.borrow(), vec![10]);

        // Writing the parent directly bypasses the censor
        v.set(50);
        assert_eq!(clamped.get(), 50);
        assert_eq!(*seen.borrow(), vec![10, 50]);
    }

    #[test]
    fn test_equals() {
        let v = Var::new(1);
        let is_two = v.equals(2);
        assert!(!is_two.get());
        v.set(2);
        assert!(is_two.get());
    }

    #[test]
    fn test_lift2() {
        let a = Var::new(2);
        let b = Var::new(3);
        let product = lift2(&a, &b, |x, y| x * y);
        let (count, cb) = counter();
        let _off = product.effect(cb, false);

        a.set(4);
        assert_eq!(product.get(), 12);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_map_maybe() {
        let picked = Var::new(Some(4));
        let half = picked.map_maybe(|v| (v % 2 == 0).then_some(v / 2));
        assert_eq!(half.get(), Some(2));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _stop = half.effect(move |v, _| seen_clone.borrow_mut().push(*v), false);

        picked.set(Some(3));
        picked.set(None);
        picked.set(Some(8));
        // The odd value and the empty one both map to None: one change
        assert_eq!(*seen.borrow(), vec![None, Some(4)]);
        assert_eq!(half.get(), Some(4));
    }

    #[test]
    fn test_lift4() {
        let (a, b, c, d) = (Var::new(1), Var::new(2), Var::new(3), Var::new(4));
        let sum = lift4(&a, &b, &c, &d, |a, b, c, d| a + b + c + d);
        let (count, cb) = counter();
        let _off = sum.effect(cb, false);

        d.set(10);
        assert_eq!(sum.get(), 16);
        b.set(3);
        c.set(2);
        assert_eq!(sum.get(), 16);
        assert_eq!(count.get(), 3);
    }
}
