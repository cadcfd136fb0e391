//! The propagation engine behind [`Var`](super::Var) and [`Value`](super::Value).
//!
//! A node owns its value, three listener groups and a set of lazy links to
//! the nodes it derives from. Links stay pending until the node has its first
//! effect or downstream listener, and are torn down again when the last one
//! leaves. A listener registered on a source keeps the derived node alive;
//! the node only holds a weak reference back through its installers, so an
//! unobserved derived node forms no cycle and is freed with its last handle.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::instrument::{self, ListenerKind};
use super::slots::Slots;
use super::Uninstaller;

/// Change callback: `(new, old)`. `old` is `None` for an immediate run.
pub(crate) type Listener<A> = Rc<dyn Fn(&A, Option<&A>)>;

/// Creates a subscription to some other node; returns its teardown.
pub(crate) type Installer = Rc<dyn Fn() -> Uninstaller>;

/// Decides whether a write is a no-op.
pub(crate) type Equality<A> = Rc<dyn Fn(&A, &A) -> bool>;

#[derive(Default)]
struct Links {
    next_id: u64,
    pending: Vec<(u64, Installer)>,
    installed: Vec<(u64, Installer, Uninstaller)>,
}

pub(crate) struct Node<A> {
    value: RefCell<A>,
    /// Present on derived nodes: reads bypass the stored copy.
    compute: Option<Box<dyn Fn() -> A>>,
    equality: Equality<A>,
    busy: Cell<u32>,
    upstreams: Slots<Listener<A>>,
    downstreams: Slots<Listener<A>>,
    effects: Slots<Listener<A>>,
    links: RefCell<Links>,
}

struct BusyGuard<'a>(&'a Cell<u32>);

impl<'a> BusyGuard<'a> {
    fn enter(busy: &'a Cell<u32>) -> Self {
        busy.set(busy.get() + 1);
        Self(busy)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

impl<A: Clone + 'static> Node<A> {
    /// A source node that owns its storage.
    pub(crate) fn stored(value: A, equality: Equality<A>) -> Rc<Self> {
        Rc::new(Self::build(value, equality, None))
    }

    /// A derived node whose reads are computed from upstream.
    pub(crate) fn computed(
        value: A,
        equality: Equality<A>,
        compute: impl Fn() -> A + 'static,
    ) -> Rc<Self> {
        Rc::new(Self::build(value, equality, Some(Box::new(compute))))
    }

    fn build(value: A, equality: Equality<A>, compute: Option<Box<dyn Fn() -> A>>) -> Self {
        Self {
            value: RefCell::new(value),
            compute,
            equality,
            busy: Cell::new(0),
            upstreams: Slots::new(),
            downstreams: Slots::new(),
            effects: Slots::new(),
            links: RefCell::new(Links::default()),
        }
    }

    // -------------------------------------------------------------------------
    // Read / write
    // -------------------------------------------------------------------------

    pub(crate) fn get(&self) -> A {
        match &self.compute {
            Some(compute) => compute(),
            None => self.value.borrow().clone(),
        }
    }

    pub(crate) fn set(&self, value: A) {
        if self.busy.get() > 0 {
            return;
        }
        // An unlinked derived node has a stale copy; compare against the truth.
        if !self.has_consumers() {
            self.refresh();
        }
        if (self.equality)(&self.value.borrow(), &value) {
            return;
        }

        let _busy = BusyGuard::enter(&self.busy);
        let old = self.value.replace(value.clone());
        self.propagate(&value, &old);
    }

    fn propagate(&self, value: &A, old: &A) {
        self.upstreams.for_each_live(|listener| listener(value, Some(old)));

        // A write-back may have stored something else upstream (a censor, a
        // clamp). The echo was dropped while busy, so resync from the source
        // and pass on what actually stuck.
        let settled = match &self.compute {
            Some(compute) if !self.upstreams.is_empty() => {
                let fresh = compute();
                *self.value.borrow_mut() = fresh.clone();
                fresh
            }
            _ => value.clone(),
        };
        if (self.equality)(old, &settled) {
            return;
        }

        for group in [&self.downstreams, &self.effects] {
            group.for_each_live(|listener| listener(&settled, Some(old)));
        }
    }

    /// Silently resync the stored copy of a derived node.
    fn refresh(&self) {
        if let Some(compute) = &self.compute {
            let fresh = compute();
            *self.value.borrow_mut() = fresh;
        }
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.busy.get() > 0
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    fn group(&self, kind: ListenerKind) -> &Slots<Listener<A>> {
        match kind {
            ListenerKind::Effect => &self.effects,
            ListenerKind::Upstream => &self.upstreams,
            ListenerKind::Downstream => &self.downstreams,
        }
    }

    /// Register a listener in `kind`'s group. Effects and downstream
    /// listeners pull in pending upstream links.
    pub(crate) fn listen(self: &Rc<Self>, kind: ListenerKind, listener: Listener<A>) -> Uninstaller {
        let key = self.group(kind).insert(listener);
        instrument::record(kind, true);
        if kind != ListenerKind::Upstream {
            self.maybe_install();
        }

        let weak: Weak<Self> = Rc::downgrade(self);
        Box::new(move || {
            let Some(node) = weak.upgrade() else {
                return;
            };
            if node.group(kind).remove(key).is_some() {
                instrument::record(kind, false);
                if kind != ListenerKind::Upstream {
                    node.maybe_uninstall();
                }
            }
        })
    }

    pub(crate) fn listener_count(&self, kind: ListenerKind) -> usize {
        self.group(kind).len()
    }

    fn has_consumers(&self) -> bool {
        !self.effects.is_empty() || !self.downstreams.is_empty()
    }

    // -------------------------------------------------------------------------
    // Lazy links
    // -------------------------------------------------------------------------

    /// Queue a link to another node. It is installed as soon as this node has
    /// a consumer.
    pub(crate) fn listen_to(self: &Rc<Self>, install: Installer) -> Uninstaller {
        let id = {
            let mut links = self.links.borrow_mut();
            let id = links.next_id;
            links.next_id += 1;
            links.pending.push((id, install));
            id
        };
        self.maybe_install();

        let weak: Weak<Self> = Rc::downgrade(self);
        Box::new(move || {
            let Some(node) = weak.upgrade() else {
                return;
            };
            let uninstall = {
                let mut links = node.links.borrow_mut();
                links.pending.retain(|(pid, _)| *pid != id);
                links
                    .installed
                    .iter()
                    .position(|(iid, _, _)| *iid == id)
                    .map(|ix| links.installed.remove(ix).2)
            };
            if let Some(uninstall) = uninstall {
                uninstall();
            }
        })
    }

    /// Link this node to `source`: `on_change` runs with this node whenever
    /// `source` notifies downstream. With `autorun`, it also runs once with
    /// the source's current value at installation.
    pub(crate) fn follow<S: Clone + 'static>(
        self: &Rc<Self>,
        source: &Rc<Node<S>>,
        autorun: bool,
        on_change: impl Fn(&Rc<Node<A>>, &S, Option<&S>) + 'static,
    ) -> Uninstaller {
        let weak = Rc::downgrade(self);
        let source = source.clone();
        let on_change = Rc::new(on_change);
        self.listen_to(Rc::new(move || {
            let Some(node) = weak.upgrade() else {
                return Box::new(|| {}) as Uninstaller;
            };
            if autorun {
                on_change(&node, &source.get(), None);
            }
            let on_change = on_change.clone();
            source.listen(
                ListenerKind::Downstream,
                Rc::new(move |v: &S, o: Option<&S>| on_change(&node, v, o)),
            )
        }))
    }

    fn maybe_install(&self) {
        if !self.has_consumers() {
            return;
        }
        let pending = std::mem::take(&mut self.links.borrow_mut().pending);
        if pending.is_empty() {
            return;
        }
        self.refresh();
        for (id, install) in pending {
            let uninstall = install();
            self.links.borrow_mut().installed.push((id, install, uninstall));
        }
    }

    fn maybe_uninstall(&self) {
        if self.has_consumers() {
            return;
        }
        let installed = std::mem::take(&mut self.links.borrow_mut().installed);
        if installed.is_empty() {
            return;
        }
        let mut restored = Vec::with_capacity(installed.len());
        for (id, install, uninstall) in installed {
            uninstall();
            restored.push((id, install));
        }
        let mut links = self.links.borrow_mut();
        links.pending.extend(restored);
        links.pending.sort_by_key(|(id, _)| *id);
    }

    pub(crate) fn is_installed(&self) -> bool {
        !self.links.borrow().installed.is_empty()
    }

    /// Tear down every installed link and forget all pending ones.
    pub(crate) fn dispose(&self) {
        let installed = {
            let mut links = self.links.borrow_mut();
            links.pending.clear();
            std::mem::take(&mut links.installed)
        };
        for (_, _, uninstall) in installed {
            uninstall();
        }
    }
}

impl<A> Drop for Node<A> {
    fn drop(&mut self) {
        let installed = std::mem::take(&mut self.links.get_mut().installed);
        for (_, _, uninstall) in installed {
            uninstall();
        }
    }
}
