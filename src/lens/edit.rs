//! `Edit<O, I>`: a focused value plus a way to rebuild its owner.

use std::fmt;
use std::rc::Rc;

use super::iso::Iso;
use super::{Lens, WithField};

/// A snapshot of an `I` inside some owner `O`, together with a setter that
/// produces a new owner. Setting never touches the original owner.
pub struct Edit<O, I> {
    get: I,
    set: Rc<dyn Fn(I) -> O>,
}

impl<O, I: Clone> Clone for Edit<O, I> {
    fn clone(&self) -> Self {
        Self {
            get: self.get.clone(),
            set: self.set.clone(),
        }
    }
}

impl<O, I: fmt::Debug> fmt::Debug for Edit<O, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Edit").field("get", &self.get).finish_non_exhaustive()
    }
}

impl<O: Clone + 'static> Edit<O, O> {
    /// Focus on the whole owner.
    pub fn id(o: O) -> Self {
        Edit::new(o, |o| o)
    }
}

impl<O: 'static, I: Clone + 'static> Edit<O, I> {
    pub fn new<S>(get: I, set: S) -> Self
    where
        S: Fn(I) -> O + 'static,
    {
        Self {
            get,
            set: Rc::new(set),
        }
    }

    pub fn get(&self) -> &I {
        &self.get
    }

    pub fn into_get(self) -> I {
        self.get
    }

    /// A new owner with the focus replaced by `i`.
    pub fn set(&self, i: I) -> O {
        (self.set)(i)
    }

    pub fn modify<F>(&self, f: F) -> O
    where
        F: FnOnce(&I) -> I,
    {
        self.set(f(&self.get))
    }

    /// Like [`Edit::modify`], also returning a by-product of `f`.
    pub fn modify_with<A, F>(&self, f: F) -> (O, A)
    where
        F: FnOnce(&I) -> (I, A),
    {
        let (i, a) = f(&self.get);
        (self.set(i), a)
    }

    /// Set, then refocus on the whole new owner.
    pub fn setting(&self, i: I) -> Edit<O, O>
    where
        O: Clone,
    {
        Edit::id(self.set(i))
    }

    pub fn modifying<F>(&self, f: F) -> Edit<O, O>
    where
        O: Clone,
        F: FnOnce(&I) -> I,
    {
        Edit::id(self.modify(f))
    }

    pub fn iso<K: Clone + 'static>(self, iso: Iso<I, K>) -> Edit<O, K> {
        let parent = self.set;
        Edit::new(iso.fw(&self.get), move |k| parent(iso.bw(&k)))
    }

    /// Focus further through `lens`.
    pub fn zoom<K: Clone + 'static>(self, lens: &Lens<I, K>) -> Edit<O, K> {
        let inner = lens.apply(&self.get);
        let parent = self.set;
        let get = inner.get.clone();
        Edit::new(get, move |k| parent(inner.set(k)))
    }

    /// Focus on one field through its structural update.
    pub fn prop<K: 'static>(self, key: K) -> Edit<O, I::Field>
    where
        I: WithField<K>,
    {
        let owner = self.get;
        let parent = self.set;
        Edit::new(owner.field(&key), move |f| parent(owner.with_field(&key, f)))
    }
}

impl<O: 'static, E: Clone + 'static> Edit<O, Vec<E>> {
    /// Element at `ix`. Writing `None` or writing out of range keeps the
    /// sequence as it was.
    pub fn at(self, ix: usize) -> Edit<O, Option<E>> {
        let xs = self.get;
        let parent = self.set;
        Edit::new(xs.get(ix).cloned(), move |e| {
            let mut next = xs.clone();
            if let (Some(e), Some(slot)) = (e, next.get_mut(ix)) {
                *slot = e;
            }
            parent(next)
        })
    }

    pub fn first(self) -> Edit<O, Option<E>> {
        self.at(0)
    }

    pub fn last(self) -> Edit<O, Option<E>> {
        let ix = self.get.len().saturating_sub(1);
        self.at(ix)
    }

    /// First element matching `pred`. Writing `Some(e)` replaces every
    /// match; writing `None` removes every match.
    pub fn find<P>(self, pred: P) -> Edit<O, Option<E>>
    where
        P: Fn(&E) -> bool + 'static,
    {
        let xs = self.get;
        let parent = self.set;
        let found = xs.iter().find(|x| pred(x)).cloned();
        Edit::new(found, move |e| {
            let next = match e {
                Some(e) => xs
                    .iter()
                    .map(|c| if pred(c) { e.clone() } else { c.clone() })
                    .collect(),
                None => xs.iter().filter(|c| !pred(c)).cloned().collect(),
            };
            parent(next)
        })
    }

    pub fn push(&self, x: E) -> O {
        self.modify(|xs| {
            let mut next = xs.clone();
            next.push(x);
            next
        })
    }

    pub fn pop(&self) -> O {
        self.modify(|xs| {
            let mut next = xs.clone();
            next.pop();
            next
        })
    }
}

impl<O: 'static, X: Clone + 'static> Edit<O, Option<X>> {
    /// Total focus reading `fallback` for `None`.
    pub fn or(self, fallback: X) -> Edit<O, X> {
        let parent = self.set;
        Edit::new(self.get.unwrap_or(fallback), move |x| parent(Some(x)))
    }
}

impl<O: 'static> Edit<O, bool> {
    pub fn toggle(&self) -> O {
        self.modify(|b| !b)
    }
}

impl<O: 'static> Edit<O, f64> {
    pub fn add(&self, v: f64) -> O {
        self.modify(|c| c + v)
    }

    pub fn mul(&self, v: f64) -> O {
        self.modify(|c| c * v)
    }
}
