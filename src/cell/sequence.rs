//! Zooms into cells holding sequences and maps.
//!
//! Out-of-range reads come back as `None` and out-of-range writes leave the
//! sequence untouched.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use super::var::Var;

impl<T: Clone + PartialEq + 'static> Var<Vec<T>> {
    /// Element at `ix`. Writing `None`, or writing past the end, is a no-op.
    pub fn at(&self, ix: usize) -> Var<Option<T>> {
        self.zoom(
            move |xs| xs.get(ix).cloned(),
            move |x, xs| match x {
                Some(x) if ix < xs.len() => {
                    let mut next = xs.clone();
                    next[ix] = x;
                    next
                }
                _ => xs.clone(),
            },
        )
    }

    /// Element at `ix`, reading `fallback` when out of range.
    pub fn at_or(&self, ix: usize, fallback: T) -> Var<T> {
        self.at(ix).or(fallback)
    }

    /// First element. Writing `Some` into an empty sequence inserts it.
    pub fn first(&self) -> Var<Option<T>> {
        self.zoom(
            |xs| xs.first().cloned(),
            |x, xs| {
                let mut next = xs.clone();
                if let Some(x) = x {
                    match next.first_mut() {
                        Some(head) => *head = x,
                        None => next.push(x),
                    }
                }
                next
            },
        )
    }

    /// Last element. Writing `Some` into an empty sequence inserts it.
    pub fn last(&self) -> Var<Option<T>> {
        self.zoom(
            |xs| xs.last().cloned(),
            |x, xs| {
                let mut next = xs.clone();
                if let Some(x) = x {
                    match next.last_mut() {
                        Some(tail) => *tail = x,
                        None => next.push(x),
                    }
                }
                next
            },
        )
    }

    /// First element matching `pred`. Writing `Some(x)` replaces every match
    /// with `x`; writing `None` removes every match.
    pub fn find<P>(&self, pred: P) -> Var<Option<T>>
    where
        P: Fn(&T) -> bool + 'static,
    {
        let pred = std::rc::Rc::new(pred);
        let read = pred.clone();
        self.zoom(
            move |xs| xs.iter().find(|x| read(x)).cloned(),
            move |x, xs| match x {
                Some(x) => xs
                    .iter()
                    .map(|c| if pred(c) { x.clone() } else { c.clone() })
                    .collect(),
                None => xs.iter().filter(|c| !pred(c)).cloned().collect(),
            },
        )
    }

    pub fn push(&self, x: T) {
        self.modify(|xs| {
            let mut next = xs.clone();
            next.push(x);
            next
        })
    }

    pub fn pop(&self) {
        self.modify(|xs| {
            let mut next = xs.clone();
            next.pop();
            next
        })
    }

    /// One zoom per current element.
    pub fn unlist(&self) -> Vec<Var<Option<T>>> {
        (0..self.get().len()).map(|ix| self.at(ix)).collect()
    }
}

impl<K, V> Var<BTreeMap<K, V>>
where
    K: Ord + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    /// Entry for `key`. Writing `None` removes it.
    pub fn lookup(&self, key: K) -> Var<Option<V>> {
        let write_key = key.clone();
        self.zoom(
            move |m| m.get(&key).cloned(),
            move |v, m| {
                let mut next = m.clone();
                match v {
                    Some(v) => next.insert(write_key.clone(), v),
                    None => next.remove(&write_key),
                };
                next
            },
        )
    }
}

impl<K, V> Var<HashMap<K, V>>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    /// Entry for `key`. Writing `None` removes it.
    pub fn lookup(&self, key: K) -> Var<Option<V>> {
        let write_key = key.clone();
        self.zoom(
            move |m| m.get(&key).cloned(),
            move |v, m| {
                let mut next = m.clone();
                match v {
                    Some(v) => next.insert(write_key.clone(), v),
                    None => next.remove(&write_key),
                };
                next
            },
        )
    }
}
