//! Lens Module - Pure bidirectional accessors
//!
//! A [`Lens<O, I>`] turns an owner `O` into an [`Edit<O, I>`]: the focused
//! `I` plus a setter producing a new `O`. Lenses hold no state, so one lens
//! can be applied to any number of owners.
//!
//! Types opt into field access by implementing [`WithField`], a structural
//! update keyed by a field enum. Every write builds a new value, which is
//! what lets cells detect no-op writes by equality.
//!
//! # Example
//!
//! ```ignore
//! use spark_ui_core::lens::Lens;
//! use spark_ui_core::types::{Rect, Side};
//!
//! let right = Lens::<Rect, Rect>::id().prop(Side::Right);
//! let r = Rect::new(0.0, 0.0, 10.0, 10.0);
//! assert_eq!(right.set(&r, 20.0).right, 20.0);
//! ```

mod edit;
mod iso;

pub use edit::Edit;
pub use iso::Iso;

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::rc::Rc;

use crate::types::{Axis, Point, Rect, Side};

// =============================================================================
// STRUCTURAL UPDATE
// =============================================================================

/// Read and replace one field of a value, keyed by `K`.
pub trait WithField<K> {
    type Field: Clone + 'static;

    fn field(&self, key: &K) -> Self::Field;

    /// A copy of `self` with `key` set to `value`.
    fn with_field(&self, key: &K, value: Self::Field) -> Self;
}

impl WithField<Side> for Rect {
    type Field = f64;

    fn field(&self, key: &Side) -> f64 {
        self.edge(*key)
    }

    fn with_field(&self, key: &Side, value: f64) -> Self {
        self.with_edge(*key, value)
    }
}

impl WithField<Axis> for Point {
    type Field = f64;

    fn field(&self, key: &Axis) -> f64 {
        match key {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    fn with_field(&self, key: &Axis, value: f64) -> Self {
        match key {
            Axis::X => Point { x: value, ..*self },
            Axis::Y => Point { y: value, ..*self },
        }
    }
}

/// Map entries are optional; setting `None` removes the key.
impl<K, V> WithField<K> for BTreeMap<K, V>
where
    K: Ord + Clone,
    V: Clone + 'static,
{
    type Field = Option<V>;

    fn field(&self, key: &K) -> Option<V> {
        self.get(key).cloned()
    }

    fn with_field(&self, key: &K, value: Option<V>) -> Self {
        let mut next = self.clone();
        match value {
            Some(v) => next.insert(key.clone(), v),
            None => next.remove(key),
        };
        next
    }
}

impl<K, V> WithField<K> for HashMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + 'static,
{
    type Field = Option<V>;

    fn field(&self, key: &K) -> Option<V> {
        self.get(key).cloned()
    }

    fn with_field(&self, key: &K, value: Option<V>) -> Self {
        let mut next = self.clone();
        match value {
            Some(v) => next.insert(key.clone(), v),
            None => next.remove(key),
        };
        next
    }
}

// =============================================================================
// LENS
// =============================================================================

/// A stateless accessor from `O` to `I`.
pub struct Lens<O, I> {
    run: Rc<dyn Fn(&O) -> Edit<O, I>>,
}

impl<O, I> Clone for Lens<O, I> {
    fn clone(&self) -> Self {
        Self {
            run: self.run.clone(),
        }
    }
}

impl<O: Clone + 'static> Lens<O, O> {
    pub fn id() -> Self {
        Lens::new(|o: &O| Edit::id(o.clone()))
    }

    /// Lens onto one field of `O`.
    pub fn field<K>(key: K) -> Lens<O, O::Field>
    where
        K: Clone + 'static,
        O: WithField<K>,
    {
        Lens::<O, O>::id().prop(key)
    }
}

impl<O: 'static, I: Clone + 'static> Lens<O, I> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&O) -> Edit<O, I> + 'static,
    {
        Self { run: Rc::new(f) }
    }

    pub fn apply(&self, o: &O) -> Edit<O, I> {
        (self.run)(o)
    }

    pub fn get(&self, o: &O) -> I {
        self.apply(o).into_get()
    }

    pub fn set(&self, o: &O, i: I) -> O {
        self.apply(o).set(i)
    }

    pub fn modify<F>(&self, o: &O, f: F) -> O
    where
        F: FnOnce(&I) -> I,
    {
        self.apply(o).modify(f)
    }

    /// `self`, then `next` on the focus.
    pub fn zoom<K: Clone + 'static>(&self, next: &Lens<I, K>) -> Lens<O, K> {
        let outer = self.clone();
        let next = next.clone();
        Lens::new(move |o: &O| outer.apply(o).zoom(&next))
    }

    pub fn prop<K>(&self, key: K) -> Lens<O, I::Field>
    where
        K: Clone + 'static,
        I: WithField<K>,
    {
        let outer = self.clone();
        Lens::new(move |o: &O| outer.apply(o).prop(key.clone()))
    }

    pub fn iso<K: Clone + 'static>(&self, iso: Iso<I, K>) -> Lens<O, K> {
        let outer = self.clone();
        Lens::new(move |o: &O| outer.apply(o).iso(iso.clone()))
    }
}

impl<O: 'static, E: Clone + 'static> Lens<O, Vec<E>> {
    pub fn at(&self, ix: usize) -> Lens<O, Option<E>> {
        let outer = self.clone();
        Lens::new(move |o: &O| outer.apply(o).at(ix))
    }

    pub fn find<P>(&self, pred: P) -> Lens<O, Option<E>>
    where
        P: Fn(&E) -> bool + 'static,
    {
        let outer = self.clone();
        let pred = Rc::new(pred);
        Lens::new(move |o: &O| {
            let pred = pred.clone();
            outer.apply(o).find(move |e| pred(e))
        })
    }
}

impl<O: 'static, X: Clone + 'static> Lens<O, Option<X>> {
    pub fn or(&self, fallback: X) -> Lens<O, X> {
        let outer = self.clone();
        Lens::new(move |o: &O| outer.apply(o).or(fallback.clone()))
    }
}

// =============================================================================
// PACK
// =============================================================================

/// A tuple of lenses into the same owner, read and written as one record.
pub trait LensFields<O> {
    type Output: Clone + 'static;

    fn get_all(&self, o: &O) -> Self::Output;

    fn set_all(&self, o: &O, value: &Self::Output) -> O;
}

macro_rules! impl_lens_fields_for_tuple {
    ($($name:ident : $ix:tt),+) => {
        impl<O: Clone + 'static, $($name: Clone + 'static),+> LensFields<O> for ($(Lens<O, $name>,)+) {
            type Output = ($($name,)+);

            fn get_all(&self, o: &O) -> Self::Output {
                ($(self.$ix.get(o),)+)
            }

            fn set_all(&self, o: &O, value: &Self::Output) -> O {
                let next = o.clone();
                $(let next = self.$ix.set(&next, value.$ix.clone());)+
                next
            }
        }
    };
}

impl_lens_fields_for_tuple!(A: 0);
impl_lens_fields_for_tuple!(A: 0, B: 1);
impl_lens_fields_for_tuple!(A: 0, B: 1, C: 2);
impl_lens_fields_for_tuple!(A: 0, B: 1, C: 2, D: 3);

/// One lens over a record assembled from per-field lenses. Fields are
/// written left to right, each into the owner produced by the previous one.
pub fn pack_l<O, F>(fields: F) -> Lens<O, F::Output>
where
    O: Clone + 'static,
    F: LensFields<O> + 'static,
{
    let fields = Rc::new(fields);
    Lens::new(move |o: &O| {
        let fields = fields.clone();
        let owner = o.clone();
        Edit::new(fields.get_all(o), move |u| fields.set_all(&owner, &u))
    })
}
