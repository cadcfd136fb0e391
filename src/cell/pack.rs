//! `pack` and `list`: one cell over many. `unpack` goes the other way.
//!
//! The packed cell computes its value as a snapshot of every field, and
//! re-snapshots whenever any field notifies. Since derived fields are read
//! fresh, a diamond (one source feeding two packed fields) settles in a
//! single notification: the second field's update finds the snapshot
//! already current and is dropped as a no-op.

use std::collections::BTreeMap;
use std::rc::Rc;

use super::node::Node;
use super::var::{Value, Var};
use crate::lens::WithField;

/// A cell that can take part in a pack.
///
/// `Var` fields receive writes when a bidirectional pack is set; `Value`
/// fields are read-only and are skipped.
pub trait FieldCell: Clone + 'static {
    type Item: Clone + PartialEq + 'static;

    fn cell(&self) -> &Value<Self::Item>;

    fn write(&self, value: Self::Item);
}

impl<T: Clone + PartialEq + 'static> FieldCell for Var<T> {
    type Item = T;

    fn cell(&self) -> &Value<T> {
        self
    }

    fn write(&self, value: T) {
        self.set(value)
    }
}

impl<T: Clone + PartialEq + 'static> FieldCell for Value<T> {
    type Item = T;

    fn cell(&self) -> &Value<T> {
        self
    }

    fn write(&self, _value: T) {}
}

/// A record of cells that packs into one cell of `Output`.
///
/// Implemented for tuples of up to six cells, `Vec` and `BTreeMap`. Records
/// of your own implement it by listing their fields.
pub trait Fields: 'static {
    type Output: Clone + PartialEq + 'static;

    /// Current value of every field.
    fn snapshot(&self) -> Self::Output;

    /// Subscribe `out` to every field; `changed` runs on each notification.
    fn link(&self, out: &Var<Self::Output>, changed: &Rc<dyn Fn(&Var<Self::Output>)>);

    /// Write each part of `value` into its field.
    fn fan_out(&self, value: &Self::Output);
}

fn link_one<O, C>(out: &Var<O>, field: &C, changed: &Rc<dyn Fn(&Var<O>)>)
where
    O: Clone + 'static,
    C: FieldCell,
{
    let changed = changed.clone();
    let _ = out.listen_to_value(field.cell(), move |out, _, _| changed(out), false);
}

macro_rules! impl_fields_for_tuple {
    ($($name:ident : $ix:tt),+) => {
        impl<$($name: FieldCell),+> Fields for ($($name,)+) {
            type Output = ($($name::Item,)+);

            fn snapshot(&self) -> Self::Output {
                ($(self.$ix.cell().get(),)+)
            }

            fn link(&self, out: &Var<Self::Output>, changed: &Rc<dyn Fn(&Var<Self::Output>)>) {
                $(link_one(out, &self.$ix, changed);)+
            }

            fn fan_out(&self, value: &Self::Output) {
                $(self.$ix.write(value.$ix.clone());)+
            }
        }
    };
}

impl_fields_for_tuple!(A: 0);
impl_fields_for_tuple!(A: 0, B: 1);
impl_fields_for_tuple!(A: 0, B: 1, C: 2);
impl_fields_for_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_fields_for_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_fields_for_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

impl<C: FieldCell> Fields for Vec<C> {
    type Output = Vec<C::Item>;

    fn snapshot(&self) -> Self::Output {
        self.iter().map(|c| c.cell().get()).collect()
    }

    fn link(&self, out: &Var<Self::Output>, changed: &Rc<dyn Fn(&Var<Self::Output>)>) {
        for field in self {
            link_one(out, field, changed);
        }
    }

    fn fan_out(&self, value: &Self::Output) {
        for (field, v) in self.iter().zip(value) {
            field.write(v.clone());
        }
    }
}

impl<K, C> Fields for BTreeMap<K, C>
where
    K: Ord + Clone + 'static,
    C: FieldCell,
{
    type Output = BTreeMap<K, C::Item>;

    fn snapshot(&self) -> Self::Output {
        self.iter().map(|(k, c)| (k.clone(), c.cell().get())).collect()
    }

    fn link(&self, out: &Var<Self::Output>, changed: &Rc<dyn Fn(&Var<Self::Output>)>) {
        for field in self.values() {
            link_one(out, field, changed);
        }
    }

    fn fan_out(&self, value: &Self::Output) {
        for (k, field) in self {
            if let Some(v) = value.get(k) {
                field.write(v.clone());
            }
        }
    }
}

impl<T: Clone + PartialEq + 'static> Var<T> {
    /// Combine a record of cells into one cell of their values.
    ///
    /// With `bidirectional`, writing the packed cell writes every `Var` field.
    pub fn pack<F: Fields<Output = T>>(fields: F, bidirectional: bool) -> Var<T> {
        let fields = Rc::new(fields);
        let snap = fields.clone();
        let node = Node::computed(
            fields.snapshot(),
            Rc::new(|a: &T, b: &T| a == b),
            move || snap.snapshot(),
        );
        let out = Var::from_node(node);

        let snap = fields.clone();
        let changed: Rc<dyn Fn(&Var<T>)> = Rc::new(move |out: &Var<T>| out.set(snap.snapshot()));
        fields.link(&out, &changed);

        if bidirectional {
            let _ = out.listen_up(move |t, _| fields.fan_out(t));
        }
        out
    }
}

impl<T: Clone + PartialEq + 'static> Var<Vec<T>> {
    /// [`Var::pack`] over an ordered sequence of cells.
    pub fn list<C: FieldCell<Item = T>>(cells: Vec<C>, bidirectional: bool) -> Var<Vec<T>> {
        Var::pack(cells, bidirectional)
    }
}

// =============================================================================
// UNPACK
// =============================================================================

/// A value that splits into one writable cell per field.
pub trait Unpack: Clone + PartialEq + 'static {
    type Cells;

    fn unpack(cell: &Var<Self>) -> Self::Cells;
}

macro_rules! impl_unpack_for_tuple {
    ($($name:ident : $ix:tt),+) => {
        impl<$($name: Clone + PartialEq + 'static),+> Unpack for ($($name,)+) {
            type Cells = ($(Var<$name>,)+);

            fn unpack(cell: &Var<Self>) -> Self::Cells {
                ($(cell.zoom(
                    |t: &Self| t.$ix.clone(),
                    |v: $name, t: &Self| {
                        let mut next = t.clone();
                        next.$ix = v;
                        next
                    },
                ),)+)
            }
        }
    };
}

impl_unpack_for_tuple!(A: 0, B: 1);
impl_unpack_for_tuple!(A: 0, B: 1, C: 2);
impl_unpack_for_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_unpack_for_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_unpack_for_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

impl<T: Unpack> Var<T> {
    /// One cell per tuple field. Each follows its field and writes back
    /// into this cell.
    pub fn unpack(&self) -> T::Cells {
        T::unpack(self)
    }
}

impl<T: Clone + PartialEq + 'static> Var<T> {
    /// One cell per key of a record, in the order given.
    pub fn unpack_fields<K, const N: usize>(&self, keys: [K; N]) -> [Var<T::Field>; N]
    where
        K: Clone + 'static,
        T: WithField<K>,
        T::Field: PartialEq,
    {
        keys.map(|key| self.prop(key))
    }
}
