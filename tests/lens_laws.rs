//! Lens laws over generated values.

use std::collections::BTreeMap;

use proptest::prelude::*;
use spark_ui_core::lens::{pack_l, Iso, Lens};
use spark_ui_core::types::{Axis, Point, Rect, Side};

fn coord() -> impl Strategy<Value = f64> {
    -1000.0..1000.0f64
}

prop_compose! {
    fn any_rect()(left in coord(), top in coord(), w in 0.0..500.0f64, h in 0.0..500.0f64) -> Rect {
        Rect::from_size(left, top, w, h)
    }
}

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![
        Just(Side::Left),
        Just(Side::Top),
        Just(Side::Right),
        Just(Side::Bottom),
    ]
}

proptest! {
    #[test]
    fn rect_field_set_get(r in any_rect(), s in side(), v in coord()) {
        let l = Lens::<Rect, Rect>::field(s);
        // Putting back what was read changes nothing
        prop_assert_eq!(l.set(&r, l.get(&r)), r);
        // Reading back what was put returns it
        prop_assert_eq!(l.get(&l.set(&r, v)), v);
    }

    #[test]
    fn point_field_round_trip(x in coord(), y in coord(), v in coord()) {
        let p = Point::new(x, y);
        for axis in [Axis::X, Axis::Y] {
            let l = Lens::<Point, Point>::field(axis);
            prop_assert_eq!(l.set(&p, l.get(&p)), p);
            prop_assert_eq!(l.get(&l.set(&p, v)), v);
        }
    }

    #[test]
    fn sequence_index_round_trip(xs in prop::collection::vec(any::<i32>(), 0..8), ix in 0usize..10) {
        let l = Lens::<Vec<i32>, Vec<i32>>::id().at(ix);
        prop_assert_eq!(l.set(&xs, l.get(&xs)), xs.clone());
        prop_assert_eq!(l.get(&xs), xs.get(ix).copied());
    }

    #[test]
    fn map_key_round_trip(
        m in prop::collection::btree_map(0u8..16, any::<i32>(), 0..8),
        key in 0u8..16,
        v in any::<i32>(),
    ) {
        let l = Lens::<BTreeMap<u8, i32>, BTreeMap<u8, i32>>::field(key);
        prop_assert_eq!(l.set(&m, l.get(&m)), m.clone());
        prop_assert_eq!(l.get(&l.set(&m, Some(v))), Some(v));
        prop_assert_eq!(l.get(&l.set(&m, None)), None);
    }

    #[test]
    fn packed_lens_round_trip(r in any_rect(), a in coord(), b in coord()) {
        let corner = pack_l((
            Lens::<Rect, Rect>::field(Side::Right),
            Lens::<Rect, Rect>::field(Side::Bottom),
        ));
        prop_assert_eq!(corner.set(&r, corner.get(&r)), r);
        prop_assert_eq!(corner.get(&corner.set(&r, (a, b))), (a, b));
    }

    #[test]
    fn zoom_through_iso(r in any_rect(), k in 0.5..4.0f64) {
        let scaled = Lens::<Rect, Rect>::field(Side::Left).iso(Iso::scale(k));
        let back = scaled.set(&r, scaled.get(&r));
        prop_assert!((back.left - r.left).abs() < 1e-9 * r.left.abs().max(1.0));
        prop_assert_eq!(back.right, r.right);
    }
}
