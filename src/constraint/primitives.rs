//! Single-rule constraints.

use super::Constraint;
use crate::types::{any_direction, approx_eq, range, Point, Range, Rect};

/// Accepts everything.
pub fn free() -> Constraint {
    Constraint::new(|_, _| None)
}

/// Rejects everything.
pub fn none() -> Constraint {
    Constraint::new(|_, _| Some(Vec::new()))
}

fn centered_on(r: &Rect, p: Point) -> Rect {
    let hw = r.width() / 2.0;
    let hh = r.height() / 2.0;
    Rect::new(p.x - hw, p.y - hh, p.x + hw, p.y + hh)
}

/// Keeps the centroid on `p`.
pub fn fixed(p: Point) -> Constraint {
    Constraint::new(move |r, _| {
        if r.centroid().approx_eq(p) {
            None
        } else {
            Some(vec![centered_on(r, p)])
        }
    })
}

/// Pulls the centroid onto `p` once it comes within `radius`.
pub fn snap(p: Point, radius: f64) -> Constraint {
    let pin = fixed(p);
    Constraint::new(move |r, d| {
        if r.centroid().distance(p) > radius {
            None
        } else {
            pin.check(r, d)
        }
    })
}

/// Keeps the centroid on the horizontal segment from `p` to `p + (width, 0)`.
pub fn hline(p: Point, width: f64) -> Constraint {
    let segment = range(p.x, p.x + width);
    Constraint::new(move |r, _| {
        let m = r.centroid();
        if segment.within(m.x) && approx_eq(m.y, p.y) {
            return None;
        }
        Some(vec![centered_on(r, Point::new(segment.clamp(m.x), p.y))])
    })
}

/// Rounds every edge to a multiple of `n`. An edge within [`EPSILON`] of
/// a multiple already counts as aligned.
///
/// [`EPSILON`]: crate::types::EPSILON
pub fn grid(n: f64) -> Constraint {
    Constraint::new(move |g, _| {
        let snap = |e: f64| (e / n).round() * n;
        let aligned = [g.left, g.top, g.right, g.bottom]
            .iter()
            .all(|&e| approx_eq(snap(e), e));
        if aligned {
            return None;
        }
        Some(vec![Rect::new(
            snap(g.left),
            snap(g.top),
            snap(g.right),
            snap(g.bottom),
        )])
    })
}

/// Keeps width within `w` and height within `h`. The edges opposite the
/// dragged ones stay put.
pub fn bounded(w: Range, h: Range) -> Constraint {
    Constraint::new(move |r, d| {
        if w.within(r.width()) && h.within(r.height()) {
            return None;
        }
        let width = w.clamp(r.width());
        let height = h.clamp(r.height());
        Some(vec![Rect::new(
            if d.right() { r.left } else { r.right - width },
            if d.bottom() { r.top } else { r.bottom - height },
            if d.left() { r.right } else { r.left + width },
            if d.top() { r.bottom } else { r.top + height },
        )])
    })
}

/// Keeps the rect within `b`. A resize clamps the dragged edges; a move
/// slides the whole rect back in, or rejects it if it cannot fit.
pub fn inside(b: Rect) -> Constraint {
    Constraint::new(move |r, d| {
        if b.contains(r) {
            return None;
        }

        if any_direction(d) {
            return Some(vec![Rect::new(
                if d.left() { r.left.max(b.left) } else { r.left },
                if d.top() { r.top.max(b.top) } else { r.top },
                if d.right() { r.right.min(b.right) } else { r.right },
                if d.bottom() { r.bottom.min(b.bottom) } else { r.bottom },
            )]);
        }

        if r.width() > b.width() || r.height() > b.height() {
            return Some(Vec::new());
        }

        Some(vec![r.place(Point::new(
            range(b.left, b.right - r.width()).clamp(r.left),
            range(b.top, b.bottom - r.height()).clamp(r.top),
        ))])
    })
}

/// Keeps the rect clear of `b`. A resize pulls back each dragged edge; a
/// move offers the four placements flush against `b`.
pub fn outside(b: Rect) -> Constraint {
    Constraint::new(move |r, d| {
        r.intersect(&b)?;

        if any_direction(d) {
            let options = [
                d.left().then(|| r.set_left(r.left.max(b.right))),
                d.top().then(|| r.set_top(r.top.max(b.bottom))),
                d.right().then(|| r.set_right(r.right.min(b.left))),
                d.bottom().then(|| r.set_bottom(r.bottom.min(b.top))),
            ];
            return Some(
                options
                    .into_iter()
                    .flatten()
                    .filter(|o| o.surface() > 0.0)
                    .collect(),
            );
        }

        Some(r.around(&b))
    })
}
