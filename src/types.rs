//! Core geometry types for spark-ui-core.
//!
//! These are the plain value records that cross the boundary between the
//! reactive core and the widgets built on top of it. They are immutable:
//! every "mutation" returns a new value, which is what lets cells detect
//! no-op writes by equality.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Absolute tolerance used when comparing coordinates for equality.
pub const EPSILON: f64 = 1e-9;

#[inline]
pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}

// =============================================================================
// Point
// =============================================================================

/// A 2D point (or delta) in screen units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    /// Check if the point lies inside `r` (edges inclusive).
    pub fn inside_of(self, r: &Rect) -> bool {
        self.x >= r.left && self.x <= r.right && self.y >= r.top && self.y <= r.bottom
    }

    /// Equality within [`EPSILON`].
    pub fn approx_eq(self, other: Point) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }

    /// Point on a circle of radius `r` at `deg` degrees (y grows downwards).
    pub fn at_angle(deg: f64, r: f64) -> Point {
        let rad = deg.to_radians();
        Point::new(r * rad.cos(), -r * rad.sin())
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Shorthand constructor.
pub const fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// The two coordinates of a point, used as structural-update keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

// =============================================================================
// Range
// =============================================================================

/// A closed numeric interval. Always normalized so that `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub from: f64,
    pub to: f64,
}

impl Range {
    /// Create a range; the bounds are swapped if given in reverse.
    pub fn new(from: f64, to: f64) -> Self {
        Self {
            from: from.min(to),
            to: from.max(to),
        }
    }

    /// Everything up to `n`.
    pub fn up_to(n: f64) -> Self {
        Self::new(f64::NEG_INFINITY, n)
    }

    /// Everything from `n` on.
    pub fn starting_at(n: f64) -> Self {
        Self::new(n, f64::INFINITY)
    }

    /// The whole number line.
    pub fn everything() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    pub fn delta(&self) -> f64 {
        self.to - self.from
    }

    pub fn clamp(&self, n: f64) -> f64 {
        self.from.max(n.min(self.to))
    }

    pub fn within(&self, n: f64) -> bool {
        n >= self.from && n <= self.to
    }

    /// Linear interpolation: 0 maps to `from`, 1 maps to `to`.
    pub fn lerp(&self, t: f64) -> f64 {
        self.from + self.delta() * t
    }

    /// Inverse of [`Range::lerp`].
    pub fn at(&self, n: f64) -> f64 {
        (n - self.from) / self.delta()
    }

    /// Map `n` from this range into `to`.
    pub fn remap(&self, to: &Range, n: f64) -> f64 {
        to.lerp(self.at(n))
    }
}

/// Shorthand constructor.
pub fn range(from: f64, to: f64) -> Range {
    Range::new(from, to)
}

// =============================================================================
// Rect
// =============================================================================

/// An edge-based rectangle. `left <= right` is NOT required; use
/// [`Rect::normalized`] when it matters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// The four edges of a rectangle, used as structural-update keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

impl Rect {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build from a top-left corner and a size.
    pub fn from_size(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Area; negative for inverted rects.
    pub fn surface(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn centroid(&self) -> Point {
        pt((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    pub fn normalized(&self) -> Rect {
        Rect::new(
            self.left.min(self.right),
            self.top.min(self.bottom),
            self.left.max(self.right),
            self.top.max(self.bottom),
        )
    }

    pub fn set_left(&self, left: f64) -> Rect {
        Rect { left, ..*self }
    }

    pub fn set_top(&self, top: f64) -> Rect {
        Rect { top, ..*self }
    }

    pub fn set_right(&self, right: f64) -> Rect {
        Rect { right, ..*self }
    }

    pub fn set_bottom(&self, bottom: f64) -> Rect {
        Rect { bottom, ..*self }
    }

    /// Same size, top-left corner moved to `at`.
    pub fn place(&self, at: Point) -> Rect {
        Rect::from_size(at.x, at.y, self.width(), self.height())
    }

    /// Translate by `delta`.
    pub fn moved(&self, delta: Point) -> Rect {
        Rect::new(
            self.left + delta.x,
            self.top + delta.y,
            self.right + delta.x,
            self.bottom + delta.y,
        )
    }

    pub fn horizontal(&self) -> Range {
        range(self.left, self.right)
    }

    pub fn vertical(&self) -> Range {
        range(self.top, self.bottom)
    }

    /// Check if `b` lies entirely inside this rect (edges inclusive).
    pub fn contains(&self, b: &Rect) -> bool {
        let hor = self.horizontal();
        let ver = self.vertical();
        hor.within(b.left) && hor.within(b.right) && ver.within(b.top) && ver.within(b.bottom)
    }

    /// Overlapping area, or `None` when the overlap has no positive area.
    pub fn intersect(&self, b: &Rect) -> Option<Rect> {
        let c = self.clip(b);
        if c.width() <= 0.0 || c.height() <= 0.0 {
            None
        } else {
            Some(c)
        }
    }

    /// Clip to `c` without checking for an empty result.
    pub fn clip(&self, c: &Rect) -> Rect {
        Rect::new(
            self.left.max(c.left),
            self.top.max(c.top),
            self.right.min(c.right),
            self.bottom.min(c.bottom),
        )
    }

    /// Grow (or shrink, for negative `m`) on every side.
    pub fn margin(&self, m: f64) -> Rect {
        Rect::new(self.left - m, self.top - m, self.right + m, self.bottom + m)
    }

    pub fn top_left(&self) -> Point {
        pt(self.left, self.top)
    }

    pub fn top_right(&self) -> Point {
        pt(self.right, self.top)
    }

    pub fn bottom_left(&self) -> Point {
        pt(self.left, self.bottom)
    }

    pub fn bottom_right(&self) -> Point {
        pt(self.right, self.bottom)
    }

    /// Same vertical extent, placed flush against the left edge of `g`.
    pub fn at_left(&self, g: &Rect) -> Rect {
        Rect::new(g.left - self.width(), self.top, g.left, self.bottom)
    }

    pub fn at_top(&self, g: &Rect) -> Rect {
        Rect::new(self.left, g.top - self.height(), self.right, g.top)
    }

    pub fn at_right(&self, g: &Rect) -> Rect {
        Rect::new(g.right, self.top, g.right + self.width(), self.bottom)
    }

    pub fn at_bottom(&self, g: &Rect) -> Rect {
        Rect::new(self.left, g.bottom, self.right, g.bottom + self.height())
    }

    /// The four placements adjacent to `a`: left, top, right, bottom.
    pub fn around(&self, a: &Rect) -> Vec<Rect> {
        vec![self.at_left(a), self.at_top(a), self.at_right(a), self.at_bottom(a)]
    }

    /// Average distance between corresponding corners. Lower is more similar.
    pub fn similarity(&self, b: &Rect) -> f64 {
        let d0 = self.top_left().distance(b.top_left());
        let d1 = self.top_right().distance(b.top_right());
        let d2 = self.bottom_left().distance(b.bottom_left());
        let d3 = self.bottom_right().distance(b.bottom_right());
        (d0 + d1 + d2 + d3) / 4.0
    }

    /// Per-edge difference `b - self`.
    pub fn diff(&self, b: &Rect) -> Rect {
        Rect::new(
            b.left - self.left,
            b.top - self.top,
            b.right - self.right,
            b.bottom - self.bottom,
        )
    }

    pub fn edge(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left,
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
        }
    }

    pub fn with_edge(&self, side: Side, value: f64) -> Rect {
        match side {
            Side::Left => self.set_left(value),
            Side::Top => self.set_top(value),
            Side::Right => self.set_right(value),
            Side::Bottom => self.set_bottom(value),
        }
    }
}

/// Shorthand constructor.
pub const fn rect(left: f64, top: f64, right: f64, bottom: f64) -> Rect {
    Rect::new(left, top, right, bottom)
}

// =============================================================================
// Direction (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// The set of rectangle edges actively being manipulated.
    ///
    /// Empty during a move, one or two edges during a resize.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Direction: u8 {
        const LEFT = 1 << 0;
        const TOP = 1 << 1;
        const RIGHT = 1 << 2;
        const BOTTOM = 1 << 3;

        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
        const ALL = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

impl Direction {
    pub fn left(self) -> bool {
        self.contains(Direction::LEFT)
    }

    pub fn top(self) -> bool {
        self.contains(Direction::TOP)
    }

    pub fn right(self) -> bool {
        self.contains(Direction::RIGHT)
    }

    pub fn bottom(self) -> bool {
        self.contains(Direction::BOTTOM)
    }
}

/// True if any edge is active.
pub fn any_direction(d: Direction) -> bool {
    !d.is_empty()
}

/// True if no edge is active.
pub fn no_direction(d: Direction) -> bool {
    d.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_normalizes() {
        let r = range(10.0, 2.0);
        assert_eq!(r.from, 2.0);
        assert_eq!(r.to, 10.0);
        assert_eq!(r.clamp(20.0), 10.0);
        assert_eq!(r.clamp(-5.0), 2.0);
        assert!(r.within(2.0));
        assert!(!r.within(10.5));
    }

    #[test]
    fn test_range_remap() {
        let a = range(0.0, 10.0);
        let b = range(100.0, 200.0);
        assert_eq!(a.remap(&b, 5.0), 150.0);
    }

    #[test]
    fn test_rect_basics() {
        let r = rect(0.0, 0.0, 10.0, 20.0);
        assert_eq!(r.width(), 10.0);
        assert_eq!(r.height(), 20.0);
        assert_eq!(r.centroid(), pt(5.0, 10.0));
        assert_eq!(r.moved(pt(1.0, 2.0)), rect(1.0, 2.0, 11.0, 22.0));
        assert_eq!(r.place(pt(5.0, 5.0)), rect(5.0, 5.0, 15.0, 25.0));
    }

    #[test]
    fn test_rect_normalized() {
        let r = rect(10.0, 20.0, 0.0, 0.0);
        assert_eq!(r.normalized(), rect(0.0, 0.0, 10.0, 20.0));
    }

    #[test]
    fn test_intersect() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 15.0, 15.0);
        assert_eq!(a.intersect(&b), Some(rect(5.0, 5.0, 10.0, 10.0)));

        // Touching edges have no area
        let c = rect(10.0, 0.0, 20.0, 10.0);
        assert_eq!(a.intersect(&c), None);
    }

    #[test]
    fn test_contains() {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains(&rect(0.0, 0.0, 100.0, 100.0)));
        assert!(outer.contains(&rect(10.0, 10.0, 20.0, 20.0)));
        assert!(!outer.contains(&rect(90.0, 90.0, 110.0, 100.0)));
    }

    #[test]
    fn test_around() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        let zone = rect(20.0, 20.0, 40.0, 40.0);
        let placements = r.around(&zone);
        assert_eq!(placements[0], rect(10.0, 0.0, 20.0, 10.0));
        assert_eq!(placements[1], rect(0.0, 10.0, 10.0, 20.0));
        assert_eq!(placements[2], rect(40.0, 0.0, 50.0, 10.0));
        assert_eq!(placements[3], rect(0.0, 40.0, 10.0, 50.0));
    }

    #[test]
    fn test_similarity() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.similarity(&a), 0.0);
        assert_eq!(a.similarity(&a.moved(pt(3.0, 4.0))), 5.0);
    }

    #[test]
    fn test_direction_flags() {
        let d = Direction::LEFT | Direction::BOTTOM;
        assert!(d.left());
        assert!(d.bottom());
        assert!(!d.right());
        assert!(any_direction(d));
        assert!(no_direction(Direction::empty()));
        assert_eq!(Direction::ALL, Direction::HORIZONTAL | Direction::VERTICAL);
    }
}
