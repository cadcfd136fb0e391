//! Constraint Module - Geometric constraints for drag and resize
//!
//! A [`Constraint`] looks at a candidate rectangle and the edges being
//! dragged, and answers one of three ways:
//!
//! - `None` - the candidate is fine as it is
//! - `Some(vec![])` - the candidate is invalid and cannot be repaired
//! - `Some(repairs)` - acceptable alternatives, best judged by the caller
//!
//! Primitives (`fixed`, `snap`, `grid`, `bounded`, `inside`, ...) each
//! enforce one rule. Combinators join them: [`compose`] chains, [`one_of`]
//! accepts any, [`rubber`] softens, and [`solver`] searches for the least
//! disturbing rectangle that satisfies every constraint at once.
//!
//! # Example
//!
//! ```ignore
//! use spark_ui_core::constraint::{bounded, inside, run, solver};
//! use spark_ui_core::types::{range, Direction, Rect};
//!
//! let area = Rect::new(0.0, 0.0, 200.0, 200.0);
//! let c = solver(vec![inside(area), bounded(range(50.0, 100.0), range(50.0, 100.0))]);
//! let placed = run(&c, &origin, &candidate, Direction::empty());
//! ```

mod combinators;
mod primitives;

pub use combinators::{compose, lazy, one_of, rubber, solver, solver_with, SolverConfig};
pub use primitives::{bounded, fixed, free, grid, hline, inside, none, outside, snap};

use std::fmt;
use std::rc::Rc;

use crate::types::{Direction, Rect};

/// A rule over candidate rectangles. Cheap to clone.
#[derive(Clone)]
pub struct Constraint {
    check: Rc<dyn Fn(&Rect, Direction) -> Option<Vec<Rect>>>,
}

impl Constraint {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Rect, Direction) -> Option<Vec<Rect>> + 'static,
    {
        Self {
            check: Rc::new(check),
        }
    }

    /// Judge `to` while the edges in `dir` are being dragged.
    pub fn check(&self, to: &Rect, dir: Direction) -> Option<Vec<Rect>> {
        (self.check)(to, dir)
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Constraint")
    }
}

impl Default for Constraint {
    fn default() -> Self {
        free()
    }
}

/// Resolve `to` against `constraint`: unchanged if accepted, `origin` if
/// rejected outright, otherwise the first repair.
pub fn run(constraint: &Constraint, origin: &Rect, to: &Rect, dir: Direction) -> Rect {
    match constraint.check(to, dir) {
        None => *to,
        Some(repairs) => repairs.first().copied().unwrap_or(*origin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_outcomes() {
        let origin = Rect::new(0.0, 0.0, 1.0, 1.0);
        let to = Rect::new(5.0, 5.0, 6.0, 6.0);

        assert_eq!(run(&free(), &origin, &to, Direction::empty()), to);
        assert_eq!(run(&none(), &origin, &to, Direction::empty()), origin);

        let fix = Rect::new(9.0, 9.0, 10.0, 10.0);
        let c = Constraint::new(move |_, _| Some(vec![fix, origin]));
        assert_eq!(run(&c, &origin, &to, Direction::empty()), fix);
    }
}
