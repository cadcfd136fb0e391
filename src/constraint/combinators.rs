//! Ways to combine constraints.

use super::Constraint;
use crate::types::{Direction, Rect};

/// Bounds for [`solver_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Deepest correction level searched. Levels `0..=max_depth` are
    /// evaluated; constraints that need more rounds of mutual correction
    /// than this are not guaranteed to converge.
    pub max_depth: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { max_depth: 3 }
    }
}

/// [`solver_with`] using the default depth.
pub fn solver(cons: Vec<Constraint>) -> Constraint {
    solver_with(SolverConfig::default(), cons)
}

/// Satisfy every constraint at once.
///
/// Each candidate is checked against all constraints. One that draws no
/// complaint is a leaf; otherwise every suggested repair becomes a candidate
/// at the next level. The leaf closest to the original candidate (by
/// [`Rect::similarity`]) wins. No leaf within the depth bound means reject.
pub fn solver_with(config: SolverConfig, cons: Vec<Constraint>) -> Constraint {
    Constraint::new(move |r, d| {
        let leaves = search(&cons, vec![*r], d, 0, config.max_depth);

        let mut best: Option<(f64, Rect)> = None;
        for leaf in leaves {
            let score = leaf.similarity(r);
            if best.is_none_or(|(s, _)| score < s) {
                best = Some((score, leaf));
            }
        }

        match best {
            Some((_, leaf)) => Some(vec![leaf]),
            None => {
                tracing::trace!(?r, max_depth = config.max_depth, "solver found no acceptable rect");
                Some(Vec::new())
            }
        }
    })
}

fn search(cons: &[Constraint], rs: Vec<Rect>, d: Direction, level: usize, max_depth: usize) -> Vec<Rect> {
    if level > max_depth {
        return Vec::new();
    }
    let mut leaves = Vec::new();
    for r in rs {
        let alts: Vec<Option<Vec<Rect>>> = cons.iter().map(|c| c.check(&r, d)).collect();
        if alts.iter().any(Option::is_some) {
            let next = alts.into_iter().flatten().flatten().collect();
            leaves.extend(search(cons, next, d, level + 1, max_depth));
        } else {
            leaves.push(r);
        }
    }
    leaves
}

/// Accept if any constraint accepts; otherwise offer every suggestion.
pub fn one_of(cons: Vec<Constraint>) -> Constraint {
    Constraint::new(move |g, d| {
        let mut all = Vec::new();
        for c in &cons {
            all.extend(c.check(g, d)?);
        }
        if cons.is_empty() { None } else { Some(all) }
    })
}

/// Apply right to left, each constraint refining the previous output.
/// Accepts only if no constraint in the chain corrected anything.
pub fn compose(cons: Vec<Constraint>) -> Constraint {
    Constraint::new(move |g, d| {
        let mut corrected = false;
        let mut qs = vec![*g];
        for c in cons.iter().rev() {
            qs = qs
                .into_iter()
                .flat_map(|q| match c.check(&q, d) {
                    Some(rs) => {
                        corrected = true;
                        rs
                    }
                    None => vec![q],
                })
                .collect();
        }
        corrected.then_some(qs)
    })
}

/// Elastic version of `c`: the result moves from `c`'s correction back
/// toward the candidate by `|delta|^(1/(1+n))` on each edge in `dir`, so the
/// further the pointer strays the stiffer it gets.
pub fn rubber(c: Constraint, n: f64, dir: Direction) -> Constraint {
    let damp = move |t: f64, q: f64| {
        if q == 0.0 {
            t.round()
        } else {
            (t + q.signum() * q.abs().powf(1.0 / (1.0 + n))).round()
        }
    };
    Constraint::new(move |g, d| {
        let targets = c.check(g, d)?;
        Some(
            targets
                .into_iter()
                .map(|to| {
                    let df = to.diff(g);
                    Rect::new(
                        if dir.left() { damp(to.left, df.left) } else { to.left },
                        if dir.top() { damp(to.top, df.top) } else { to.top },
                        if dir.right() { damp(to.right, df.right) } else { to.right },
                        if dir.bottom() { damp(to.bottom, df.bottom) } else { to.bottom },
                    )
                })
                .collect(),
        )
    })
}

/// Build the constraint on every check.
pub fn lazy<F>(f: F) -> Constraint
where
    F: Fn() -> Constraint + 'static,
{
    Constraint::new(move |g, d| f().check(g, d))
}
