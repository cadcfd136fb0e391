//! # spark-ui-core
//!
//! Reactive cells, lenses and constraint-solved dragging for interactive
//! UI widgets.
//!
//! ## Architecture
//!
//! Everything is single-threaded and synchronous. A pointer event flows
//! through the crate like this:
//!
//! ```text
//! pointer event → DragController → candidate Rect → Constraint solver
//!               → resolved Rect → Var<Rect> → zoomed / mapped cells → listeners
//! ```
//!
//! The only deferred work (timing cells and drag cleanup) goes through the
//! [`scheduler`], a virtual clock the host loop drives.
//!
//! ## Modules
//!
//! - [`types`] - Point, Rect, Range, Direction value types
//! - [`cell`] - `Var` / `Value` observable cells and everything derived from them
//! - [`lens`] - Pure lenses, edits and isomorphisms
//! - [`constraint`] - Geometric constraints and the solver
//! - [`drag`] - Drag and resize state machine
//! - [`measure`] - Where things are (fixed, cell-backed or taffy layout)
//! - [`scheduler`] - Timers and animation frames
//! - [`state`] - Pointer, keyboard and selection state, crossterm input

pub mod cell;
pub mod constraint;
pub mod drag;
pub mod lens;
pub mod measure;
pub mod scheduler;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use cell::{lift2, lift3, lift4, Binding, Controlled, Uninstaller, Value, Var};

pub use lens::{pack_l, Edit, Iso, Lens, WithField};

pub use constraint::{
    bounded, compose, fixed, free, grid, hline, inside, lazy, none, one_of, outside, rubber, run,
    snap, solver, solver_with, Constraint, SolverConfig,
};

pub use drag::{DragController, DragKind, DragProps, DragState, MeasureMode, Stage};

pub use measure::{FixedMeasure, LayoutSurface, Measure, MeasureError, TaffyMeasure};

pub use state::{KeyboardEvent, Modifiers, PointerEvent};
