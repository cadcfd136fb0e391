//! Drag Module - Pointer-driven move and resize
//!
//! A [`DragController`] follows one press from start to cleanup, resolving
//! every candidate rectangle through a [`Constraint`](crate::constraint::Constraint)
//! picked for the current [`Stage`], and writing the result into an optional
//! geometry cell.
//!
//! # Example
//!
//! ```ignore
//! use spark_ui_core::drag::{DragController, DragProps};
//! use spark_ui_core::measure::FixedMeasure;
//!
//! let geom = Var::new(Rect::new(10.0, 10.0, 60.0, 40.0));
//! let drag = DragController::new(DragProps {
//!     draggable: true,
//!     resizable: true,
//!     target: Some(Rc::new(geom.read_only())),
//!     geom: Some(geom.clone()),
//!     constraint: Some(Rc::new(move |_| inside(area))),
//!     ..Default::default()
//! });
//!
//! drag.pointer_down(pt(30.0, 20.0));
//! // Moves, release and Escape now arrive through state::pointer / state::keyboard
//! ```

mod controller;
mod state;

pub use controller::{ConstraintFn, DragController, DragProps, MeasureMode, StateCallback};
pub use state::{
    resize_direction, DeltaField, DirField, DragKind, DragState, KindField, OriginField, PlaceField,
    Stage, StageField, StartField, RESIZE_MARGIN,
};
