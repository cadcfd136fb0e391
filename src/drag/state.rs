//! Drag session record and its field keys.

use serde::{Deserialize, Serialize};

use crate::lens::WithField;
use crate::types::{Direction, Point, Rect};

/// Width of the band inside a target's border that starts a resize.
pub const RESIZE_MARGIN: f64 = 10.0;

/// Where a drag session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Start,
    Update,
    Finish,
    Cancel,
    #[default]
    Idle,
}

impl Stage {
    /// Still following the pointer.
    pub fn is_tracking(self) -> bool {
        matches!(self, Stage::Start | Stage::Update)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragKind {
    #[default]
    Drag,
    Resize,
}

/// An in-progress pointer-driven geometry interaction.
///
/// `delta` is always measured from `origin`, never from the previous move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    /// Geometry when the session began
    pub start: Rect,
    /// Pointer position when the session began
    pub origin: Point,
    pub delta: Point,
    /// Latest resolved geometry
    pub place: Rect,
    pub stage: Stage,
    pub dir: Direction,
    #[serde(rename = "type")]
    pub kind: DragKind,
}

impl DragState {
    /// A fresh session at [`Stage::Start`].
    pub fn begin(start: Rect, origin: Point, dir: Direction, kind: DragKind) -> Self {
        Self {
            start,
            origin,
            delta: Point::ZERO,
            place: start,
            stage: Stage::Start,
            dir,
            kind,
        }
    }

    pub fn with_stage(self, stage: Stage) -> Self {
        Self { stage, ..self }
    }
}

/// Edges of `abs` within [`RESIZE_MARGIN`] of `p`. Empty unless `p` is
/// inside `abs`.
pub fn resize_direction(p: Point, abs: &Rect) -> Direction {
    if !p.inside_of(abs) {
        return Direction::empty();
    }

    let mut dir = Direction::empty();
    dir.set(Direction::LEFT, (abs.left - p.x).abs() <= RESIZE_MARGIN);
    dir.set(Direction::RIGHT, (abs.right - p.x).abs() <= RESIZE_MARGIN);
    dir.set(Direction::TOP, (abs.top - p.y).abs() <= RESIZE_MARGIN);
    dir.set(Direction::BOTTOM, (abs.bottom - p.y).abs() <= RESIZE_MARGIN);
    dir
}

// =============================================================================
// FIELD KEYS
// =============================================================================

macro_rules! drag_fields {
    ($($(#[$doc:meta])* $key:ident => $field:ident : $ty:ty),+ $(,)?) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $key;

            impl WithField<$key> for DragState {
                type Field = $ty;

                fn field(&self, _: &$key) -> $ty {
                    self.$field
                }

                fn with_field(&self, _: &$key, value: $ty) -> Self {
                    Self { $field: value, ..*self }
                }
            }
        )+
    };
}

drag_fields! {
    /// Key for [`DragState::start`]
    StartField => start: Rect,
    /// Key for [`DragState::origin`]
    OriginField => origin: Point,
    /// Key for [`DragState::delta`]
    DeltaField => delta: Point,
    /// Key for [`DragState::place`]
    PlaceField => place: Rect,
    /// Key for [`DragState::stage`]
    StageField => stage: Stage,
    /// Key for [`DragState::dir`]
    DirField => dir: Direction,
    /// Key for [`DragState::kind`]
    KindField => kind: DragKind,
}
