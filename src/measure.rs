//! Measure Module - Turning laid-out elements into rectangles
//!
//! The drag controller never measures anything itself. It asks a [`Measure`]
//! for the target's rectangle in surface coordinates (`absolute`) or relative
//! to its positioned parent (`relative`).
//!
//! [`TaffyMeasure`] reads a node from a [`LayoutSurface`], a taffy tree plus
//! per-node scroll offsets and zoom factors. Absolute rectangles sum the
//! locations of every ancestor, subtract whatever those ancestors have
//! scrolled by, and scale by every zoom on the way up.
//!
//! # Example
//!
//! ```ignore
//! let surface = Rc::new(RefCell::new(LayoutSurface::new()));
//! let node = surface.borrow_mut().tree_mut().new_leaf(style)?;
//! // ... build and compute ...
//! let target: Rc<dyn Measure> = Rc::new(TaffyMeasure::new(surface.clone(), node));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use taffy::{AvailableSpace, NodeId, Size, TaffyError, TaffyTree};

use crate::cell::Value;
use crate::types::{Point, Rect};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    #[error("layout failed: {0}")]
    Layout(#[from] TaffyError),
}

/// Something that can report where it is.
pub trait Measure {
    /// Rectangle in surface coordinates.
    fn absolute(&self) -> Result<Rect, MeasureError>;

    /// Rectangle relative to the positioned parent.
    fn relative(&self) -> Result<Rect, MeasureError> {
        self.absolute()
    }
}

/// A rectangle that never moves. Relative and absolute are the same.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMeasure(pub Rect);

impl Measure for FixedMeasure {
    fn absolute(&self) -> Result<Rect, MeasureError> {
        Ok(self.0)
    }
}

/// A cell is measured by its current value, so a target whose geometry
/// lives in a `Var<Rect>` is always measured where it was last placed.
impl Measure for Value<Rect> {
    fn absolute(&self) -> Result<Rect, MeasureError> {
        Ok(self.get())
    }
}

// =============================================================================
// TAFFY
// =============================================================================

/// A taffy tree with scroll and zoom state.
#[derive(Default)]
pub struct LayoutSurface {
    tree: TaffyTree<()>,
    scroll: HashMap<NodeId, Point>,
    zoom: HashMap<NodeId, f64>,
}

impl LayoutSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> &TaffyTree<()> {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut TaffyTree<()> {
        &mut self.tree
    }

    /// Lay out `root` into a surface of the given size.
    pub fn compute(&mut self, root: NodeId, width: f32, height: f32) -> Result<(), MeasureError> {
        let available = Size {
            width: AvailableSpace::Definite(width),
            height: AvailableSpace::Definite(height),
        };
        self.tree.compute_layout(root, available)?;
        Ok(())
    }

    /// How far `node` has scrolled its content.
    pub fn set_scroll(&mut self, node: NodeId, offset: Point) {
        if offset == Point::ZERO {
            self.scroll.remove(&node);
        } else {
            self.scroll.insert(node, offset);
        }
    }

    pub fn scroll(&self, node: NodeId) -> Point {
        self.scroll.get(&node).copied().unwrap_or_default()
    }

    /// Scale `node` and everything inside it by `factor`.
    pub fn set_zoom(&mut self, node: NodeId, factor: f64) {
        if factor == 1.0 {
            self.zoom.remove(&node);
        } else {
            self.zoom.insert(node, factor);
        }
    }

    pub fn zoom(&self, node: NodeId) -> f64 {
        self.zoom.get(&node).copied().unwrap_or(1.0)
    }

    /// Layout box relative to the parent's border box.
    pub fn relative(&self, node: NodeId) -> Result<Rect, MeasureError> {
        let layout = self.tree.layout(node)?;
        Ok(Rect::from_size(
            f64::from(layout.location.x),
            f64::from(layout.location.y),
            f64::from(layout.size.width),
            f64::from(layout.size.height),
        ))
    }

    /// Layout box in surface coordinates.
    ///
    /// Walking up, the box so far is scaled by each ancestor's zoom before
    /// that ancestor's own location (minus its scroll) is added.
    pub fn absolute(&self, node: NodeId) -> Result<Rect, MeasureError> {
        let mut r = scaled(self.relative(node)?, self.zoom(node));
        let mut cursor = self.tree.parent(node);
        while let Some(ancestor) = cursor {
            let layout = self.tree.layout(ancestor)?;
            let scrolled = self.scroll(ancestor);
            r = scaled(r, self.zoom(ancestor)).moved(Point::new(
                f64::from(layout.location.x) - scrolled.x,
                f64::from(layout.location.y) - scrolled.y,
            ));
            cursor = self.tree.parent(ancestor);
        }
        Ok(r)
    }
}

fn scaled(r: Rect, k: f64) -> Rect {
    Rect::new(r.left * k, r.top * k, r.right * k, r.bottom * k)
}

/// One node of a shared [`LayoutSurface`].
#[derive(Clone)]
pub struct TaffyMeasure {
    surface: Rc<RefCell<LayoutSurface>>,
    node: NodeId,
}

impl TaffyMeasure {
    pub fn new(surface: Rc<RefCell<LayoutSurface>>, node: NodeId) -> Self {
        Self { surface, node }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl Measure for TaffyMeasure {
    fn absolute(&self) -> Result<Rect, MeasureError> {
        self.surface.borrow().absolute(self.node)
    }

    fn relative(&self) -> Result<Rect, MeasureError> {
        self.surface.borrow().relative(self.node)
    }
}

// =============================================================================
// TESTS
// =============================================================================
