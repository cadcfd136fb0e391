//! Pointer Module - Pointer event state and document-wide handlers
//!
//! State and handler registry for pointer events. A drag session subscribes
//! to moves and releases anywhere on the surface while it runs, then lets go.
//! Does NOT own stdin (that is the input module).
//!
//! # API
//!
//! - `last_event` - Get last pointer event
//! - `is_pointer_down` - Get button state
//! - `dispatch(event)` - Dispatch pointer event
//! - `on_down(fn)` - Global pointer down handler
//! - `on_move(fn)` - Global pointer move handler
//! - `on_up(fn)` - Global pointer up handler
//!
//! # Example
//!
//! ```ignore
//! use spark_ui_core::state::pointer;
//!
//! let cleanup = pointer::on_move(|event| {
//!     println!("Pointer at ({}, {})", event.x, event.y);
//!     false // Don't consume
//! });
//!
//! // Later
//! cleanup();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use super::keyboard::Modifiers;
use crate::cell::Var;
use crate::types::{pt, Point};

// =============================================================================
// TYPES
// =============================================================================

/// Pointer action type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Down,
    Up,
    Move,
}

/// Pointer button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
    #[default]
    None,
}

/// Pointer event in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub button: PointerButton,
    pub x: f64,
    pub y: f64,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(action: PointerAction, button: PointerButton, x: f64, y: f64) -> Self {
        Self {
            action,
            button,
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    /// Create a button press
    pub fn down(button: PointerButton, x: f64, y: f64) -> Self {
        Self::new(PointerAction::Down, button, x, y)
    }

    /// Create a button release
    pub fn up(button: PointerButton, x: f64, y: f64) -> Self {
        Self::new(PointerAction::Up, button, x, y)
    }

    /// Create a move with no button change
    pub fn move_to(x: f64, y: f64) -> Self {
        Self::new(PointerAction::Move, PointerButton::None, x, y)
    }

    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }

    pub fn point(&self) -> Point {
        pt(self.x, self.y)
    }
}

/// Return true to consume the event.
pub type PointerHandler = Rc<dyn Fn(&PointerEvent) -> bool>;

// =============================================================================
// STATE
// =============================================================================

thread_local! {
    static LAST_EVENT: Var<Option<PointerEvent>> = Var::new(None);
    static IS_DOWN: Var<bool> = Var::new(false);
}

/// Get the last pointer event
pub fn last_event() -> Option<PointerEvent> {
    LAST_EVENT.with(|s| s.get())
}

/// Check if a button is held
pub fn is_pointer_down() -> bool {
    IS_DOWN.with(|s| s.get())
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

struct HandlerRegistry {
    down_handlers: Vec<(usize, PointerHandler)>,
    move_handlers: Vec<(usize, PointerHandler)>,
    up_handlers: Vec<(usize, PointerHandler)>,
    next_id: usize,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            down_handlers: Vec::new(),
            move_handlers: Vec::new(),
            up_handlers: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn list_mut(&mut self, action: PointerAction) -> &mut Vec<(usize, PointerHandler)> {
        match action {
            PointerAction::Down => &mut self.down_handlers,
            PointerAction::Move => &mut self.move_handlers,
            PointerAction::Up => &mut self.up_handlers,
        }
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::new());
}

fn register(action: PointerAction, handler: PointerHandler) -> impl FnOnce() {
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.list_mut(action).push((id, handler));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            reg.list_mut(action).retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Dispatch a pointer event to the handlers for its action.
/// Returns true if any handler consumed the event.
///
/// Handlers are snapshotted first, so a handler may subscribe or
/// unsubscribe others mid-dispatch.
pub fn dispatch(event: PointerEvent) -> bool {
    LAST_EVENT.with(|s| s.set(Some(event)));
    match event.action {
        PointerAction::Down => IS_DOWN.with(|s| s.set(true)),
        PointerAction::Up => IS_DOWN.with(|s| s.set(false)),
        PointerAction::Move => {}
    }

    let handlers: Vec<PointerHandler> = REGISTRY.with(|reg| {
        reg.borrow_mut()
            .list_mut(event.action)
            .iter()
            .map(|(_, h)| h.clone())
            .collect()
    });

    handlers.iter().any(|handler| handler(&event))
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe to pointer presses anywhere. Returns cleanup function.
pub fn on_down<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&PointerEvent) -> bool + 'static,
{
    register(PointerAction::Down, Rc::new(handler))
}

/// Subscribe to pointer moves anywhere. Returns cleanup function.
pub fn on_move<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&PointerEvent) -> bool + 'static,
{
    register(PointerAction::Move, Rc::new(handler))
}

/// Subscribe to pointer releases anywhere. Returns cleanup function.
pub fn on_up<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&PointerEvent) -> bool + 'static,
{
    register(PointerAction::Up, Rc::new(handler))
}

/// Number of live handlers for `action`.
pub fn handler_count(action: PointerAction) -> usize {
    REGISTRY.with(|reg| reg.borrow_mut().list_mut(action).len())
}

/// Clear all state and handlers.
pub fn cleanup() {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.down_handlers.clear();
        reg.move_handlers.clear();
        reg.up_handlers.clear();
    });
    LAST_EVENT.with(|s| s.set(None));
    IS_DOWN.with(|s| s.set(false));
}

/// Reset pointer state (for testing)
pub fn reset_pointer_state() {
    cleanup();
    REGISTRY.with(|reg| reg.borrow_mut().next_id = 0);
}

// =============================================================================
// TESTS
// =============================================================================
