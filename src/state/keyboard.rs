//! Keyboard Module - Keyboard event state and handler registry
//!
//! Document-wide keyboard handlers. Widgets subscribe while they need keys
//! (a drag session listens for Escape) and release the subscription after.
//! Does NOT own stdin (that is the input module).
//!
//! # API
//!
//! - `last_event` - Get last keyboard event
//! - `on(handler)` - Subscribe to all keyboard events
//! - `on_key(key, fn)` - Subscribe to specific key(s)
//! - `dispatch(event)` - Route an event to the handlers
//!
//! # Example
//!
//! ```ignore
//! use spark_ui_core::state::keyboard;
//!
//! // Subscribe to all keyboard events
//! let cleanup = keyboard::on(|event| {
//!     if event.code == "Escape" {
//!         event.prevent_default();
//!     }
//!     false // Don't consume
//! });
//!
//! // Subscribe to specific key
//! let cleanup = keyboard::on_key("Enter", || {
//!     println!("Enter pressed!");
//!     true // Consume event
//! });
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::cell::Var;

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The logical key (e.g., "a", "Enter", "Escape")
    pub key: String,
    /// The physical key (e.g., "KeyA", "Enter", "Escape")
    pub code: String,
    /// Modifier keys state
    pub modifiers: Modifiers,
    /// Press/repeat/release state
    pub state: KeyState,
    default_prevented: Cell<bool>,
}

impl KeyboardEvent {
    /// Create a simple key press event. `code` is derived from `key`.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let code = code_for_key(&key);
        Self {
            key,
            code,
            modifiers: Modifiers::default(),
            state: KeyState::Press,
            default_prevented: Cell::new(false),
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            ..Self::new(key)
        }
    }

    /// Override the physical key code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Ask the host to skip its default handling of this key.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Physical code for a logical key, the way browsers name them.
pub fn code_for_key(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => format!("Key{}", c.to_ascii_uppercase()),
        (Some(c), None) if c.is_ascii_digit() => format!("Digit{c}"),
        (Some(' '), None) => "Space".to_string(),
        _ => key.to_string(),
    }
}

/// Handler for keyboard events. Return true to consume the event.
pub type KeyHandler = Rc<dyn Fn(&KeyboardEvent) -> bool>;

/// Handler for specific key. Return true to consume the event.
pub type KeySpecificHandler = Rc<dyn Fn() -> bool>;

// =============================================================================
// STATE
// =============================================================================

thread_local! {
    static LAST_EVENT: Var<Option<KeyboardEvent>> = Var::new(None);
}

/// Get the last keyboard event
pub fn last_event() -> Option<KeyboardEvent> {
    LAST_EVENT.with(|s| s.get())
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

struct HandlerRegistry {
    global_handlers: Vec<(usize, KeyHandler)>,
    key_handlers: HashMap<String, Vec<(usize, KeySpecificHandler)>>,
    next_id: usize,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            global_handlers: Vec::new(),
            key_handlers: HashMap::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::new());
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Dispatch a keyboard event to all registered handlers.
/// Returns true if any handler consumed the event or prevented its default.
///
/// Handlers may subscribe or unsubscribe while the event is dispatched;
/// the change takes effect from the next event.
pub fn dispatch(event: KeyboardEvent) -> bool {
    // Always update reactive state
    LAST_EVENT.with(|s| s.set(Some(event.clone())));

    // Only dispatch press events to handlers
    if event.state != KeyState::Press {
        return false;
    }

    let consumed = dispatch_to_handlers(&event);
    consumed || event.default_prevented()
}

/// Dispatch to key-specific and global handlers.
/// Returns true if any handler consumed the event.
pub fn dispatch_to_handlers(event: &KeyboardEvent) -> bool {
    let (specific, global) = REGISTRY.with(|reg| {
        let reg = reg.borrow();
        let specific: Vec<KeySpecificHandler> = reg
            .key_handlers
            .get(&event.key)
            .map(|hs| hs.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();
        let global: Vec<KeyHandler> = reg.global_handlers.iter().map(|(_, h)| h.clone()).collect();
        (specific, global)
    });

    // Key-specific handlers first
    if specific.iter().any(|handler| handler()) {
        return true;
    }
    global.iter().any(|handler| handler(event))
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe to all keyboard events.
/// Return true from handler to consume the event.
/// Returns cleanup function.
pub fn on<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.global_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            reg.global_handlers.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Subscribe to specific key(s).
/// Handler receives no arguments - check last_event if needed.
/// Return true to consume the event.
/// Returns cleanup function.
pub fn on_key<F>(key: &str, handler: F) -> impl FnOnce()
where
    F: Fn() -> bool + 'static,
{
    let key = key.to_string();
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.key_handlers
            .entry(key.clone())
            .or_default()
            .push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(handlers) = reg.key_handlers.get_mut(&key) {
                handlers.retain(|(handler_id, _)| *handler_id != id);
                if handlers.is_empty() {
                    reg.key_handlers.remove(&key);
                }
            }
        });
    }
}

/// Number of live global handlers.
pub fn handler_count() -> usize {
    REGISTRY.with(|reg| reg.borrow().global_handlers.len())
}

/// Clear all state and handlers.
pub fn cleanup() {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.global_handlers.clear();
        reg.key_handlers.clear();
    });
    LAST_EVENT.with(|s| s.set(None));
}

/// Reset keyboard state (for testing)
pub fn reset_keyboard_state() {
    cleanup();
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.next_id = 0;
    });
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() {
        reset_keyboard_state();
    }

    #[test]
    fn test_initial_state() {
        setup();
        assert!(last_event().is_none());
    }

    #[test]
    fn test_dispatch_updates_state() {
        setup();

        dispatch(KeyboardEvent::new("a"));
        assert_eq!(last_event().map(|e| e.key).as_deref(), Some("a"));

        dispatch(KeyboardEvent::new("Enter"));
        assert_eq!(last_event().map(|e| e.code).as_deref(), Some("Enter"));
    }

    #[test]
    fn test_codes() {
        assert_eq!(KeyboardEvent::new("a").code, "KeyA");
        assert_eq!(KeyboardEvent::new("7").code, "Digit7");
        assert_eq!(KeyboardEvent::new("Escape").code, "Escape");
        assert_eq!(KeyboardEvent::new("q").with_code("KeyA").code, "KeyA");
    }

    #[test]
    fn test_global_handler() {
        setup();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        let cleanup = on(move |_event| {
            count_clone.set(count_clone.get() + 1);
            false
        });

        dispatch(KeyboardEvent::new("a"));
        assert_eq!(count.get(), 1);

        dispatch(KeyboardEvent::new("b"));
        assert_eq!(count.get(), 2);

        cleanup();

        dispatch(KeyboardEvent::new("c"));
        assert_eq!(count.get(), 2); // No more increments
    }

    #[test]
    fn test_key_specific_handler() {
        setup();

        let enter_count = Rc::new(Cell::new(0));
        let enter_clone = enter_count.clone();

        let cleanup = on_key("Enter", move || {
            enter_clone.set(enter_clone.get() + 1);
            true
        });

        dispatch(KeyboardEvent::new("a"));
        assert_eq!(enter_count.get(), 0);

        assert!(dispatch(KeyboardEvent::new("Enter")));
        assert_eq!(enter_count.get(), 1);

        cleanup();
        assert!(!dispatch(KeyboardEvent::new("Enter")));
    }

    #[test]
    fn test_prevent_default_counts_as_handled() {
        setup();
        let _cleanup = on(|event| {
            event.prevent_default();
            false
        });
        assert!(dispatch(KeyboardEvent::new("Escape")));
    }

    #[test]
    fn test_release_not_dispatched() {
        setup();
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let _cleanup = on(move |_| {
            count_clone.set(count_clone.get() + 1);
            false
        });

        let mut event = KeyboardEvent::new("a");
        event.state = KeyState::Release;
        dispatch(event);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_handler_may_unsubscribe_during_dispatch() {
        setup();
        let slot: Rc<RefCell<Option<Box<dyn FnOnce()>>>> = Rc::new(RefCell::new(None));
        let slot_clone = slot.clone();
        let cleanup = on(move |_| {
            if let Some(off) = slot_clone.borrow_mut().take() {
                off();
            }
            false
        });
        *slot.borrow_mut() = Some(Box::new(cleanup));

        dispatch(KeyboardEvent::new("a"));
        assert_eq!(handler_count(), 0);
    }
}
