//! Input Module - Event conversion and polling
//!
//! Bridges crossterm's event system with our pointer and keyboard modules.
//! Terminal cells become pointer coordinates one-to-one.
//!
//! # API
//!
//! - `convert_mouse_event` - Convert crossterm MouseEvent to a PointerEvent
//! - `convert_key_event` - Convert crossterm KeyEvent to our KeyboardEvent
//! - `poll_event` - Non-blocking event check with timeout
//! - `read_event` - Blocking event read
//! - `route_event` - Dispatch event to appropriate handler
//! - `enable_mouse` / `disable_mouse` - Control mouse capture
//!
//! # Example
//!
//! ```ignore
//! use spark_ui_core::state::input::{poll_event, route_event};
//! use std::time::Duration;
//!
//! loop {
//!     if let Ok(Some(event)) = poll_event(Duration::from_millis(16)) {
//!         route_event(event);
//!     }
//!     spark_ui_core::scheduler::pump();
//! }
//! ```

use crossterm::event::{
    poll, read, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode,
    KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers,
    MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};
use crossterm::execute;
use std::io::stdout;
use std::time::Duration;

use super::keyboard::{code_for_key, KeyState, KeyboardEvent, Modifiers};
use super::pointer::{PointerAction, PointerButton, PointerEvent};

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Unified event type
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Pointer press, release or move
    Pointer(PointerEvent),
    /// Keyboard event (key press, release, etc.)
    Key(KeyboardEvent),
    /// Terminal resize event (new width, height)
    Resize(u16, u16),
    /// No event or unhandled event type
    None,
}

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Convert a crossterm MouseEvent. Scroll wheel events have no pointer
/// counterpart and yield None.
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> Option<PointerEvent> {
    let (action, button) = match event.kind {
        MouseEventKind::Down(btn) => (PointerAction::Down, convert_mouse_button(btn)),
        MouseEventKind::Up(btn) => (PointerAction::Up, convert_mouse_button(btn)),
        MouseEventKind::Drag(btn) => (PointerAction::Move, convert_mouse_button(btn)),
        MouseEventKind::Moved => (PointerAction::Move, PointerButton::None),
        _ => return None,
    };

    Some(
        PointerEvent::new(action, button, f64::from(event.column), f64::from(event.row))
            .with_modifiers(convert_modifiers(event.modifiers)),
    )
}

fn convert_mouse_button(btn: CrosstermMouseButton) -> PointerButton {
    match btn {
        CrosstermMouseButton::Left => PointerButton::Left,
        CrosstermMouseButton::Right => PointerButton::Right,
        CrosstermMouseButton::Middle => PointerButton::Middle,
    }
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        KeyCode::Insert => "Insert".to_string(),
        _ => String::new(),
    };

    // Shifted letters still come from the same physical key
    let code = match event.code {
        KeyCode::Char(c) => code_for_key(&c.to_ascii_lowercase().to_string()),
        _ => code_for_key(&key),
    };

    let mut out = KeyboardEvent::with_modifiers(key, convert_modifiers(event.modifiers)).with_code(code);
    out.state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };
    out
}

// =============================================================================
// MODIFIER CONVERSION
// =============================================================================

fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::SUPER) || mods.contains(KeyModifiers::META),
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    Ok(match read()? {
        CrosstermEvent::Mouse(mouse) => convert_mouse_event(mouse)
            .map(InputEvent::Pointer)
            .unwrap_or(InputEvent::None),
        CrosstermEvent::Key(key) => InputEvent::Key(convert_key_event(key)),
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    })
}

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Route an event to the appropriate handler.
/// Returns true if any handler consumed the event.
pub fn route_event(event: InputEvent) -> bool {
    match event {
        InputEvent::Pointer(pointer) => super::pointer::dispatch(pointer),
        InputEvent::Key(key) => super::keyboard::dispatch(key),
        InputEvent::Resize(w, h) => {
            tracing::trace!(w, h, "terminal resized");
            false
        }
        InputEvent::None => false,
    }
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CrosstermMouseEvent {
        CrosstermMouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_convert_mouse_down() {
        let event = convert_mouse_event(mouse(MouseEventKind::Down(CrosstermMouseButton::Left), 10, 5)).unwrap();

        assert_eq!(event.action, PointerAction::Down);
        assert_eq!(event.button, PointerButton::Left);
        assert_eq!(event.x, 10.0);
        assert_eq!(event.y, 5.0);
        assert!(!event.modifiers.ctrl);
    }

    #[test]
    fn test_convert_mouse_up() {
        let event = convert_mouse_event(mouse(MouseEventKind::Up(CrosstermMouseButton::Right), 20, 15)).unwrap();

        assert_eq!(event.action, PointerAction::Up);
        assert_eq!(event.button, PointerButton::Right);
        assert_eq!(event.x, 20.0);
        assert_eq!(event.y, 15.0);
    }

    #[test]
    fn test_convert_mouse_drag_is_move() {
        let event = convert_mouse_event(mouse(MouseEventKind::Drag(CrosstermMouseButton::Left), 5, 5)).unwrap();

        assert_eq!(event.action, PointerAction::Move);
        assert_eq!(event.button, PointerButton::Left);
    }

    #[test]
    fn test_convert_mouse_move() {
        let event = convert_mouse_event(mouse(MouseEventKind::Moved, 30, 20)).unwrap();

        assert_eq!(event.action, PointerAction::Move);
        assert_eq!(event.button, PointerButton::None);
        assert_eq!(event.point(), crate::types::pt(30.0, 20.0));
    }

    #[test]
    fn test_scroll_is_dropped() {
        for kind in [
            MouseEventKind::ScrollUp,
            MouseEventKind::ScrollDown,
            MouseEventKind::ScrollLeft,
            MouseEventKind::ScrollRight,
        ] {
            assert!(convert_mouse_event(mouse(kind, 0, 0)).is_none());
        }
    }

    #[test]
    fn test_convert_mouse_with_modifiers() {
        let mut raw = mouse(MouseEventKind::Down(CrosstermMouseButton::Left), 0, 0);
        raw.modifiers = KeyModifiers::CONTROL | KeyModifiers::SHIFT;

        let event = convert_mouse_event(raw).unwrap();

        assert!(event.modifiers.ctrl);
        assert!(event.modifiers.shift);
        assert!(!event.modifiers.alt);
        assert!(!event.modifiers.meta);
    }

    #[test]
    fn test_convert_key_char() {
        let event = convert_key_event(key(KeyCode::Char('a'), KeyModifiers::empty()));

        assert_eq!(event.key, "a");
        assert_eq!(event.code, "KeyA");
        assert_eq!(event.state, KeyState::Press);
        assert!(!event.modifiers.ctrl);
    }

    #[test]
    fn test_convert_shifted_char_keeps_code() {
        let event = convert_key_event(key(KeyCode::Char('A'), KeyModifiers::SHIFT));

        assert_eq!(event.key, "A");
        assert_eq!(event.code, "KeyA");
        assert!(event.modifiers.shift);
    }

    #[test]
    fn test_convert_key_navigation() {
        let nav_keys = [
            (KeyCode::Up, "ArrowUp"),
            (KeyCode::Down, "ArrowDown"),
            (KeyCode::Left, "ArrowLeft"),
            (KeyCode::Right, "ArrowRight"),
            (KeyCode::Home, "Home"),
            (KeyCode::End, "End"),
            (KeyCode::PageUp, "PageUp"),
            (KeyCode::PageDown, "PageDown"),
            (KeyCode::Insert, "Insert"),
            (KeyCode::Delete, "Delete"),
            (KeyCode::Backspace, "Backspace"),
            (KeyCode::Tab, "Tab"),
            (KeyCode::Esc, "Escape"),
        ];

        for (code, expected) in nav_keys {
            let event = convert_key_event(key(code, KeyModifiers::empty()));
            assert_eq!(event.key, expected);
            assert_eq!(event.code, expected);
        }
    }

    #[test]
    fn test_convert_key_function_keys() {
        for n in 1..=12 {
            let event = convert_key_event(key(KeyCode::F(n), KeyModifiers::empty()));
            assert_eq!(event.key, format!("F{}", n));
        }
    }

    #[test]
    fn test_convert_key_states() {
        let states = [
            (KeyEventKind::Press, KeyState::Press),
            (KeyEventKind::Repeat, KeyState::Repeat),
            (KeyEventKind::Release, KeyState::Release),
        ];

        for (kind, expected) in states {
            let mut raw = key(KeyCode::Char('a'), KeyModifiers::empty());
            raw.kind = kind;
            assert_eq!(convert_key_event(raw).state, expected);
        }
    }

    #[test]
    fn test_route_event() {
        super::super::pointer::reset_pointer_state();
        super::super::keyboard::reset_keyboard_state();

        let event = PointerEvent::down(PointerButton::Left, 1.0, 2.0);
        route_event(InputEvent::Pointer(event));
        assert_eq!(super::super::pointer::last_event(), Some(event));

        route_event(InputEvent::Key(KeyboardEvent::new("Escape")));
        assert_eq!(super::super::keyboard::last_event().map(|e| e.key).as_deref(), Some("Escape"));

        assert!(!route_event(InputEvent::Resize(120, 40)));
        assert!(!route_event(InputEvent::None));
    }
}
