//! State Module - Document-wide input state
//!
//! - **Pointer** - Event types, dispatch, global handler registry
//! - **Keyboard** - Event types, dispatch, handler registry, prevent default
//! - **Selection** - Counted text-selection suppression
//! - **Input** - crossterm bridge feeding pointer and keyboard

pub mod input;
pub mod keyboard;
pub mod pointer;
pub mod selection;

pub use keyboard::{KeyState, KeyboardEvent, Modifiers};
pub use pointer::{PointerAction, PointerButton, PointerEvent};
