//! Selection Module - Text selection suppression
//!
//! While something is being dragged, the host should stop the pointer from
//! selecting text underneath. Suppression is counted, so overlapping
//! sessions nest: selection comes back only when the last one releases.
//!
//! # Example
//!
//! ```ignore
//! use spark_ui_core::state::selection;
//!
//! let release = selection::suppress();
//! assert!(selection::is_suppressed());
//! release();
//! ```

use crate::cell::{Value, Var};

thread_local! {
    static DEPTH: Var<usize> = Var::new(0);
}

/// Suppress text selection until the returned guard is called.
pub fn suppress() -> impl FnOnce() {
    DEPTH.with(|d| d.modify(|n| n + 1));
    move || DEPTH.with(|d| d.modify(|n| n.saturating_sub(1)))
}

pub fn is_suppressed() -> bool {
    DEPTH.with(|d| d.get() > 0)
}

/// Reactive view of [`is_suppressed`], for hosts that toggle selection
/// styling when it changes.
pub fn suppressed() -> Value<bool> {
    DEPTH.with(|d| d.map(|n| *n > 0))
}

/// Reset selection state (for testing)
pub fn reset_selection_state() {
    DEPTH.with(|d| d.set(0));
}
