//! Cell Module - Observable values with lazy, glitch-free propagation
//!
//! A cell holds one value and notifies three listener groups on every real
//! change, always in the same order: upstream (write-back into parents),
//! downstream (derived cells), then effects.
//!
//! - **Var / Value** - read-write and read-only handles to one cell
//! - **Derived cells** - `map`, `bind`, `zoom`, `lens`, `iso`, `prop`
//! - **Pack / List** - combine several cells into one record or sequence
//! - **Sequence zooms** - `at`, `first`, `last`, `find`, `push`, `pop`, `lookup`
//! - **Timing** - `debounce`, `throttle`, `batch` through the [`scheduler`](crate::scheduler)
//! - **Persist** - mirror a cell into string-keyed storage as JSON
//! - **Binding** - bridge a cell into a mount/unmount render cycle
//!
//! Derived cells subscribe upstream only while someone observes them. Reads
//! never need a subscription: a derived cell computes `get()` from its
//! sources every time.
//!
//! # Example
//!
//! ```ignore
//! use spark_ui_core::cell::Var;
//!
//! let size = Var::new((100.0, 50.0));
//! let width = size.zoom(|s| s.0, |w, s| (w, s.1));
//!
//! let stop = width.effect(|w, _| println!("width {w}"), true);
//! width.set(120.0);
//! assert_eq!(size.get(), (120.0, 50.0));
//! stop();
//! ```

mod binding;
pub mod instrument;
mod node;
mod pack;
mod persist;
mod sequence;
mod slots;
mod timing;
mod var;

pub use binding::{Binding, Controlled};
pub use instrument::{Counters, Instrument, ListenerKind};
pub use pack::{FieldCell, Fields, Unpack};
pub use persist::{load, store, MemoryStorage, PersistError, Storage};
pub use var::{lift2, lift3, lift4, Value, Var};

/// Teardown returned by every subscription. Calling it more than once is
/// impossible; dropping it without calling leaves the subscription in place.
pub type Uninstaller = Box<dyn FnOnce()>;
