//! Mirror a cell into string-keyed storage as JSON.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::var::Var;
use super::Uninstaller;

/// Errors reading or writing a persisted value.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("no stored value for key '{0}'")]
    Missing(String),

    #[error("stored value is not valid JSON for this type: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string-keyed store, such as browser local storage or a settings file.
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: String);
}

/// In-process [`Storage`], mostly for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) {
        self.items.borrow_mut().insert(key.to_string(), value);
    }
}

/// Read and decode the value stored under `key`.
pub fn load<A: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Result<A, PersistError> {
    let raw = storage
        .get_item(key)
        .ok_or_else(|| PersistError::Missing(key.to_string()))?;
    Ok(serde_json::from_str(&raw)?)
}

/// Encode `value` and store it under `key`.
pub fn store<A: Serialize>(storage: &dyn Storage, key: &str, value: &A) -> Result<(), PersistError> {
    let raw = serde_json::to_string(value)?;
    storage.set_item(key, raw);
    Ok(())
}

impl<A> Var<A>
where
    A: Clone + Serialize + DeserializeOwned + 'static,
{
    /// Load this cell from `storage[key]` (passing the decoded value through
    /// `revive`), then write every later value back. A missing or unreadable
    /// entry leaves the cell as it is.
    pub fn persist<F>(&self, storage: Rc<dyn Storage>, key: &str, revive: F) -> Uninstaller
    where
        F: Fn(A) -> A,
    {
        match load::<A>(storage.as_ref(), key) {
            Ok(stored) => self.set(revive(stored)),
            Err(PersistError::Missing(_)) => {}
            Err(err) => tracing::warn!(key, %err, "ignoring unreadable persisted value"),
        }

        let key = key.to_string();
        self.effect(
            move |v, _| {
                if let Err(err) = store(storage.as_ref(), &key, v) {
                    tracing::warn!(key = %key, %err, "failed to persist value");
                }
            },
            false,
        )
    }
}
