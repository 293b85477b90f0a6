//! In-memory [`SettingsStore`] used by tests and demos.

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, settings::SettingsStore, store::StoreError};

/// Thread-safe settings map kept in-process.
#[derive(Clone, Debug, Default)]
pub struct MemorySettings(Arc<RwLock<BTreeMap<String, Value>>>);
impl SettingsStore for MemorySettings {
	fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
		Ok(self.0.read().get(key).cloned())
	}

	fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
		self.0.write().insert(key.to_owned(), value);

		Ok(())
	}
}
