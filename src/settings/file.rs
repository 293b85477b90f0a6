//! JSON-file [`SettingsStore`] persisting every write.

// std
use std::path::{Path, PathBuf};
// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	settings::SettingsStore,
	store::{
		StoreError,
		file::{read_snapshot, write_snapshot},
	},
};

/// Settings backend stored as a single JSON object on disk.
#[derive(Clone, Debug)]
pub struct FileSettings {
	path: PathBuf,
	inner: Arc<RwLock<BTreeMap<String, Value>>>,
}
impl FileSettings {
	/// Opens (or creates) the settings file, eagerly loading existing values.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();
		let values = read_snapshot(&path)?.unwrap_or_default();

		Ok(Self { path, inner: Arc::new(RwLock::new(values)) })
	}

	/// Location of the JSON file.
	pub fn path(&self) -> &Path {
		&self.path
	}
}
impl SettingsStore for FileSettings {
	fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
		Ok(self.inner.read().get(key).cloned())
	}

	fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
		let mut guard = self.inner.write();
		let mut next = guard.clone();

		next.insert(key.to_owned(), value);
		write_snapshot(&self.path, &next)?;

		*guard = next;

		Ok(())
	}
}
