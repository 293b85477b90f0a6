//! Host key/value settings contract and built-in backends.
//!
//! Values are plain [`serde_json::Value`]s so hosts can keep arbitrary option blobs; the
//! credentials mapping is one such blob, stored under
//! [`CREDENTIALS_SETTING`](crate::credentials::CREDENTIALS_SETTING).

pub mod file;
pub mod memory;

pub use file::FileSettings;
pub use memory::MemorySettings;

// crates.io
use serde_json::Value;
// self
use crate::store::StoreError;

/// Key/value settings backend owned by the host.
pub trait SettingsStore
where
	Self: Send + Sync,
{
	/// Returns the value stored under `key`, if any.
	fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

	/// Stores or replaces the value under `key`.
	fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}
