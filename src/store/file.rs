//! Simple file-backed [`TokenStore`] for lightweight deployments.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	service::TokenId,
	store::{StoreError, TokenStore, TokenTable},
};

/// Persists minted tokens to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
	path: PathBuf,
	inner: Arc<RwLock<TokenTable>>,
}
impl FileTokenStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		ensure_parent_exists(&path)?;

		let table = read_snapshot(&path)?.unwrap_or_default();

		Ok(Self { path, inner: Arc::new(RwLock::new(table)) })
	}

	/// Location of the JSON snapshot.
	pub fn path(&self) -> &Path {
		&self.path
	}
}
impl TokenStore for FileTokenStore {
	fn store(&self, token: AccessToken) -> Result<TokenId, StoreError> {
		let mut guard = self.inner.write();
		let mut next = guard.clone();
		let id = next.insert(token);

		write_snapshot(&self.path, &next)?;

		*guard = next;

		Ok(id)
	}

	fn load(&self, id: &TokenId) -> Result<Option<AccessToken>, StoreError> {
		Ok(self.inner.read().get(id).cloned())
	}
}

/// Reads a JSON snapshot, treating a missing or empty file as absent.
pub(crate) fn read_snapshot<T>(path: &Path) -> Result<Option<T>, StoreError>
where
	T: DeserializeOwned,
{
	if !path.exists() {
		return Ok(None);
	}

	let metadata = path.metadata().map_err(|e| StoreError::Backend {
		message: format!("Failed to inspect {}: {e}", path.display()),
	})?;

	if metadata.len() == 0 {
		return Ok(None);
	}

	let bytes = fs::read(path).map_err(|e| StoreError::Backend {
		message: format!("Failed to read {}: {e}", path.display()),
	})?;
	let de = &mut serde_json::Deserializer::from_slice(&bytes);

	serde_path_to_error::deserialize(de).map(Some).map_err(|e| StoreError::Serialization {
		message: format!("Failed to parse {} at `{}`: {}", path.display(), e.path(), e.inner()),
	})
}

/// Writes a JSON snapshot through a synced temp file and an atomic rename.
pub(crate) fn write_snapshot<T>(path: &Path, value: &T) -> Result<(), StoreError>
where
	T: Serialize,
{
	ensure_parent_exists(path)?;

	let serialized = serde_json::to_vec_pretty(value).map_err(|e| StoreError::Serialization {
		message: format!("Failed to serialize store snapshot: {e}"),
	})?;
	let mut tmp_path = path.to_path_buf();

	tmp_path.set_extension("tmp");

	{
		let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
			message: format!("Failed to create {}: {e}", tmp_path.display()),
		})?;

		file.write_all(&serialized).map_err(|e| StoreError::Backend {
			message: format!("Failed to write {}: {e}", tmp_path.display()),
		})?;
		file.sync_all().map_err(|e| StoreError::Backend {
			message: format!("Failed to sync {}: {e}", tmp_path.display()),
		})?;
	}

	fs::rename(&tmp_path, path).map_err(|e| StoreError::Backend {
		message: format!("Failed to replace {}: {e}", path.display()),
	})
}

fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
			message: format!("Failed to create store directory {}: {e}", parent.display()),
		})?;
	}

	Ok(())
}
