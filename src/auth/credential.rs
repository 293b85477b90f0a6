//! API credential record stored by the host or supplied by a process-wide constant.

// self
use crate::{_prelude::*, auth::Secret};

/// Secrets required to call a service's API.
///
/// Key-only services leave `app_id` and `secret` empty; the record keeps all three fields so
/// it reads and writes the same shape the host stores for every service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credential {
	/// Application identifier (unused by key-only services).
	pub app_id: String,
	/// API key.
	pub key: Secret,
	/// Application secret (unused by key-only services).
	pub secret: Secret,
}
impl Credential {
	/// Builds a key-only credential.
	pub fn from_key(key: impl Into<String>) -> Self {
		Self { key: Secret::new(key), ..Default::default() }
	}

	/// Returns `true` when the API key is present.
	pub fn is_configured(&self) -> bool {
		!self.key.is_empty()
	}
}
