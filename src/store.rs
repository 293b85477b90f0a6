//! Token store contract and built-in store implementations for minted access tokens.

pub mod file;
pub mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

// self
use crate::{_prelude::*, auth::AccessToken, service::TokenId};

/// Storage backend contract implemented by host token stores.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Persists a token and returns the identifier the host uses to load it later.
	fn store(&self, token: AccessToken) -> Result<TokenId, StoreError>;

	/// Loads a previously stored token, if present.
	fn load(&self, id: &TokenId) -> Result<Option<AccessToken>, StoreError>;
}

/// Error type produced by token and settings stores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Shared sequence + map layout used by the built-in token stores.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct TokenTable {
	last_id: u64,
	tokens: Vec<(TokenId, AccessToken)>,
}
impl TokenTable {
	pub(crate) fn insert(&mut self, token: AccessToken) -> TokenId {
		self.last_id += 1;

		let id = TokenId::from_sequence(self.last_id);

		self.tokens.push((id.clone(), token));

		id
	}

	pub(crate) fn get(&self, id: &TokenId) -> Option<&AccessToken> {
		self.tokens.iter().find(|(key, _)| key == id).map(|(_, token)| token)
	}
}
