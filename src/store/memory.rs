//! Thread-safe in-memory [`TokenStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	service::TokenId,
	store::{StoreError, TokenStore, TokenTable},
};

/// Thread-safe storage backend that keeps tokens in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore(Arc<RwLock<TokenTable>>);
impl MemoryTokenStore {
	/// Number of tokens stored so far.
	pub fn len(&self) -> usize {
		self.0.read().tokens.len()
	}

	/// Returns `true` when nothing has been stored.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
impl TokenStore for MemoryTokenStore {
	fn store(&self, token: AccessToken) -> Result<TokenId, StoreError> {
		Ok(self.0.write().insert(token))
	}

	fn load(&self, id: &TokenId) -> Result<Option<AccessToken>, StoreError> {
		Ok(self.0.read().get(id).cloned())
	}
}
