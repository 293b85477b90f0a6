//! Observer contract for customizing minted tokens.
//!
//! Observers replace the host's global filter/action hooks with an explicit, ordered list owned
//! by the connector. Every method has a no-op default, so an observer only overrides the stage
//! it cares about.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenMeta},
	http::TransportResponse,
	service::{ServiceName, TokenId},
};

/// Read-only context handed to [`TokenObserver::on_meta_built`].
#[derive(Clone, Copy, Debug)]
pub struct MetaContext<'a> {
	/// Service minting the token.
	pub service: &'a ServiceName,
	/// Raw token value being minted.
	pub raw_token: &'a str,
	/// Response of the identity lookup, if one was made. Key-only services never make one.
	pub response: Option<&'a TransportResponse>,
}

/// Hook points invoked while a token is verified.
pub trait TokenObserver
where
	Self: Send + Sync,
{
	/// Transforms the metadata before the token is assembled.
	fn on_meta_built(&self, meta: TokenMeta, _ctx: &MetaContext<'_>) -> TokenMeta {
		meta
	}

	/// Transforms the assembled token before it is stored.
	fn on_token_built(&self, token: AccessToken) -> AccessToken {
		token
	}

	/// Notified once the token is stored under `id`.
	fn on_verified(&self, _id: &TokenId, _token: &AccessToken) {}
}

/// Ordered list of observers applied in registration order.
#[derive(Clone, Default)]
pub struct Observers(Vec<Arc<dyn TokenObserver>>);
impl Observers {
	/// Appends an observer.
	pub fn push(&mut self, observer: Arc<dyn TokenObserver>) {
		self.0.push(observer);
	}

	/// Number of registered observers.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no observer is registered.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub(crate) fn apply_meta(&self, meta: TokenMeta, ctx: &MetaContext<'_>) -> TokenMeta {
		self.0.iter().fold(meta, |meta, observer| observer.on_meta_built(meta, ctx))
	}

	pub(crate) fn apply_token(&self, token: AccessToken) -> AccessToken {
		self.0.iter().fold(token, |token, observer| observer.on_token_built(token))
	}

	pub(crate) fn notify_verified(&self, id: &TokenId, token: &AccessToken) {
		for observer in &self.0 {
			observer.on_verified(id, token);
		}
	}
}
impl Debug for Observers {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Observers").field(&self.0.len()).finish()
	}
}
