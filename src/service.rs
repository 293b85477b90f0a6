//! Service identity and configuration consumed by connectors.
//!
//! `id` exposes validated identifiers ([`ServiceName`], [`TokenId`]); `builder` assembles a
//! [`ServiceDescriptor`] describing how the host reaches its own admin endpoint and whether
//! requests must carry a token.

pub mod builder;
pub mod id;

pub use builder::*;
pub use id::*;

// self
use crate::{_prelude::*, auth::NoncePair};

/// Immutable service descriptor consumed by connectors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
	/// Canonical service name; keys the credentials mapping and tags stored tokens.
	pub name: ServiceName,
	/// Human-readable label shown by the host.
	pub label: String,
	/// Host admin endpoint the verification redirect points back to.
	pub admin_url: Url,
	/// Whether every request must carry a token.
	pub requires_token: bool,
	/// Optional picture advertised in token metadata.
	pub picture: Option<Url>,
}
impl ServiceDescriptor {
	/// Creates a new builder for the provided service name.
	pub fn builder(name: ServiceName) -> ServiceDescriptorBuilder {
		ServiceDescriptorBuilder::new(name)
	}

	/// Builds the host verification endpoint carrying the provided nonce pair.
	pub fn verify_url(&self, nonces: &NoncePair) -> Url {
		let mut url = self.admin_url.clone();

		url.query_pairs_mut()
			.append_pair("service", &self.name)
			.append_pair("action", "verify")
			.append_pair("kr_nonce", nonces.kr_nonce())
			.append_pair("nonce", nonces.nonce());

		url
	}
}
