//! Key-only API connector: resolve configured credentials, mint a one-time site token, and
//! dispatch authorized requests through a single instrumented path.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod connector;
pub mod credentials;
pub mod error;
pub mod hooks;
pub mod http;
pub mod obs;
pub mod service;
pub mod settings;
pub mod store;
pub mod youtube;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		connector::{Connector, ReqwestConnector},
		credentials::{ConstantSource, CredentialResolver, SettingsSource},
		http::ReqwestTransport,
		service::ServiceDescriptor,
		settings::{MemorySettings, SettingsStore},
		store::{MemoryTokenStore, TokenStore},
	};

	/// Admin endpoint used by test descriptors.
	pub const TEST_ADMIN_URL: &str = "https://example.test/wp-admin/admin.php?page=keyring";

	/// Builds a blocking reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Constructs a [`Connector`] backed by in-memory settings and token stores plus the
	/// reqwest transport used across integration tests.
	///
	/// `api_key` is installed as the process-wide constant when provided.
	pub fn build_reqwest_test_connector(
		descriptor: ServiceDescriptor,
		api_key: Option<&str>,
	) -> (ReqwestConnector, Arc<MemoryTokenStore>, Arc<MemorySettings>) {
		let settings_backend = Arc::new(MemorySettings::default());
		let settings: Arc<dyn SettingsStore> = settings_backend.clone();
		let store_backend = Arc::new(MemoryTokenStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let resolver = CredentialResolver::standard(
			descriptor.name.clone(),
			ConstantSource::new(api_key.map(str::to_owned)),
			SettingsSource::new(settings),
		);
		let connector =
			Connector::with_transport(descriptor, resolver, store, test_reqwest_transport());

		(connector, store_backend, settings_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Error as ReqwestError, blocking::Client as ReqwestClient};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
