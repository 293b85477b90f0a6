//! YouTube Data API v3 service: public calls authorized by an API key alone.
//!
//! Requests do not require a token, and the key is usually appended as the `key` query pair by
//! the caller. Verification still mints a site token so hosts can list the connection.

// self
use crate::{
	_prelude::*,
	credentials::{ConstantSource, CredentialResolver, SettingsSource},
	error::ConfigError,
	service::{ServiceDescriptor, ServiceName},
	settings::SettingsStore,
};
#[cfg(feature = "reqwest")]
use crate::{connector::ReqwestConnector, store::TokenStore};

/// Canonical service name.
pub const NAME: &str = "youtube";
/// Label shown by the host.
pub const LABEL: &str = "YouTube";
/// Environment variable holding the process-wide API key.
pub const API_KEY_ENV: &str = "KEYRING__YOUTUBE_KEY";
/// Picture advertised in token metadata.
pub const PICTURE_URL: &str = "http://www.nacc.org/images/vision/transparent-YouTube-logo-icon1.png";
/// Base URL of the Data API.
pub const API_BASE: &str = "https://www.googleapis.com/youtube/v3/";

/// Builds the YouTube descriptor pointing verification back at `admin_url`.
pub fn descriptor(admin_url: Url) -> Result<ServiceDescriptor, ConfigError> {
	let picture = Url::parse(PICTURE_URL).map_err(|e| ConfigError::invalid_url(PICTURE_URL, e))?;

	ServiceDescriptor::builder(ServiceName::new(NAME)?)
		.label(LABEL)
		.admin_url(admin_url)
		.requires_token(false)
		.picture(picture)
		.build()
}

/// Standard resolver: [`API_KEY_ENV`] first, then the host settings mapping.
pub fn resolver(settings: Arc<dyn SettingsStore>) -> Result<CredentialResolver> {
	Ok(CredentialResolver::standard(
		ServiceName::new(NAME)?,
		ConstantSource::from_env(API_KEY_ENV),
		SettingsSource::new(settings),
	))
}

/// Resolves `endpoint` (e.g. `"search"`) against [`API_BASE`].
pub fn endpoint(endpoint: &str) -> Result<Url, ConfigError> {
	let base = Url::parse(API_BASE).map_err(|e| ConfigError::invalid_url(API_BASE, e))?;

	base.join(endpoint).map_err(|e| ConfigError::invalid_url(endpoint, e))
}

/// Creates a reqwest-backed YouTube connector.
#[cfg(feature = "reqwest")]
pub fn connector(
	admin_url: Url,
	settings: Arc<dyn SettingsStore>,
	store: Arc<dyn TokenStore>,
) -> Result<ReqwestConnector> {
	ReqwestConnector::new(descriptor(admin_url)?, resolver(settings)?, store)
}
