//! Token/request connector for key-only services.
//!
//! A [`Connector`] combines a [`CredentialResolver`], a [`TokenStore`], and an
//! [`HttpTransport`] for one service. Verification (`verify`) mints the site's placeholder
//! token once; every API call afterwards goes through [`Connector::request`] (`request`).

pub mod request;
pub mod verify;

pub use request::*;
pub use verify::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credential, NoncePair},
	credentials::CredentialResolver,
	hooks::{Observers, TokenObserver},
	http::HttpTransport,
	obs::ConnectorMetrics,
	service::{ServiceDescriptor, TokenId},
	store::TokenStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Connector specialized for the crate's default reqwest transport.
pub type ReqwestConnector = Connector<ReqwestTransport>;

/// Credential resolution, token lifecycle, and request dispatch for one service.
///
/// The connector never caches credentials: each [`resolve_credentials`](Self::resolve_credentials)
/// call reads the sources afresh. The current token and the last response status live behind
/// locks so a host may share one connector across threads.
pub struct Connector<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport used for every outbound API request.
	pub transport: Arc<T>,
	/// Service configuration.
	pub descriptor: ServiceDescriptor,
	/// Ordered credential lookup.
	pub resolver: CredentialResolver,
	/// Token store that persists minted tokens.
	pub store: Arc<dyn TokenStore>,
	/// Observers applied while verifying.
	pub observers: Observers,
	nonces: NoncePair,
	metrics: ConnectorMetrics,
	token: RwLock<Option<AccessToken>>,
	last_status: Mutex<Option<u16>>,
}
impl<T> Connector<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a connector that dispatches through the caller-provided transport.
	pub fn with_transport(
		descriptor: ServiceDescriptor,
		resolver: CredentialResolver,
		store: Arc<dyn TokenStore>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			descriptor,
			resolver,
			store,
			observers: Observers::default(),
			nonces: NoncePair::generate(),
			metrics: ConnectorMetrics::default(),
			token: RwLock::new(None),
			last_status: Mutex::new(None),
		}
	}

	/// Appends an observer run after every previously registered one.
	pub fn with_observer(mut self, observer: impl 'static + TokenObserver) -> Self {
		self.observers.push(Arc::new(observer));

		self
	}

	/// Returns the first credential any configured source provides.
	pub fn resolve_credentials(&self) -> Result<Option<Credential>> {
		self.resolver.resolve_credentials()
	}

	/// Returns `true` when an API key resolves.
	pub fn is_configured(&self) -> bool {
		self.resolver.is_configured()
	}

	/// Always `true`: key-only services need no handshake to count as connected.
	pub fn is_connected(&self) -> bool {
		true
	}

	/// Whether requests fail without a token.
	pub fn requires_token(&self) -> bool {
		self.descriptor.requires_token
	}

	/// Saves an API key posted through the host's management screen.
	pub fn save_api_key(&self, api_key: &str) -> Result<()> {
		self.update_credentials(Credential::from_key(api_key.trim()))
	}

	/// Persists credentials through the resolver's writable source.
	pub fn update_credentials(&self, credential: Credential) -> Result<()> {
		self.resolver.update_credentials(credential)
	}

	/// Identifier shown to users for `token`: the raw token value.
	pub fn get_display<'a>(&self, token: &'a AccessToken) -> &'a str {
		token.display()
	}

	/// Sets the token attached to subsequent requests.
	pub fn set_token(&self, token: AccessToken) {
		*self.token.write() = Some(token);
	}

	/// Returns a copy of the current token, if any.
	pub fn token(&self) -> Option<AccessToken> {
		self.token.read().clone()
	}

	/// Loads a stored token and makes it current; returns `false` when `id` is unknown.
	pub fn load_token(&self, id: &TokenId) -> Result<bool> {
		match self.store.load(id)? {
			Some(token) => {
				self.set_token(token);

				Ok(true)
			},
			None => Ok(false),
		}
	}

	/// HTTP status of the most recent response; `None` before any request or after a transport
	/// failure.
	pub fn last_status(&self) -> Option<u16> {
		*self.last_status.lock()
	}

	/// Outcome counters for this connector's stages.
	pub fn metrics(&self) -> &ConnectorMetrics {
		&self.metrics
	}

	/// Nonce pair issued with this connector's verification redirect.
	pub fn nonces(&self) -> &NoncePair {
		&self.nonces
	}
}
#[cfg(feature = "reqwest")]
impl Connector<ReqwestTransport> {
	/// Creates a connector with its own reqwest-backed blocking transport.
	pub fn new(
		descriptor: ServiceDescriptor,
		resolver: CredentialResolver,
		store: Arc<dyn TokenStore>,
	) -> Result<Self> {
		Ok(Self::with_transport(descriptor, resolver, store, ReqwestTransport::try_new()?))
	}
}
impl<T> Debug for Connector<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Connector")
			.field("descriptor", &self.descriptor)
			.field("resolver", &self.resolver)
			.field("observers", &self.observers)
			.field("token_set", &self.token.read().is_some())
			.field("last_status", &self.last_status())
			.finish()
	}
}

#[cfg(test)]
pub(crate) mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		auth::placeholder_meta,
		credentials::{CREDENTIALS_SETTING, ConstantSource, SettingsSource},
		error::TransportError,
		http::{TransportRequest, TransportResponse},
		service::ServiceName,
		settings::{MemorySettings, SettingsStore},
		store::MemoryTokenStore,
	};

	/// Transport double that records requests and replays a canned outcome.
	#[derive(Default)]
	pub(crate) struct RecordingTransport {
		pub(crate) requests: Mutex<Vec<TransportRequest>>,
		pub(crate) status: Mutex<Option<(u16, String)>>,
	}
	impl RecordingTransport {
		pub(crate) fn replying(status: u16, body: &str) -> Self {
			Self { requests: Mutex::default(), status: Mutex::new(Some((status, body.into()))) }
		}
	}
	impl HttpTransport for RecordingTransport {
		fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
			self.requests.lock().push(request);

			match self.status.lock().clone() {
				Some((status, body)) => Ok(TransportResponse::new(status, body)),
				None => Err(TransportError::Io(std::io::Error::other("connection refused"))),
			}
		}
	}

	pub(crate) fn descriptor(requires_token: bool) -> ServiceDescriptor {
		ServiceDescriptor::builder(ServiceName::new("youtube").expect("Service should be valid."))
			.label("YouTube")
			.admin_url(
				Url::parse("https://example.test/wp-admin/admin.php?page=keyring")
					.expect("Admin URL should parse."),
			)
			.requires_token(requires_token)
			.build()
			.expect("Descriptor should build.")
	}

	pub(crate) fn connector(
		requires_token: bool,
		api_key: Option<&str>,
		transport: RecordingTransport,
	) -> (Connector<RecordingTransport>, Arc<MemorySettings>) {
		let descriptor = descriptor(requires_token);
		let settings = Arc::new(MemorySettings::default());
		let resolver = CredentialResolver::standard(
			descriptor.name.clone(),
			ConstantSource::new(api_key.map(str::to_owned)),
			SettingsSource::new(settings.clone()),
		);
		let connector = Connector::with_transport(
			descriptor,
			resolver,
			Arc::new(MemoryTokenStore::default()),
			transport,
		);

		(connector, settings)
	}

	#[test]
	fn connected_regardless_of_token() {
		let (connector, _) = connector(false, None, RecordingTransport::default());

		assert!(connector.is_connected());
		assert!(connector.token().is_none());

		connector.set_token(AccessToken::new(
			connector.descriptor.name.clone(),
			"t",
			placeholder_meta(None),
		));

		assert!(connector.is_connected());
	}

	#[test]
	fn configured_tracks_resolved_key() {
		let (unconfigured, settings) = connector(false, None, RecordingTransport::default());

		assert!(!unconfigured.is_configured());

		settings
			.set(CREDENTIALS_SETTING, json!({ "youtube": { "key": "stored" } }))
			.expect("Seeding settings should succeed.");

		assert!(unconfigured.is_configured());

		let (configured, _) = connector(false, Some("abc123"), RecordingTransport::default());
		let credential = configured
			.resolve_credentials()
			.expect("Resolution should succeed.")
			.expect("Constant should resolve.");

		assert!(configured.is_configured());
		assert_eq!(credential.key.expose(), "abc123");
	}

	#[test]
	fn save_api_key_trims_and_persists() {
		let (connector, settings) = connector(false, None, RecordingTransport::default());

		connector.save_api_key("  posted-key \n").expect("Saving should succeed.");

		let stored = settings
			.get(CREDENTIALS_SETTING)
			.expect("Read should succeed.")
			.expect("Mapping should exist.");

		assert_eq!(stored["youtube"]["key"], "posted-key");
		assert!(connector.is_configured());
	}

	#[test]
	fn display_is_raw_token() {
		let (connector, _) = connector(false, None, RecordingTransport::default());
		let token =
			AccessToken::new(connector.descriptor.name.clone(), "abc", placeholder_meta(None));

		assert_eq!(connector.get_display(&token), "abc");
	}

	#[test]
	fn load_token_sets_current_token() {
		let (connector, _) = connector(true, None, RecordingTransport::default());
		let token =
			AccessToken::new(connector.descriptor.name.clone(), "stored", placeholder_meta(None));
		let id = connector.store.store(token.clone()).expect("Storing should succeed.");

		assert!(!connector.load_token(&TokenId::from_sequence(99)).expect("Load should succeed."));
		assert!(connector.token().is_none());
		assert!(connector.load_token(&id).expect("Load should succeed."));
		assert_eq!(connector.token(), Some(token));
	}
}
