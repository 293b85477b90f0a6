//! Credential resolution over an ordered list of sources.
//!
//! A [`CredentialResolver`] tries each [`CredentialSource`] in the order it was registered and
//! returns the first credential found; results are never merged. The standard order is a
//! process-wide constant ([`ConstantSource`]) followed by the host's credentials mapping
//! ([`SettingsSource`]).

// std
use std::env;
// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	auth::{Credential, Secret},
	error::ConfigError,
	service::ServiceName,
	settings::SettingsStore,
	store::StoreError,
};

/// Settings key holding every service's credentials.
pub const CREDENTIALS_SETTING: &str = "keyring_credentials";

/// Raw credentials mapping keyed by service name.
///
/// Entries stay untyped so fields other services keep are never dropped and a malformed entry
/// only affects its own service.
pub type CredentialsMap = Map<String, Value>;

/// Provider capable of supplying credentials for a service.
pub trait CredentialSource
where
	Self: Send + Sync,
{
	/// Returns credentials for `service`, or `None` to let the next source answer.
	fn credentials(&self, service: &ServiceName) -> Result<Option<Credential>>;
}

/// Transform applied to the credentials mapping after it is read from settings.
///
/// Filters run in registration order and may add, replace, or drop entries.
pub trait CredentialsFilter
where
	Self: Send + Sync,
{
	/// Returns the (possibly modified) mapping.
	fn filter(&self, all: CredentialsMap) -> CredentialsMap;
}
impl<F> CredentialsFilter for F
where
	F: Send + Sync + Fn(CredentialsMap) -> CredentialsMap,
{
	fn filter(&self, all: CredentialsMap) -> CredentialsMap {
		self(all)
	}
}

/// API key defined once for the whole process.
#[derive(Clone, Debug, Default)]
pub struct ConstantSource {
	key: Option<Secret>,
}
impl ConstantSource {
	/// Wraps an optional key; an empty string counts as undefined.
	pub fn new(key: Option<String>) -> Self {
		Self { key: key.filter(|k| !k.is_empty()).map(Secret::new) }
	}

	/// Captures the environment variable `var` at construction time.
	pub fn from_env(var: &str) -> Self {
		Self::new(env::var(var).ok())
	}

	/// Returns `true` when a key is defined.
	pub fn is_defined(&self) -> bool {
		self.key.is_some()
	}
}
impl CredentialSource for ConstantSource {
	fn credentials(&self, _service: &ServiceName) -> Result<Option<Credential>> {
		Ok(self.key.as_ref().map(|key| Credential::from_key(key.expose())))
	}
}

/// Reads the host's credentials mapping from a [`SettingsStore`].
#[derive(Clone)]
pub struct SettingsSource {
	settings: Arc<dyn SettingsStore>,
	filters: Vec<Arc<dyn CredentialsFilter>>,
}
impl SettingsSource {
	/// Creates a source without filters.
	pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
		Self { settings, filters: Vec::new() }
	}

	/// Appends a filter applied after the mapping is read.
	pub fn with_filter(mut self, filter: impl 'static + CredentialsFilter) -> Self {
		self.filters.push(Arc::new(filter));

		self
	}

	/// Returns the filtered credentials mapping.
	pub fn all_credentials(&self) -> Result<CredentialsMap> {
		let all = self.stored_credentials()?;

		Ok(self.filters.iter().fold(all, |all, filter| filter.filter(all)))
	}

	/// Stores `credential` for `service`, leaving every other entry untouched.
	///
	/// Filters are not applied before writing, so overrides never leak into storage.
	pub fn update_credentials(&self, service: &ServiceName, credential: Credential) -> Result<()> {
		let mut all = self.stored_credentials()?;
		let entry = serde_json::to_value(&credential).map_err(|e| StoreError::Serialization {
			message: format!("Failed to serialize `{service}` credentials: {e}"),
		})?;

		all.insert(service.to_string(), entry);
		self.settings.set(CREDENTIALS_SETTING, Value::Object(all))?;

		Ok(())
	}

	fn stored_credentials(&self) -> Result<CredentialsMap> {
		match self.settings.get(CREDENTIALS_SETTING)? {
			None | Some(Value::Null) => Ok(CredentialsMap::new()),
			Some(Value::Object(all)) => Ok(all),
			Some(other) => Err(StoreError::Serialization {
				message: format!("`{CREDENTIALS_SETTING}` must be an object, found {other}"),
			}
			.into()),
		}
	}
}
impl CredentialSource for SettingsSource {
	fn credentials(&self, service: &ServiceName) -> Result<Option<Credential>> {
		let entry = self.all_credentials()?.remove(service.as_ref()).filter(|e| !e.is_null());
		let Some(entry) = entry else {
			return Ok(None);
		};
		let credential: Credential = serde_path_to_error::deserialize(entry).map_err(|e| {
			StoreError::Serialization {
				message: format!(
					"Failed to parse `{CREDENTIALS_SETTING}` at `{service}.{}`: {}",
					e.path(),
					e.inner()
				),
			}
		})?;

		Ok(Some(credential).filter(Credential::is_configured))
	}
}
impl Debug for SettingsSource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SettingsSource").field("filters", &self.filters.len()).finish()
	}
}

/// Ordered credential lookup for one service.
#[derive(Clone)]
pub struct CredentialResolver {
	service: ServiceName,
	sources: Vec<Arc<dyn CredentialSource>>,
	writer: Option<SettingsSource>,
}
impl CredentialResolver {
	/// Creates a resolver with no sources; it resolves nothing until sources are added.
	pub fn new(service: ServiceName) -> Self {
		Self { service, sources: Vec::new(), writer: None }
	}

	/// Creates the standard constant-then-settings resolver.
	///
	/// The settings source also receives credentials saved through
	/// [`update_credentials`](Self::update_credentials).
	pub fn standard(
		service: ServiceName,
		constant: ConstantSource,
		settings: SettingsSource,
	) -> Self {
		Self::new(service).with_source(constant).with_writable_settings(settings)
	}

	/// Appends a source tried after every previously registered one.
	pub fn with_source(mut self, source: impl 'static + CredentialSource) -> Self {
		self.sources.push(Arc::new(source));

		self
	}

	/// Appends `settings` as a source and makes it the target of credential updates.
	pub fn with_writable_settings(mut self, settings: SettingsSource) -> Self {
		self.sources.push(Arc::new(settings.clone()));
		self.writer = Some(settings);

		self
	}

	/// Service whose credentials this resolver looks up.
	pub fn service(&self) -> &ServiceName {
		&self.service
	}

	/// Returns the first credential any source provides.
	pub fn resolve_credentials(&self) -> Result<Option<Credential>> {
		for source in &self.sources {
			if let Some(credential) = source.credentials(&self.service)? {
				return Ok(Some(credential));
			}
		}

		Ok(None)
	}

	/// Returns `true` when a credential with a non-empty key resolves.
	///
	/// Source failures count as "not configured" and are logged.
	pub fn is_configured(&self) -> bool {
		match self.resolve_credentials() {
			Ok(credential) => credential.is_some_and(|c| c.is_configured()),
			Err(e) => {
				crate::obs::warn_resolution_failure(&self.service, &e);

				false
			},
		}
	}

	/// Persists credentials posted through the host's management screen.
	pub fn update_credentials(&self, credential: Credential) -> Result<()> {
		let writer = self.writer.as_ref().ok_or_else(|| ConfigError::ReadOnlyCredentials {
			service: self.service.to_string(),
		})?;

		writer.update_credentials(&self.service, credential)
	}
}
impl Debug for CredentialResolver {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialResolver")
			.field("service", &self.service)
			.field("sources", &self.sources.len())
			.field("writable", &self.writer.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::settings::MemorySettings;

	fn youtube() -> ServiceName {
		ServiceName::new("youtube").expect("Service fixture should be valid.")
	}

	fn settings_with(value: Value) -> Arc<MemorySettings> {
		let settings = Arc::new(MemorySettings::default());

		settings.set(CREDENTIALS_SETTING, value).expect("Seeding settings should succeed.");

		settings
	}

	struct FailingSource;
	impl CredentialSource for FailingSource {
		fn credentials(&self, _service: &ServiceName) -> Result<Option<Credential>> {
			Err(StoreError::Backend { message: "offline".into() }.into())
		}
	}

	#[test]
	fn constant_wins_over_settings() {
		let settings = settings_with(json!({ "youtube": { "key": "from-settings" } }));
		let resolver = CredentialResolver::standard(
			youtube(),
			ConstantSource::new(Some("from-constant".into())),
			SettingsSource::new(settings),
		);
		let credential = resolver
			.resolve_credentials()
			.expect("Resolution should succeed.")
			.expect("A credential should resolve.");

		assert_eq!(credential.key.expose(), "from-constant");
		assert!(credential.app_id.is_empty());
		assert!(credential.secret.is_empty());
	}

	#[test]
	fn settings_entry_used_without_constant() {
		let settings = settings_with(json!({
			"youtube": { "app_id": "", "key": "from-settings", "secret": "" },
			"vimeo": { "key": "other" },
		}));
		let resolver = CredentialResolver::standard(
			youtube(),
			ConstantSource::default(),
			SettingsSource::new(settings),
		);
		let credential = resolver
			.resolve_credentials()
			.expect("Resolution should succeed.")
			.expect("A credential should resolve.");

		assert_eq!(credential.key.expose(), "from-settings");
		assert!(resolver.is_configured());
	}

	#[test]
	fn empty_constant_and_empty_key_fall_through() {
		let settings = settings_with(json!({ "youtube": { "key": "" } }));
		let resolver = CredentialResolver::standard(
			youtube(),
			ConstantSource::new(Some(String::new())),
			SettingsSource::new(settings),
		);

		assert_eq!(resolver.resolve_credentials().expect("Resolution should succeed."), None);
		assert!(!resolver.is_configured());
	}

	#[test]
	fn filters_apply_in_order() {
		let settings = settings_with(json!({ "youtube": { "key": "stored" } }));
		let source = SettingsSource::new(settings)
			.with_filter(|mut all: CredentialsMap| {
				all.insert("youtube".into(), json!({ "key": "first" }));

				all
			})
			.with_filter(|mut all: CredentialsMap| {
				if let Some(key) = all.get_mut("youtube").and_then(|c| c.get_mut("key")) {
					*key = json!(format!("{}-second", key.as_str().unwrap_or_default()));
				}

				all
			});
		let credential = source
			.credentials(&youtube())
			.expect("Resolution should succeed.")
			.expect("A credential should resolve.");

		assert_eq!(credential.key.expose(), "first-second");
	}

	#[test]
	fn update_preserves_other_services_and_skips_filters() {
		let settings = settings_with(json!({
			"vimeo": { "key": "other" },
			"flickr": { "key": "f", "secret": "s", "callback": "https://flickr.example/cb" },
		}));
		let source = SettingsSource::new(settings.clone()).with_filter(|_: CredentialsMap| {
			CredentialsMap::from_iter([("injected".to_owned(), json!({ "key": "x" }))])
		});
		let resolver =
			CredentialResolver::standard(youtube(), ConstantSource::default(), source);

		resolver
			.update_credentials(Credential::from_key("saved"))
			.expect("Saving credentials should succeed.");

		let stored = settings
			.get(CREDENTIALS_SETTING)
			.expect("Read should succeed.")
			.expect("Mapping should exist.");

		assert_eq!(stored["vimeo"], json!({ "key": "other" }));
		assert_eq!(stored["flickr"]["callback"], "https://flickr.example/cb");
		assert_eq!(stored["youtube"]["key"], "saved");
		assert!(stored.get("injected").is_none());
	}

	#[test]
	fn resolver_without_writer_rejects_updates() {
		let resolver = CredentialResolver::new(youtube()).with_source(ConstantSource::default());
		let err = resolver
			.update_credentials(Credential::from_key("k"))
			.expect_err("Updates need a writable source.");

		assert!(matches!(err, Error::Config(ConfigError::ReadOnlyCredentials { .. })));
	}

	#[test]
	fn source_errors_surface_and_count_as_unconfigured() {
		let resolver = CredentialResolver::new(youtube())
			.with_source(FailingSource)
			.with_source(ConstantSource::new(Some("never-reached".into())));

		assert!(matches!(resolver.resolve_credentials(), Err(Error::Storage(_))));
		assert!(!resolver.is_configured());
	}

	#[test]
	fn malformed_entry_reports_path() {
		let settings = settings_with(json!({ "youtube": { "key": 42 } }));
		let err = SettingsSource::new(settings)
			.credentials(&youtube())
			.expect_err("Malformed entry should be rejected.");

		assert!(err.to_string().contains("youtube.key"), "{err}");
	}

	#[test]
	fn malformed_entry_of_other_service_is_ignored() {
		let settings = settings_with(json!({
			"youtube": { "key": "yt" },
			"flickr": { "app_id": 12345 },
		}));
		let resolver = CredentialResolver::standard(
			youtube(),
			ConstantSource::default(),
			SettingsSource::new(settings),
		);
		let credential = resolver
			.resolve_credentials()
			.expect("Other services' entries must not affect resolution.")
			.expect("A credential should resolve.");

		assert_eq!(credential.key.expose(), "yt");
		assert!(resolver.is_configured());
	}

	#[test]
	fn null_entry_and_non_object_mapping() {
		let resolver = |value| {
			CredentialResolver::standard(
				youtube(),
				ConstantSource::default(),
				SettingsSource::new(settings_with(value)),
			)
		};

		assert_eq!(
			resolver(json!({ "youtube": null })).resolve_credentials().expect("Null is absent."),
			None
		);
		assert!(matches!(
			resolver(json!(["youtube"])).resolve_credentials(),
			Err(Error::Storage(StoreError::Serialization { .. }))
		));
	}
}
