//! Builder for [`ServiceDescriptor`] values with admin URL validation.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	service::{ServiceDescriptor, ServiceName},
};

/// Builder for [`ServiceDescriptor`] values.
#[derive(Debug)]
pub struct ServiceDescriptorBuilder {
	/// Name of the service being described.
	pub name: ServiceName,
	/// Optional label; defaults to the service name.
	pub label: Option<String>,
	/// Host admin endpoint (required).
	pub admin_url: Option<Url>,
	/// Token requirement flag; hosts default to requiring one.
	pub requires_token: bool,
	/// Optional picture advertised in token metadata.
	pub picture: Option<Url>,
}
impl ServiceDescriptorBuilder {
	/// Creates a new builder seeded with the provided name.
	pub fn new(name: ServiceName) -> Self {
		Self { name, label: None, admin_url: None, requires_token: true, picture: None }
	}

	/// Sets the human-readable label.
	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());

		self
	}

	/// Sets the host admin endpoint.
	pub fn admin_url(mut self, url: Url) -> Self {
		self.admin_url = Some(url);

		self
	}

	/// Overrides whether requests require a token.
	pub fn requires_token(mut self, required: bool) -> Self {
		self.requires_token = required;

		self
	}

	/// Sets the picture advertised in token metadata.
	pub fn picture(mut self, url: Url) -> Self {
		self.picture = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ServiceDescriptor, ConfigError> {
		let admin_url = self.admin_url.ok_or(ConfigError::MissingAdminUrl)?;

		validate_admin_url(&admin_url)?;

		Ok(ServiceDescriptor {
			label: self.label.unwrap_or_else(|| self.name.to_string()),
			name: self.name,
			admin_url,
			requires_token: self.requires_token,
			picture: self.picture,
		})
	}
}

fn validate_admin_url(url: &Url) -> Result<(), ConfigError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(ConfigError::UnsupportedScheme { url: url.to_string() }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::NoncePair;

	fn name() -> ServiceName {
		ServiceName::new("youtube").expect("Service fixture should be valid.")
	}

	fn admin() -> Url {
		Url::parse("https://example.test/wp-admin/admin.php?page=keyring")
			.expect("Admin fixture should parse.")
	}

	#[test]
	fn build_requires_admin_url() {
		let err = ServiceDescriptor::builder(name())
			.build()
			.expect_err("Descriptors without an admin URL must be rejected.");

		assert!(matches!(err, ConfigError::MissingAdminUrl));
	}

	#[test]
	fn build_rejects_non_http_admin_url() {
		let url = Url::parse("ftp://example.test/admin").expect("FTP fixture should parse.");
		let err = ServiceDescriptor::builder(name())
			.admin_url(url)
			.build()
			.expect_err("Non-HTTP admin URLs must be rejected.");

		assert!(matches!(err, ConfigError::UnsupportedScheme { .. }));
	}

	#[test]
	fn label_defaults_to_name_and_token_is_required() {
		let descriptor = ServiceDescriptor::builder(name())
			.admin_url(admin())
			.build()
			.expect("Descriptor should build.");

		assert_eq!(descriptor.label, "youtube");
		assert!(descriptor.requires_token);
		assert!(descriptor.picture.is_none());
	}

	#[test]
	fn verify_url_keeps_existing_query_and_appends_nonces() {
		let descriptor = ServiceDescriptor::builder(name())
			.label("YouTube")
			.admin_url(admin())
			.requires_token(false)
			.build()
			.expect("Descriptor should build.");
		let nonces = NoncePair::from_parts("kr-1", "svc-1");
		let url = descriptor.verify_url(&nonces);
		let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

		assert_eq!(
			pairs,
			[
				("page", "keyring"),
				("service", "youtube"),
				("action", "verify"),
				("kr_nonce", "kr-1"),
				("nonce", "svc-1"),
			]
			.map(|(k, v)| (k.to_owned(), v.to_owned()))
		);
	}
}
