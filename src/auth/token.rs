//! Synthetic access tokens minted once per site and their placeholder metadata.

// crates.io
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, auth::Secret, service::ServiceName};

/// Sentinel stored in identity fields the public API cannot provide.
pub const NOT_APPLICABLE: &str = "N/A";

/// Free-form metadata attached to a stored token.
pub type TokenMeta = BTreeMap<String, String>;

/// Placeholder identity token persisted by the host.
///
/// The token never expires and is never rotated; it only marks the service as verified for the
/// site and is echoed in the `Authorization` header.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	/// Service that minted the token.
	pub service: ServiceName,
	/// Opaque token value; callers must avoid logging it.
	pub token: Secret,
	/// Metadata assembled during verification.
	pub meta: TokenMeta,
	/// Mint instant.
	pub created_at: OffsetDateTime,
}
impl AccessToken {
	/// Creates a token stamped with the current clock.
	pub fn new(service: ServiceName, token: impl Into<String>, meta: TokenMeta) -> Self {
		Self { service, token: Secret::new(token), meta, created_at: OffsetDateTime::now_utc() }
	}

	/// Raw token value, used verbatim as the user-facing identifier.
	pub fn display(&self) -> &str {
		self.token.expose()
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("service", &self.service)
			.field("token", &"<redacted>")
			.field("meta", &self.meta)
			.field("created_at", &self.created_at)
			.finish()
	}
}

/// Builds the fixed metadata record stored with every minted token.
pub fn placeholder_meta(picture: Option<&Url>) -> TokenMeta {
	let mut meta = TokenMeta::new();

	for field in ["username", "user_id", "name"] {
		meta.insert(field.into(), NOT_APPLICABLE.into());
	}

	if let Some(picture) = picture {
		meta.insert("picture".into(), picture.to_string());
	}

	meta
}

/// Generates a 64-character lowercase hex token from the clock and a random salt.
///
/// Uniqueness is probabilistic; the value is a placeholder identity, not a capability secret.
pub fn generate_token() -> String {
	let now = OffsetDateTime::now_utc().unix_timestamp_nanos();
	let salt = rand::random::<u64>();
	let digest = Sha256::digest(format!("{now}{salt}{now}"));

	format!("{digest:x}")
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashSet;
	// self
	use super::*;

	#[test]
	fn generated_tokens_are_unique_hex() {
		let tokens: Vec<String> = (0..1_000).map(|_| generate_token()).collect();
		let unique: HashSet<&String> = tokens.iter().collect();

		assert_eq!(unique.len(), tokens.len());
		assert!(tokens.iter().all(|t| t.len() == 64));
		assert!(tokens.iter().all(|t| t.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))));
	}

	#[test]
	fn placeholder_meta_uses_sentinels() {
		let meta = placeholder_meta(None);

		assert_eq!(meta.len(), 3);
		assert!(meta.values().all(|v| v == NOT_APPLICABLE));

		let picture = Url::parse("https://img.example/logo.png").expect("Picture should parse.");
		let meta = placeholder_meta(Some(&picture));

		assert_eq!(meta.get("picture").map(String::as_str), Some("https://img.example/logo.png"));
	}

	#[test]
	fn debug_redacts_token() {
		let service = ServiceName::new("youtube").expect("Service fixture should be valid.");
		let token = AccessToken::new(service, "raw-token", placeholder_meta(None));
		let rendered = format!("{token:?}");

		assert!(!rendered.contains("raw-token"));
		assert_eq!(token.display(), "raw-token");
	}
}
