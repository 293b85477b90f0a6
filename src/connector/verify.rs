//! Local verification flow: redirect back to the host, then mint and store the site token.
//!
//! Key-only services need no remote consent, so [`Connector::request_token`] only points the
//! browser at the host's own verification endpoint and [`Connector::verify_token`] mints the
//! token without any network call. Verification cannot fail short of a storage error.

// self
use crate::{
	_prelude::*,
	auth::{self, AccessToken},
	connector::Connector,
	hooks::MetaContext,
	http::HttpTransport,
	obs::{Stage, StageOutcome, StageSpan},
	service::TokenId,
};

/// Redirect the host must issue to continue the flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
	/// Absolute target URL.
	pub location: Url,
}

impl<T> Connector<T>
where
	T: ?Sized + HttpTransport,
{
	/// Starts verification by redirecting to the host's verify endpoint with this connector's
	/// nonce pair.
	pub fn request_token(&self) -> Redirect {
		const STAGE: Stage = Stage::RequestToken;

		let service = &self.descriptor.name;
		let _span = StageSpan::new(STAGE, service).entered();

		self.metrics.record(STAGE, service, StageOutcome::Attempt);

		let location = self.descriptor.verify_url(self.nonces());

		self.metrics.record(STAGE, service, StageOutcome::Success);

		Redirect { location }
	}

	/// Checks the nonce pair echoed by the host, then runs [`verify_token`](Self::verify_token).
	pub fn complete_verification(
		&self,
		kr_nonce: Option<&str>,
		nonce: Option<&str>,
	) -> Result<TokenId> {
		if !self.nonces().verify(kr_nonce, nonce) {
			let service = &self.descriptor.name;
			let _span = StageSpan::new(Stage::VerifyToken, service).entered();

			self.metrics.record(Stage::VerifyToken, service, StageOutcome::Attempt);
			self.metrics.record(Stage::VerifyToken, service, StageOutcome::Failure);

			return Err(Error::InvalidNonce);
		}

		self.verify_token()
	}

	/// Mints the placeholder token, lets observers adjust it, stores it, and makes it current.
	///
	/// Returns the storage identifier after notifying observers.
	pub fn verify_token(&self) -> Result<TokenId> {
		const STAGE: Stage = Stage::VerifyToken;

		let service = &self.descriptor.name;
		let _span = StageSpan::new(STAGE, service).entered();

		self.metrics.record(STAGE, service, StageOutcome::Attempt);

		let raw = auth::generate_token();
		let ctx = MetaContext { service, raw_token: &raw, response: None };
		let meta = self
			.observers
			.apply_meta(auth::placeholder_meta(self.descriptor.picture.as_ref()), &ctx);
		let token = self.observers.apply_token(AccessToken::new(service.clone(), raw, meta));
		let id = match self.store.store(token.clone()) {
			Ok(id) => id,
			Err(e) => {
				self.metrics.record(STAGE, service, StageOutcome::Failure);

				return Err(e.into());
			},
		};

		self.set_token(token.clone());
		self.observers.notify_verified(&id, &token);
		self.metrics.record(STAGE, service, StageOutcome::Success);

		Ok(id)
	}
}
