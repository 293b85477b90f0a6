//! Single dispatch path for outbound API calls.
//!
//! Every request goes through [`Connector::request`]: token gate, `Authorization` injection,
//! method selection, transport dispatch, status recording, and classification of the raw
//! response. Only 200 and 201 count as success; the body is never parsed.

// self
use crate::{
	_prelude::*,
	connector::Connector,
	error::ConfigError,
	http::{HttpMethod, HttpTransport, TransportRequest},
	obs::{self, Stage, StageOutcome, StageSpan},
};

/// Optional request parameters.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
	/// Method name, matched case-insensitively; `GET` when absent.
	pub method: Option<String>,
	/// Extra request headers.
	pub headers: BTreeMap<String, String>,
	/// Query pairs appended to the URL.
	pub query: Vec<(String, String)>,
	/// Optional request body.
	pub body: Option<String>,
}
impl RequestParams {
	/// Sets the method name.
	pub fn method(mut self, method: impl Into<String>) -> Self {
		self.method = Some(method.into());

		self
	}

	/// Adds or replaces a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Appends a query pair.
	pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((name.into(), value.into()));

		self
	}

	/// Sets the request body.
	pub fn body(mut self, body: impl Into<String>) -> Self {
		self.body = Some(body.into());

		self
	}
}
impl Debug for RequestParams {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestParams")
			.field("method", &self.method)
			.field("headers", &self.headers.keys().collect::<Vec<_>>())
			.field("query", &self.query.iter().map(|(k, _)| k).collect::<Vec<_>>())
			.field("body_len", &self.body.as_ref().map(String::len))
			.finish()
	}
}

/// Successful API response (status 200 or 201) with its raw body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw, unprocessed body.
	pub body: String,
}

impl<T> Connector<T>
where
	T: ?Sized + HttpTransport,
{
	/// Dispatches one API request.
	///
	/// Fails with [`Error::NoToken`] before touching the transport when a token is required and
	/// missing. Services that require a token send it as `Authorization: Basic <token>`, the
	/// literal token rather than an encoded `user:pass` pair; token-free services never send one.
	/// Non-success statuses return [`Error::Status`] carrying the whole response; transport
	/// failures return [`Error::Transport`].
	///
	/// # Panics
	///
	/// Panics when `params.method` names anything other than GET or POST. That is a programming
	/// error, not a runtime condition.
	pub fn request(&self, url: impl AsRef<str>, params: RequestParams) -> Result<ApiResponse> {
		const STAGE: Stage = Stage::Request;

		let service: &str = &self.descriptor.name;
		let _span = StageSpan::new(STAGE, service).entered();

		self.metrics.record(STAGE, service, StageOutcome::Attempt);

		let RequestParams { method, mut headers, query, body } = params;

		if self.descriptor.requires_token {
			let Some(token) = self.token.read().as_ref().map(|t| t.token.expose().to_owned())
			else {
				self.metrics.record(STAGE, service, StageOutcome::Failure);

				return Err(Error::NoToken { service: service.to_owned() });
			};

			headers.retain(|name, _| !name.eq_ignore_ascii_case("authorization"));
			headers.insert("Authorization".into(), format!("Basic {token}"));
		}

		let method = match method.as_deref().map(str::parse::<HttpMethod>) {
			None => HttpMethod::Get,
			Some(Ok(method)) => method,
			Some(Err(e)) => {
				obs::error_unsupported_method(service, &e);
				self.metrics.record(STAGE, service, StageOutcome::Failure);

				panic!("{e}");
			},
		};
		let raw_url = url.as_ref();
		let mut url = match Url::parse(raw_url) {
			Ok(url) => url,
			Err(e) => {
				self.metrics.record(STAGE, service, StageOutcome::Failure);

				return Err(ConfigError::invalid_url(raw_url, e).into());
			},
		};

		if !query.is_empty() {
			url.query_pairs_mut().extend_pairs(&query);
		}

		obs::debug_dispatch(method, &url);
		obs::debug_params(&headers, body.as_deref());

		let outcome = self.transport.execute(TransportRequest { method, url, headers, body });

		obs::debug_response(&outcome);

		*self.last_status.lock() = match &outcome {
			Ok(response) => Some(response.status),
			Err(e) => e.status(),
		};

		let result = match outcome {
			Ok(response) if response.is_success() =>
				Ok(ApiResponse { status: response.status, body: response.body }),
			Ok(response) => Err(Error::Status { response: Box::new(response) }),
			Err(e) => Err(e.into()),
		};

		match &result {
			Ok(_) => self.metrics.record(STAGE, service, StageOutcome::Success),
			Err(_) => self.metrics.record(STAGE, service, StageOutcome::Failure),
		}

		result
	}
}
