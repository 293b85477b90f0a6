//! Transport primitives for outbound API calls.
//!
//! [`HttpTransport`] is the connector's only dependency on an HTTP stack: a blocking call that
//! either yields a [`TransportResponse`] (whatever its status) or a
//! [`TransportError`](crate::error::TransportError) when no response was received. The
//! default [`ReqwestTransport`] wraps reqwest's blocking client; custom transports (test
//! doubles, host-provided stacks) implement the trait directly.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// HTTP methods the connector can dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	/// `GET` (the default).
	Get,
	/// `POST`.
	Post,
}
impl HttpMethod {
	/// Returns the canonical upper-case method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for HttpMethod {
	type Err = UnsupportedMethod;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.eq_ignore_ascii_case("GET") {
			Ok(Self::Get)
		} else if s.eq_ignore_ascii_case("POST") {
			Ok(Self::Post)
		} else {
			Err(UnsupportedMethod { method: s.to_owned() })
		}
	}
}

/// Raised when a request names a method other than GET or POST.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unsupported method `{method}` specified for the request.")]
pub struct UnsupportedMethod {
	/// Method string as supplied by the caller.
	pub method: String,
}

/// Fully prepared request handed to an [`HttpTransport`].
#[derive(Clone, PartialEq, Eq)]
pub struct TransportRequest {
	/// Method to dispatch.
	pub method: HttpMethod,
	/// Absolute request URL, query included.
	pub url: Url,
	/// Outgoing headers.
	pub headers: BTreeMap<String, String>,
	/// Optional request body.
	pub body: Option<String>,
}
impl TransportRequest {
	/// Returns a header value, matching the name case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}
impl Debug for TransportRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TransportRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &self.headers.keys().collect::<Vec<_>>())
			.field("body_len", &self.body.as_ref().map(String::len))
			.finish()
	}
}

/// Raw response returned by a transport: status, headers, and the unprocessed body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportResponse {
	/// Numeric HTTP status code.
	pub status: u16,
	/// Response headers keyed by lower-case name; repeated headers are comma-joined.
	pub headers: BTreeMap<String, String>,
	/// Raw body text.
	pub body: String,
}
impl TransportResponse {
	/// Creates a response without headers.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, headers: BTreeMap::new(), body: body.into() }
	}

	/// Adds a header, joining repeated names with `", "`.
	pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
		self.append_header(name.as_ref(), value.as_ref());

		self
	}

	/// Returns `true` for the statuses the connector treats as success (200 and 201).
	pub fn is_success(&self) -> bool {
		matches!(self.status, 200 | 201)
	}

	fn append_header(&mut self, name: &str, value: &str) {
		self.headers
			.entry(name.to_ascii_lowercase())
			.and_modify(|existing| {
				existing.push_str(", ");
				existing.push_str(value);
			})
			.or_insert_with(|| value.to_owned());
	}
}

/// Blocking transport capable of executing one API request.
///
/// Implementations must return `Ok` for every response that carries an HTTP status, including
/// 4xx/5xx; status classification belongs to the connector. `Err` is reserved for failures
/// where no response arrived (DNS, TCP, TLS, timeouts) or whose body could not be read
/// ([`TransportError::Body`], which keeps the status).
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes `request` and returns the raw response.
	fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// Thin wrapper around the blocking [`ReqwestClient`] so shared HTTP behavior lives in one
/// place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing blocking reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client with reqwest defaults, surfacing TLS backend failures as errors.
	pub fn try_new() -> Result<Self, crate::error::ConfigError> {
		Ok(Self(ReqwestClient::builder().build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
		let TransportRequest { method, url, headers, body } = request;
		let mut builder = match method {
			HttpMethod::Get => self.0.get(url),
			HttpMethod::Post => self.0.post(url),
		};

		for (name, value) in &headers {
			builder = builder.header(name.as_str(), value.as_str());
		}
		if let Some(body) = body {
			builder = builder.body(body);
		}

		let response = builder.send()?;
		let status = response.status().as_u16();
		let mut raw = TransportResponse::new(status, String::new());

		for (name, value) in response.headers() {
			raw.append_header(name.as_str(), &String::from_utf8_lossy(value.as_bytes()));
		}

		raw.body = response.text().map_err(|e| TransportError::body(status, e))?;

		Ok(raw)
	}
}
