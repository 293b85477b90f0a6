//! Connector-level error types shared across credential resolution, verification, and requests.

// self
use crate::{_prelude::*, http::TransportResponse, service::IdentifierError};

/// Connector-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error code attached to every failed API request.
pub const REQUEST_ERROR_CODE: &str = "keyring-request-error";

/// Canonical connector error exposed by public APIs.
///
/// Unsupported HTTP methods are deliberately absent: they indicate a programming error and
/// abort the current request instead of surfacing as a value.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure (settings or token store).
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS) before any HTTP status was received.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The service requires a token and none is set.
	#[error("No token is set for the `{service}` service.")]
	NoToken {
		/// Service name that attempted the request.
		service: String,
	},
	/// The API answered with a status other than 200 or 201.
	#[error("Request failed with HTTP status {}.", response.status)]
	Status {
		/// Entire transport response kept for caller inspection.
		response: Box<TransportResponse>,
	},
	/// The verification callback carried a nonce pair that does not match the issued one.
	#[error("Invalid or missing verification nonce.")]
	InvalidNonce,
}
impl Error {
	/// Returns the coarse error category.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::NoToken { .. } => ErrorKind::NoToken,
			Self::Status { .. } | Self::Transport(_) => ErrorKind::RequestError,
			Self::Storage(_) => ErrorKind::Storage,
			Self::Config(_) => ErrorKind::Config,
			Self::InvalidNonce => ErrorKind::InvalidNonce,
		}
	}

	/// Returns the stable machine-readable error code.
	pub fn code(&self) -> &'static str {
		match self.kind() {
			ErrorKind::NoToken | ErrorKind::RequestError => REQUEST_ERROR_CODE,
			ErrorKind::Storage => "keyring-storage-error",
			ErrorKind::Config => "keyring-config-error",
			ErrorKind::InvalidNonce => "keyring-invalid-nonce",
		}
	}

	/// HTTP status code reported by the API, when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { response } => Some(response.status),
			Self::Transport(e) => e.status(),
			_ => None,
		}
	}

	/// Full API response for [`Error::Status`] failures.
	pub fn response(&self) -> Option<&TransportResponse> {
		match self {
			Self::Status { response } => Some(response),
			_ => None,
		}
	}
}

/// Coarse error categories callers branch on before trusting a response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Token required but absent.
	NoToken,
	/// Non-success status or transport failure.
	RequestError,
	/// Settings or token store failure.
	Storage,
	/// Invalid connector configuration.
	Config,
	/// CSRF nonce validation failed.
	InvalidNonce,
}

/// Configuration and validation failures raised by the connector.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A URL could not be parsed.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// Raw URL text.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Descriptor builder was not given the host's admin endpoint.
	#[error("Service descriptor is missing the admin URL.")]
	MissingAdminUrl,
	/// Admin endpoint uses a scheme other than HTTP(S).
	#[error("Admin URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Admin URL that failed validation.
		url: String,
	},
	/// Service or token identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] IdentifierError),
	/// Resolver has no writable credential source.
	#[error("No writable credential source is configured for `{service}`.")]
	ReadOnlyCredentials {
		/// Service name whose credentials were being saved.
		service: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Builds an [`ConfigError::InvalidUrl`] for the provided raw text.
	pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
		Self::InvalidUrl { url: url.into(), source }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
impl From<IdentifierError> for Error {
	fn from(e: IdentifierError) -> Self {
		ConfigError::from(e).into()
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
	/// The status line arrived but the body could not be read.
	#[error("Response body could not be read after HTTP status {status}.")]
	Body {
		/// HTTP status already received.
		status: u16,
		/// Transport-specific read failure.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a body read failure that happened after `status` was received.
	pub fn body(status: u16, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Body { status, source: Box::new(src) }
	}

	/// HTTP status received before the failure, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Body { status, .. } => Some(*status),
			_ => None,
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
